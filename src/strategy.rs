//! # Tackle Strategy
//!
//! Maps the fused tide and the hour's weather to a concrete rig: sinker
//! weight, tie (skirt) shape and color, retrieve speed and boat tactic.
//!
//! ## Steps
//! 1. **Sync**: flood runs toward 280°, ebb toward 100°. Wind within 90° of the
//!    current means the boat drifts with the line ("synced")
//! 2. **Weight**: depth base × adjustment multiplier, snapped to the sinker
//!    catalog
//! 3. **Tie shape**, 4. **Color**, 5. **Retrieve/Tactic**: first-match ladders
//!    in [`TIE_SHAPE_RULES`], [`COLOR_RULES`] and [`RETRIEVE_RULES`]
//!
//! Every threshold is a fixed constant; the function is pure.

use crate::rules::{first_match, Rule};
use crate::{normalize_degrees, EnvironmentSnapshot, TideState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sinker weights stocked in tungsten, grams, ascending.
pub const WEIGHT_CATALOG: [u32; 7] = [30, 45, 60, 80, 100, 120, 150];

/// Bearing the flood current runs toward in these straits.
pub const FLOOD_BEARING_DEG: u16 = 280;
/// Bearing the ebb current runs toward.
pub const EBB_BEARING_DEG: u16 = 100;

const BASE_MULTIPLIER: f64 = 1.1;

/// Target depth band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthCategory {
    /// ~30 m
    Shallow,
    /// ~45 m
    Mid,
    /// ~60 m
    Deep,
}

impl DepthCategory {
    pub const ALL: [DepthCategory; 3] = [
        DepthCategory::Shallow,
        DepthCategory::Mid,
        DepthCategory::Deep,
    ];

    /// Nominal depth in metres, which is also the base sinker weight in grams.
    pub fn nominal_depth_m(self) -> u32 {
        match self {
            DepthCategory::Shallow => 30,
            DepthCategory::Mid => 45,
            DepthCategory::Deep => 60,
        }
    }

    pub fn base_grams(self) -> f64 {
        self.nominal_depth_m() as f64
    }
}

impl fmt::Display for DepthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepthCategory::Shallow => "shallow",
            DepthCategory::Mid => "mid",
            DepthCategory::Deep => "deep",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown depth category '{0}' (expected shallow, mid or deep)")]
pub struct ParseDepthError(String);

impl FromStr for DepthCategory {
    type Err = ParseDepthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shallow" | "30" | "30m" => Ok(DepthCategory::Shallow),
            "mid" | "45" | "45m" => Ok(DepthCategory::Mid),
            "deep" | "60" | "60m" => Ok(DepthCategory::Deep),
            other => Err(ParseDepthError(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieShape {
    Worm,
    UltraSlimSingle,
    ShortStraight,
    LongCurly,
    FishTailTwin,
    WideBig,
    StandardCurly,
}

impl TieShape {
    pub fn label(self) -> &'static str {
        match self {
            TieShape::Worm => "Worm trailer (flash J style)",
            TieShape::UltraSlimSingle => "Ultra-slim single",
            TieShape::ShortStraight => "Short straight",
            TieShape::LongCurly => "Long curly",
            TieShape::FishTailTwin => "Fish tail / twin",
            TieShape::WideBig => "Wide high-pulse / big",
            TieShape::StandardCurly => "Standard curly",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieColor {
    BlackGold,
    PinkClearRed,
    NoriGreen,
    MajoraZebra,
    ColaRedBlack,
    StripedOrange,
    OrangeDotGold,
    FluorescentOrange,
    OrangeRed,
}

impl TieColor {
    pub fn label(self) -> &'static str {
        match self {
            TieColor::BlackGold => "Black-gold / chartreuse",
            TieColor::PinkClearRed => "Pink / clear red",
            TieColor::NoriGreen => "Seaweed green / black",
            TieColor::MajoraZebra => "Majora zebra / red zebra",
            TieColor::ColaRedBlack => "Cola / red-black",
            TieColor::StripedOrange => "Striped orange / orange zebra",
            TieColor::OrangeDotGold => "Orange dot / gold orange",
            TieColor::FluorescentOrange => "Red-orange / fluorescent orange",
            TieColor::OrangeRed => "Orange / red-orange",
        }
    }
}

/// Depth-driven finish applied on top of the base color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFinish {
    Standard,
    /// Gold/glow flake for dim water at depth
    Reflective,
    /// Muted, see-through body for shallow clear water
    Translucent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrieveSpeed {
    DeadSlow,
    Slow,
    Medium,
    Fast,
}

impl RetrieveSpeed {
    pub fn label(self) -> &'static str {
        match self {
            RetrieveSpeed::DeadSlow => "Dead slow",
            RetrieveSpeed::Slow => "Slow",
            RetrieveSpeed::Medium => "Medium (steady)",
            RetrieveSpeed::Fast => "High speed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactic {
    /// Bow to wind, line straight down
    Vertical,
    /// Cast ahead and work the slack water
    Casting,
    /// Broadside drift with wind and current together
    Drift,
}

impl Tactic {
    pub fn label(self) -> &'static str {
        match self {
            Tactic::Vertical => "Vertical",
            Tactic::Casting => "Casting",
            Tactic::Drift => "Broadside drift",
        }
    }
}

/// Everything a ladder rung may look at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conditions {
    pub factor: f64,
    pub is_synced: bool,
    pub wind_speed: f64,
    pub temp: f64,
    pub cloud: f64,
    pub rain: f64,
    pub depth: DepthCategory,
    /// Calendar month, 1–12
    pub month: u32,
}

impl Conditions {
    /// Seaweed-season color matching (December through May).
    pub fn vegetation_season(&self) -> bool {
        matches!(self.month, 12 | 1..=5)
    }
}

/// Rig recommendation for one hour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    pub weight_grams: u32,
    pub tie_shape: TieShape,
    pub tie_color: TieColor,
    pub color_finish: ColorFinish,
    pub retrieve_speed: RetrieveSpeed,
    pub tactic: Tactic,
    pub is_synced: bool,
    pub tide_direction_deg: u16,
}

/// Snapped weight for one depth band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthWeight {
    pub depth: DepthCategory,
    pub weight_grams: u32,
}

pub const TIE_SHAPE_RULES: &[Rule<Conditions, TieShape>] = &[
    Rule {
        name: "slack-worm",
        applies: |c: &Conditions| c.factor < 0.2,
        outcome: TieShape::Worm,
    },
    Rule {
        name: "cold-ultra-slim",
        applies: |c: &Conditions| c.temp < 12.0,
        outcome: TieShape::UltraSlimSingle,
    },
    Rule {
        name: "cool-synced-straight",
        applies: |c: &Conditions| (12.0..15.0).contains(&c.temp) && c.is_synced,
        outcome: TieShape::ShortStraight,
    },
    Rule {
        name: "deep-running-long",
        applies: |c: &Conditions| c.depth == DepthCategory::Deep && c.factor > 0.6,
        outcome: TieShape::LongCurly,
    },
    Rule {
        name: "shallow-calm-straight",
        applies: |c: &Conditions| c.depth == DepthCategory::Shallow && c.wind_speed < 2.0,
        outcome: TieShape::ShortStraight,
    },
    Rule {
        name: "summer-fish-tail",
        applies: |c: &Conditions| (6..=8).contains(&c.month) && c.factor > 0.5,
        outcome: TieShape::FishTailTwin,
    },
    Rule {
        name: "rain-or-torrent-wide",
        applies: |c: &Conditions| c.rain > 0.5 || c.factor > 0.8,
        outcome: TieShape::WideBig,
    },
];

pub const COLOR_RULES: &[Rule<Conditions, TieColor>] = &[
    Rule {
        name: "rain-black-gold",
        applies: |c: &Conditions| c.rain >= 0.5,
        outcome: TieColor::BlackGold,
    },
    Rule {
        name: "slack-pink",
        applies: |c: &Conditions| c.factor < 0.2,
        outcome: TieColor::PinkClearRed,
    },
    Rule {
        name: "seaweed-season-green",
        applies: |c: &Conditions| c.vegetation_season() && c.temp < 15.0,
        outcome: TieColor::NoriGreen,
    },
    Rule {
        name: "overcast-zebra",
        applies: |c: &Conditions| c.cloud >= 90.0,
        outcome: TieColor::MajoraZebra,
    },
    Rule {
        name: "cloudy-cola",
        applies: |c: &Conditions| (60.0..90.0).contains(&c.cloud),
        outcome: TieColor::ColaRedBlack,
    },
    Rule {
        name: "broken-cloud-stripes",
        applies: |c: &Conditions| (30.0..60.0).contains(&c.cloud),
        outcome: TieColor::StripedOrange,
    },
    Rule {
        name: "clear-running-orange-dot",
        applies: |c: &Conditions| c.cloud < 30.0 && c.factor > 0.3,
        outcome: TieColor::OrangeDotGold,
    },
    Rule {
        name: "cold-green",
        applies: |c: &Conditions| c.temp < 12.0,
        outcome: TieColor::NoriGreen,
    },
    Rule {
        name: "calm-clear-pink",
        applies: |c: &Conditions| c.wind_speed < 2.0 && c.cloud < 30.0,
        outcome: TieColor::PinkClearRed,
    },
    Rule {
        name: "synced-running-fluorescent",
        applies: |c: &Conditions| c.is_synced && c.factor > 0.6,
        outcome: TieColor::FluorescentOrange,
    },
];

pub const RETRIEVE_RULES: &[Rule<Conditions, (Tactic, RetrieveSpeed)>] = &[
    Rule {
        name: "synced-wind-drift",
        applies: |c: &Conditions| c.is_synced && c.wind_speed > 3.0,
        outcome: (Tactic::Drift, RetrieveSpeed::Fast),
    },
    Rule {
        name: "weak-current-warm-cast",
        applies: |c: &Conditions| c.factor < 0.3 && c.temp > 15.0,
        outcome: (Tactic::Casting, RetrieveSpeed::Slow),
    },
    Rule {
        name: "weak-current-cast",
        applies: |c: &Conditions| c.factor < 0.3,
        outcome: (Tactic::Casting, RetrieveSpeed::DeadSlow),
    },
];

/// Full recommendation for `depth` in `month`.
pub fn recommend(
    env: &EnvironmentSnapshot,
    tide: &TideState,
    depth: DepthCategory,
    month: u32,
) -> StrategyRecommendation {
    let tide_direction_deg = tide_bearing(tide.is_rising());
    let is_synced = is_synced(env.wind_direction_deg, tide_direction_deg);

    let conditions = Conditions {
        factor: tide.factor(),
        is_synced,
        wind_speed: env.wind_speed_ms,
        temp: env.sea_surface_temp_c,
        cloud: env.cloud_cover_pct,
        rain: env.rain_mm,
        depth,
        month,
    };

    let weight_grams = snap_weight(
        depth.base_grams() * weight_multiplier(conditions.factor, is_synced, env.wind_speed_ms),
    );
    let (tactic, retrieve_speed) = first_match(
        RETRIEVE_RULES,
        &conditions,
        (Tactic::Vertical, RetrieveSpeed::Medium),
    );

    StrategyRecommendation {
        weight_grams,
        tie_shape: first_match(TIE_SHAPE_RULES, &conditions, TieShape::StandardCurly),
        tie_color: first_match(COLOR_RULES, &conditions, TieColor::OrangeRed),
        color_finish: color_finish(&conditions),
        retrieve_speed,
        tactic,
        is_synced,
        tide_direction_deg,
    }
}

/// Snapped weights for every depth band under the same conditions.
pub fn weight_chart(factor: f64, is_synced: bool, wind_speed: f64) -> Vec<DepthWeight> {
    let multiplier = weight_multiplier(factor, is_synced, wind_speed);
    DepthCategory::ALL
        .iter()
        .map(|&depth| DepthWeight {
            depth,
            weight_grams: snap_weight(depth.base_grams() * multiplier),
        })
        .collect()
}

pub fn tide_bearing(is_rising: bool) -> u16 {
    if is_rising {
        FLOOD_BEARING_DEG
    } else {
        EBB_BEARING_DEG
    }
}

/// Smallest angle between two bearings, in `[0, 180]`.
pub fn angular_difference(a_deg: f64, b_deg: f64) -> f64 {
    let diff = normalize_degrees(a_deg - b_deg);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

pub fn is_synced(wind_direction_deg: f64, tide_direction_deg: u16) -> bool {
    angular_difference(wind_direction_deg, tide_direction_deg as f64) < 90.0
}

/// Heavier sinkers for strong current, drifting and wind.
pub fn weight_multiplier(factor: f64, is_synced: bool, wind_speed: f64) -> f64 {
    let mut multiplier = BASE_MULTIPLIER;
    if factor > 0.7 {
        multiplier += 0.5;
    } else if factor > 0.3 {
        multiplier += 0.2;
    }
    if is_synced {
        multiplier += 0.3;
    }
    if wind_speed > 7.0 {
        multiplier += 0.2;
    }
    multiplier
}

/// Closest catalog weight; a value halfway between two sizes takes the lighter.
pub fn snap_weight(grams: f64) -> u32 {
    snap_to(&WEIGHT_CATALOG, grams).unwrap_or(WEIGHT_CATALOG[0])
}

/// Closest entry of an ascending `catalog`, lower entry on ties.
pub fn snap_to(catalog: &[u32], grams: f64) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for &weight in catalog {
        let diff = (weight as f64 - grams).abs();
        if best.map_or(true, |(_, best_diff)| diff < best_diff) {
            best = Some((weight, diff));
        }
    }
    best.map(|(weight, _)| weight)
}

fn color_finish(c: &Conditions) -> ColorFinish {
    match c.depth {
        DepthCategory::Deep => ColorFinish::Reflective,
        DepthCategory::Shallow if c.cloud < 30.0 => ColorFinish::Translucent,
        _ => ColorFinish::Standard,
    }
}
