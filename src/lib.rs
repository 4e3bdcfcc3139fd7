//! # Tide Tackle Core Library
//!
//! Hybrid tide estimation and tackle recommendation for anglers working the
//! narrow tidal straits of the eastern Seto Inland Sea (Akashi, Naruto,
//! Tomogashima). Current direction, current speed, wind and water temperature
//! together decide which sinker, skirt and retrieve will fish well.
//!
//! ## Data Flow
//! 1. **Locate**: the nearest reference station is resolved from a position
//!    ([`stations`])
//! 2. **Tide**: today's official current table is fetched and matched against
//!    the target time; anything else degrades to a lunar-age model
//!    ([`fusion`], [`fallback`])
//! 3. **Evaluate**: tide plus weather drive the gear ladder ([`strategy`]),
//!    the 1–10 condition index ([`scoring`]) and the seat pick ([`seat`])
//! 4. **Project**: the same pass is repeated for the next few hours
//!    ([`forecast`])
//!
//! ## Core Types
//! - [`TideState`]: a fused tide reading, tagged with where it came from
//! - [`EnvironmentSnapshot`]: wind, water temperature, cloud and rain for one hour
//! - [`Coordinates`]: an injected position

use serde::{Deserialize, Serialize};

pub mod advisor;
pub mod cache;
pub mod config;
pub mod fallback;
pub mod forecast;
pub mod fusion;
pub mod lunar;
pub mod matcher;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod seat;
pub mod stations;
pub mod strategy;
pub mod tide_data;
pub mod weather;

#[cfg(test)]
mod tests;

/// Knot value at which an authoritative reading saturates `factor` at 1.0.
pub const FULL_STRENGTH_KNOTS: f64 = 6.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Tidal current at one instant, tagged by provenance.
///
/// Both variants expose a `factor` in `[0, 1]` so the scoring rules can treat
/// them alike, but the number means different things:
/// - `Authoritative`: measured speed normalized against [`FULL_STRENGTH_KNOTS`]
/// - `Estimated`: the phase magnitude of the lunar model, independent of the
///   spring/neap peak speed
///
/// # Example
/// ```
/// use tide_tackle::TideState;
///
/// let state = TideState::Authoritative {
///     speed_knots: 3.0,
///     direction_label: "西流".to_string(),
///     is_rising: true,
/// };
/// assert_eq!(state.factor(), 0.5);
/// assert!(state.is_authoritative());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TideState {
    /// Matched row of today's official current table.
    Authoritative {
        speed_knots: f64,
        direction_label: String,
        is_rising: bool,
    },
    /// Output of the lunar-age fallback model.
    Estimated {
        factor: f64,
        speed_knots: f64,
        is_rising: bool,
        lunar_age: f64,
    },
}

impl TideState {
    /// Normalized current strength in `[0, 1]`.
    pub fn factor(&self) -> f64 {
        match self {
            TideState::Authoritative { speed_knots, .. } => {
                (speed_knots / FULL_STRENGTH_KNOTS).clamp(0.0, 1.0)
            }
            TideState::Estimated { factor, .. } => factor.clamp(0.0, 1.0),
        }
    }

    pub fn speed_knots(&self) -> f64 {
        match self {
            TideState::Authoritative { speed_knots, .. }
            | TideState::Estimated { speed_knots, .. } => speed_knots.max(0.0),
        }
    }

    /// Flood (west/north-going) current.
    pub fn is_rising(&self) -> bool {
        match self {
            TideState::Authoritative { is_rising, .. } | TideState::Estimated { is_rising, .. } => {
                *is_rising
            }
        }
    }

    pub fn is_authoritative(&self) -> bool {
        matches!(self, TideState::Authoritative { .. })
    }

    /// Slack water: the current has all but stopped while it turns.
    pub fn is_slack(&self) -> bool {
        self.factor() < 0.1 && self.speed_knots() < 0.5
    }
}

/// Weather inputs for one hour, as supplied by the weather collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// Wind speed at 10 m in m/s
    pub wind_speed_ms: f64,
    /// Direction the wind blows from, degrees in `[0, 360)`
    pub wind_direction_deg: f64,
    pub sea_surface_temp_c: f64,
    /// Cloud cover percentage (0–100)
    pub cloud_cover_pct: f64,
    /// Rain over the preceding hour in mm
    pub rain_mm: f64,
}

impl EnvironmentSnapshot {
    /// Copy with the wind direction folded into `[0, 360)`.
    pub fn normalized(self) -> Self {
        EnvironmentSnapshot {
            wind_direction_deg: normalize_degrees(self.wind_direction_deg),
            ..self
        }
    }
}

/// Fold any bearing into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let folded = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}
