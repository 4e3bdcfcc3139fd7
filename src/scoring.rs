//! Fishing-condition index.
//!
//! Additive score from a 5.0 baseline, clamped to `[1, 10]` and then truncated
//! (not rounded) to an integer. The truncation is long-standing behavior that
//! published scores depend on, so 7.9 reads as 7.

use serde::{Deserialize, Serialize};

const BASELINE: f64 = 5.0;
pub const MIN_INDEX: u8 = 1;
pub const MAX_INDEX: u8 = 10;

/// Integer index in `[1, 10]` with its one-line verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionIndex {
    pub value: u8,
    pub comment: String,
}

/// Score the hour's conditions.
///
/// `wind` is m/s, `temp` is sea-surface °C, `rain` is mm in the last hour.
pub fn score(factor: f64, is_synced: bool, wind: f64, temp: f64, rain: f64) -> ConditionIndex {
    let value = raw_score(factor, is_synced, wind, temp, rain);
    ConditionIndex {
        value,
        comment: comment_for(value).to_string(),
    }
}

fn raw_score(factor: f64, is_synced: bool, wind: f64, temp: f64, rain: f64) -> u8 {
    let mut score = BASELINE;

    if factor > 0.7 {
        score += 2.5;
    } else if factor > 0.4 {
        score += 1.0;
    } else if factor < 0.2 {
        score -= 3.0;
    }

    score += if is_synced { 2.0 } else { -1.0 };

    if (2.0..=6.0).contains(&wind) {
        score += 1.0;
    } else if wind > 8.0 {
        score -= 2.0;
    } else if wind < 1.0 && !is_synced {
        score -= 1.0;
    }

    if (18.0..=24.0).contains(&temp) {
        score += 2.0;
    } else if (15.0..18.0).contains(&temp) || temp > 24.0 {
        score += 1.0;
    } else if (10.0..12.0).contains(&temp) {
        score -= 1.5;
    } else if temp < 10.0 {
        score -= 3.0;
    }

    if rain > 0.0 {
        score += 0.5;
    }

    // f64::max/min discard NaN, so the cast below is always in range
    score.max(MIN_INDEX as f64).min(MAX_INDEX as f64) as u8
}

pub fn comment_for(value: u8) -> &'static str {
    match value {
        9.. => "Red-hot window, expect a frenzy",
        7..=8 => "Good conditions, high hopes",
        5..=6 => "Average day, a test of skill",
        3..=4 => "Slow going, grind it out",
        _ => "Very tough, treat it as practice",
    }
}
