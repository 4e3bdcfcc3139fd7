//! # Fallback Tide Model
//!
//! Lunar-age-driven approximation of the strait current, used whenever the
//! official current table cannot be used (wrong day, no URL, fetch or parse
//! failure, no matching row).
//!
//! ## Model Characteristics
//!
//! ### Half-day cycle
//! - **High water hour**: `(8.5 + (age mod 15) × 0.8) mod 12`. High water drifts
//!   about 48 minutes later per day of moon age
//! - **Phase offset**: hours from high water, folded onto a 12-hour cycle and
//!   then onto `[0, 6]`
//! - **Strength**: `sin(offset × π/6)`. Slack at high and low water, strongest
//!   three hours either side
//!
//! ### Spring–neap envelope
//! Peak speed comes from a three-tier table keyed on `age mod 15`:
//! - **Spring** (≤2 or ≥13): 5.5 kt
//! - **Middle** (3–5, 10–12): 3.5 kt
//! - **Neap**: 2.0 kt
//!
//! ### Accuracy Trade-offs
//! - ✅ **Correct period**: semidiurnal rhythm
//! - ✅ **Spring–neap**: stronger runs around new and full moon
//! - ❌ **No station harmonics**: one curve for every strait
//! - ❌ **No weather effects**: wind set and pressure surge are ignored
//!
//! States produced here are tagged [`TideState::Estimated`] so callers can flag
//! them as estimates.

use crate::{lunar, TideState};
use chrono::{NaiveDateTime, Timelike};
use std::f64::consts::PI;

const HIGH_WATER_BASE_HOUR: f64 = 8.5;
const HIGH_WATER_DELAY_PER_DAY: f64 = 0.8;
const HALF_CYCLE_HOURS: f64 = 12.0;

const SPRING_PEAK_KNOTS: f64 = 5.5;
const MIDDLE_PEAK_KNOTS: f64 = 3.5;
const NEAP_PEAK_KNOTS: f64 = 2.0;

/// Result of the fallback model for one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    /// Phase magnitude in `[0, 1]`
    pub factor: f64,
    pub is_rising: bool,
    pub speed_knots: f64,
}

/// Estimate the current for a moon age and fractional hour of day.
pub fn estimate(lunar_age: f64, hour_of_day: f64) -> Estimate {
    let cycle_age = lunar_age.rem_euclid(15.0);
    let high_water = high_water_hour(lunar_age);

    let mut offset = (hour_of_day - high_water).abs().rem_euclid(HALF_CYCLE_HOURS);
    if offset > 6.0 {
        offset = HALF_CYCLE_HOURS - offset;
    }
    let factor = (offset * PI / 6.0).sin().clamp(0.0, 1.0);

    // Flooding only in the six hours leading up to the modeled high water
    let is_rising = high_water - 6.0 < hour_of_day && hour_of_day < high_water;

    Estimate {
        factor,
        is_rising,
        speed_knots: peak_knots(cycle_age) * factor,
    }
}

/// Estimate for a wall-clock instant on the reference station's clock.
pub fn estimate_at(instant: NaiveDateTime) -> TideState {
    let lunar_age = lunar::moon_age(instant.date());
    let hour = instant.hour() as f64 + instant.minute() as f64 / 60.0;
    let est = estimate(lunar_age, hour);

    TideState::Estimated {
        factor: est.factor,
        speed_knots: est.speed_knots,
        is_rising: est.is_rising,
        lunar_age,
    }
}

/// Hour of day (0–12) of the modeled high water.
pub fn high_water_hour(lunar_age: f64) -> f64 {
    (HIGH_WATER_BASE_HOUR + lunar_age.rem_euclid(15.0) * HIGH_WATER_DELAY_PER_DAY)
        .rem_euclid(HALF_CYCLE_HOURS)
}

fn peak_knots(cycle_age: f64) -> f64 {
    if cycle_age <= 2.0 || cycle_age >= 13.0 {
        SPRING_PEAK_KNOTS
    } else if (3.0..=5.0).contains(&cycle_age) || (10.0..=12.0).contains(&cycle_age) {
        MIDDLE_PEAK_KNOTS
    } else {
        NEAP_PEAK_KNOTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn slack_at_high_water() {
        let est = estimate(0.0, 8.5);
        assert!(est.factor.abs() < 1e-9);
        assert!(est.speed_knots.abs() < 1e-9);
    }

    #[test]
    fn full_strength_three_hours_after_high_water() {
        let est = estimate(0.0, 11.5);
        assert!((est.factor - 1.0).abs() < 1e-9);
        assert!((est.speed_knots - 5.5).abs() < 1e-9);
        assert!(!est.is_rising);
    }

    #[test]
    fn neap_peak_is_weaker() {
        // age 7: high water at 2.1h, so 5.1h is three hours past it
        let est = estimate(7.0, 5.1);
        assert!((est.factor - 1.0).abs() < 1e-6);
        assert!((est.speed_knots - 2.0).abs() < 1e-6);
    }

    #[test]
    fn peak_tiers_follow_cycle_age() {
        assert_eq!(peak_knots(0.0), 5.5);
        assert_eq!(peak_knots(14.0), 5.5);
        assert_eq!(peak_knots(4.0), 3.5);
        assert_eq!(peak_knots(11.0), 3.5);
        assert_eq!(peak_knots(8.0), 2.0);
        // 16 days folds onto cycle age 1
        assert_eq!(peak_knots(16.0_f64.rem_euclid(15.0)), 5.5);
    }

    #[test]
    fn rising_in_the_six_hours_before_high_water() {
        assert!(estimate(0.0, 5.0).is_rising);
        assert!(estimate(0.0, 3.0).is_rising);
        assert!(!estimate(0.0, 9.0).is_rising);
        assert!(!estimate(0.0, 2.0).is_rising);
        // the window does not wrap onto the evening half-cycle
        assert!(!estimate(0.0, 19.0).is_rising);
    }

    #[test]
    fn rising_window_is_open_and_anchored_to_the_morning_high() {
        // age 7: high water at 2.1h, so the window is (-3.9, 2.1)
        assert!(estimate(7.0, 0.0).is_rising);
        assert!(estimate(7.0, 2.0).is_rising);
        assert!(!estimate(7.0, 2.1).is_rising);
        assert!(!estimate(7.0, 10.0).is_rising);
        assert!(!estimate(7.0, 22.0).is_rising);
        // endpoints are excluded
        assert!(!estimate(0.0, 2.5).is_rising);
        assert!(!estimate(0.0, 8.5).is_rising);
    }

    #[test]
    fn rising_matches_window_for_every_quarter_hour() {
        let mut age = 0.0;
        while age < 30.0 {
            let high = high_water_hour(age);
            let mut hour = 0.0;
            while hour < 24.0 {
                let expected = high - 6.0 < hour && hour < high;
                assert_eq!(estimate(age, hour).is_rising, expected, "age {age} hour {hour}");
                hour += 0.25;
            }
            age += 0.5;
        }
    }

    #[test]
    fn factor_stays_normalized_across_the_day() {
        let mut age = 0.0;
        while age < 30.0 {
            let mut hour = 0.0;
            while hour < 24.0 {
                let est = estimate(age, hour);
                assert!(
                    (0.0..=1.0).contains(&est.factor),
                    "age {age} hour {hour}: factor {}",
                    est.factor
                );
                assert!(est.speed_knots >= 0.0);
                hour += 0.25;
            }
            age += 0.5;
        }
    }

    #[test]
    fn estimate_at_tags_state_as_estimated() {
        let instant = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let state = estimate_at(instant);
        assert!(!state.is_authoritative());
        match state {
            TideState::Estimated { lunar_age, .. } => assert!((lunar_age - 12.6).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }
}
