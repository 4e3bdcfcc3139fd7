//! Low-precision moon age from a calendar date.
//!
//! Uses the traditional almanac shortcut anglers reckon spring and neap tides
//! with: Jan/Feb count as months 13/14 of the previous year, then
//! `age = (Y + ⌊Y/4⌋ + 9M/25 + D + 11) mod 30`.
//! Accuracy is a couple of days at best. The result only decides how strong
//! the fallback current runs and where its high-water hour sits, so the
//! coarseness is acceptable.

use chrono::{Datelike, NaiveDate};

/// Approximate days since new moon, in `[0, 30)`.
pub fn moon_age(date: NaiveDate) -> f64 {
    let (mut year, mut month) = (date.year(), date.month() as i32);
    if month < 3 {
        year -= 1;
        month += 12;
    }

    let leap_term = (year as f64 / 4.0).floor();
    let raw = year as f64 + leap_term + month as f64 * 9.0 / 25.0 + date.day() as f64 + 11.0;

    raw.rem_euclid(30.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn autumn_date_matches_almanac_formula() {
        // 2026 + 506 + 3.6 + 16 + 11 = 2562.6
        let age = moon_age(date(2026, 10, 16));
        assert!((age - 12.6).abs() < 1e-9, "age = {age}");
    }

    #[test]
    fn january_counts_as_month_thirteen_of_previous_year() {
        // 2024 + 506 + 4.68 + 1 + 11 = 2546.68
        let age = moon_age(date(2025, 1, 1));
        assert!((age - 26.68).abs() < 1e-9, "age = {age}");
    }

    #[test]
    fn age_stays_in_range_for_a_whole_year() {
        let mut day = date(2026, 1, 1);
        while day < date(2027, 1, 1) {
            let age = moon_age(day);
            assert!((0.0..30.0).contains(&age), "{day}: {age}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn consecutive_days_advance_by_one() {
        let a = moon_age(date(2026, 6, 3));
        let b = moon_age(date(2026, 6, 4));
        assert!(((b - a).rem_euclid(30.0) - 1.0).abs() < 1e-9);
    }
}
