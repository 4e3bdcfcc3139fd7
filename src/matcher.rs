//! Closest-time lookup in an official current table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw table as scraped: one `Vec` of cell texts per row.
///
/// Columns are expected in the order hour, minute, direction, speed, but
/// header rows, notes and blank rows are kept as-is; the matcher skips them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TideTable {
    pub rows: Vec<Vec<String>>,
}

/// One well-formed row of a current table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideObservationRow {
    pub hour: u32,
    pub minute: u32,
    pub direction_label: String,
    pub speed_knots: f64,
}

impl TideObservationRow {
    /// Parse a raw row, or `None` if any required cell is missing or not numeric.
    pub fn parse(cells: &[String]) -> Option<Self> {
        let hour = parse_whole(cells.first()?)?;
        let minute = parse_whole(cells.get(1)?)?;
        let direction_label = cells.get(2)?.trim().to_string();
        let speed_knots: f64 = cells.get(3)?.trim().parse().ok()?;

        if !speed_knots.is_finite() {
            return None;
        }

        Some(TideObservationRow {
            hour,
            minute,
            direction_label,
            speed_knots,
        })
    }

    pub fn minute_of_day(&self) -> i64 {
        self.hour as i64 * 60 + self.minute as i64
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum MatchError {
    /// Empty table, or no row could be parsed
    #[error("no usable row in current table")]
    NotFound,
}

/// Row whose time of day is closest to `hour:minute`.
///
/// Same-day distance only; 23:50 is not considered close to 00:10. On equal
/// distance the earlier row in the table wins.
pub fn best_match(
    table: &TideTable,
    hour: u32,
    minute: u32,
) -> Result<TideObservationRow, MatchError> {
    let target = hour as i64 * 60 + minute as i64;
    let mut best: Option<(i64, TideObservationRow)> = None;

    for row in table.rows.iter().filter_map(|cells| TideObservationRow::parse(cells)) {
        let diff = (target - row.minute_of_day()).abs();
        if best.as_ref().map_or(true, |(best_diff, _)| diff < *best_diff) {
            best = Some((diff, row));
        }
    }

    best.map(|(_, row)| row).ok_or(MatchError::NotFound)
}

/// Whole number cell; tolerates a trailing `.0` left by spreadsheet exports.
fn parse_whole(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<u32>() {
        return Some(v);
    }
    let v: f64 = cell.parse().ok()?;
    (v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64).then_some(v as u32)
}
