//! Best seat on a drifting boat.
//!
//! The bow is taken to face into the wind. The seat that meets the current
//! first (the "current head") gets the lure in front of fish before anyone
//! else, so the pick is the side of the hull facing where the current comes
//! from, expressed relative to the bow.

use crate::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::fmt;

const SECTOR_WIDTH_DEG: f64 = 45.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    BowCenter,
    BowRight,
    RightMidship,
    SternRight,
    SternCenter,
    SternLeft,
    LeftMidship,
    BowLeft,
}

/// Seats clockwise from the bow, one per 45° sector.
pub const SECTORS: [Seat; 8] = [
    Seat::BowCenter,
    Seat::BowRight,
    Seat::RightMidship,
    Seat::SternRight,
    Seat::SternCenter,
    Seat::SternLeft,
    Seat::LeftMidship,
    Seat::BowLeft,
];

impl Seat {
    pub fn label(self) -> &'static str {
        match self {
            Seat::BowCenter => "Bow",
            Seat::BowRight => "Bow, starboard",
            Seat::RightMidship => "Starboard midship",
            Seat::SternRight => "Stern, starboard",
            Seat::SternCenter => "Stern",
            Seat::SternLeft => "Stern, port",
            Seat::LeftMidship => "Port midship",
            Seat::BowLeft => "Bow, port",
        }
    }

    /// Short grid code used by the seat diagram.
    pub fn code(self) -> &'static str {
        match self {
            Seat::BowCenter => "m_center",
            Seat::BowRight => "m_right",
            Seat::RightMidship => "c_right",
            Seat::SternRight => "t_right",
            Seat::SternCenter => "t_center",
            Seat::SternLeft => "t_left",
            Seat::LeftMidship => "c_left",
            Seat::BowLeft => "m_left",
        }
    }

    /// Seats worth marking on the diagram. A centerline pick also lights up
    /// the two corner seats beside it, since the diagram has no centre cell.
    pub fn highlighted(self) -> Vec<Seat> {
        match self {
            Seat::BowCenter => vec![Seat::BowCenter, Seat::BowLeft, Seat::BowRight],
            Seat::SternCenter => vec![Seat::SternCenter, Seat::SternLeft, Seat::SternRight],
            other => vec![other],
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick the seat from wind (blowing from) and tide (flowing toward) bearings.
pub fn best_seat(wind_direction_deg: f64, tide_direction_deg: f64) -> Seat {
    let origin = normalize_degrees(tide_direction_deg + 180.0);
    let relative = normalize_degrees(origin - wind_direction_deg);
    let index = ((relative + SECTOR_WIDTH_DEG / 2.0) / SECTOR_WIDTH_DEG).floor() as usize;
    SECTORS[index % SECTORS.len()]
}
