//! Reference current stations and nearest-station lookup.
//!
//! The registry is small and geographically tight (all within ~50 km), so a
//! planar distance in degree space is good enough; no great-circle maths.

use crate::Coordinates;
use serde::Serialize;

/// Rough kilometres per degree used to report distance.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Beyond this distance the station's table is only a reference value.
pub const REMOTE_DISTANCE_KM: f64 = 20.0;

/// Direction-label tokens that mean a flood (rising) current in these
/// straits: west- or north-going. Anything else reads as ebb.
pub const STRAIT_RISING_TOKENS: &[&str] = &["西", "北", "west", "north"];

/// A tide-current observation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceStation {
    pub id: &'static str,
    pub display_name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Official current-table page; `None` borrows the reference station's.
    pub source_url: Option<&'static str>,
    /// Minutes this station's current events lag the reference station.
    pub time_offset_minutes: i64,
    /// Station whose clock and table this one is translated onto.
    pub reference_station_id: &'static str,
    /// Lowercase substrings of a table direction label that mean flood.
    pub rising_tokens: &'static [&'static str],
}

/// Compiled-in registry. The first entry is the default location.
pub static STATIONS: [ReferenceStation; 4] = [
    ReferenceStation {
        id: "akashi",
        display_name: "Akashi Strait",
        latitude: 34.616,
        longitude: 135.021,
        source_url: Some("https://www1.kaiho.mlit.go.jp/KAN5/tyouryuu/stream_akashi.html"),
        time_offset_minutes: 0,
        reference_station_id: "akashi",
        rising_tokens: STRAIT_RISING_TOKENS,
    },
    ReferenceStation {
        id: "naruto",
        display_name: "Naruto Strait",
        latitude: 34.238,
        longitude: 134.653,
        source_url: Some("https://www1.kaiho.mlit.go.jp/KAN5/tyouryuu/stream_naruto.html"),
        time_offset_minutes: 0,
        reference_station_id: "naruto",
        rising_tokens: STRAIT_RISING_TOKENS,
    },
    ReferenceStation {
        id: "tomogashima",
        display_name: "Tomogashima Channel",
        latitude: 34.283,
        longitude: 135.003,
        source_url: Some("https://www1.kaiho.mlit.go.jp/KAN5/tyouryuu/stream_tomogashima.html"),
        time_offset_minutes: 0,
        reference_station_id: "tomogashima",
        rising_tokens: STRAIT_RISING_TOKENS,
    },
    ReferenceStation {
        id: "iwaya",
        display_name: "Iwaya (north Awaji)",
        latitude: 34.588,
        longitude: 134.993,
        source_url: None,
        time_offset_minutes: 15,
        reference_station_id: "akashi",
        rising_tokens: STRAIT_RISING_TOKENS,
    },
];

/// The default station used when no position is available.
pub fn default_station() -> &'static ReferenceStation {
    &STATIONS[0]
}

pub fn station_by_id(id: &str) -> Option<&'static ReferenceStation> {
    STATIONS.iter().find(|s| s.id == id)
}

/// Nearest registry station to `position` and its distance in km.
pub fn nearest_station(position: Coordinates) -> (&'static ReferenceStation, f64) {
    nearest_in(&STATIONS, position).unwrap_or((default_station(), 0.0))
}

/// Nearest station within an arbitrary registry. Ties keep the earlier entry.
pub fn nearest_in(
    registry: &[ReferenceStation],
    position: Coordinates,
) -> Option<(&ReferenceStation, f64)> {
    let mut best: Option<(&ReferenceStation, f64)> = None;

    for station in registry {
        let d_lat = position.latitude - station.latitude;
        let d_lon = position.longitude - station.longitude;
        let dist = (d_lat * d_lat + d_lon * d_lon).sqrt();

        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((station, dist));
        }
    }

    best.map(|(station, deg)| (station, deg * KM_PER_DEGREE))
}

/// Table URL for a station: its own, else its reference station's.
pub fn resolve_source(station: &ReferenceStation) -> Option<&'static str> {
    station.source_url.or_else(|| {
        station_by_id(station.reference_station_id).and_then(|reference| reference.source_url)
    })
}
