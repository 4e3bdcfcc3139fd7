//! # Short-Range Forecast
//!
//! Repeats the tide fusion, strategy and scoring pass for each of the next few
//! whole hours.
//!
//! ## Hour indexing
//! Open-Meteo's hourly arrays start at 00:00 today on the local clock, so the
//! slot for `now + i` hours is `now.hour + i`. Past midnight that runs into the
//! second forecast day, which the two-day request covers.
//!
//! ## Missing data
//! When the hourly slot is absent (array too short or null wind), the row
//! reuses the current conditions with zero rain and is flagged
//! `weather_available = false`. The tide for the row is still fused normally.

use crate::fusion::TideFusionEngine;
use crate::scoring::{self, ConditionIndex};
use crate::stations::ReferenceStation;
use crate::strategy::{self, DepthCategory, StrategyRecommendation};
use crate::tide_data::TideTableSource;
use crate::weather::WeatherReport;
use crate::{EnvironmentSnapshot, TideState};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_FORECAST_HOURS: u32 = 4;

/// Coarse sky class from a WMO weather code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sky {
    Clear,
    Cloudy,
    Rain,
    Unknown,
}

impl Sky {
    /// Codes 0–3 are clear to overcast, 4–50 fog and haze, above 50 precipitation.
    pub fn from_weather_code(code: Option<i32>) -> Sky {
        match code {
            Some(c) if c > 50 => Sky::Rain,
            Some(c) if c > 3 => Sky::Cloudy,
            Some(_) => Sky::Clear,
            None => Sky::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sky::Clear => "clear",
            Sky::Cloudy => "cloudy",
            Sky::Rain => "rain",
            Sky::Unknown => "-",
        }
    }
}

/// One projected hour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub environment: EnvironmentSnapshot,
    pub weather_available: bool,
    pub weather_code: Option<i32>,
    pub sky: Sky,
    pub tide: TideState,
    pub is_synced: bool,
    pub strategy: StrategyRecommendation,
    pub condition: ConditionIndex,
    /// Falls on a later calendar date than the query
    pub is_next_day: bool,
}

/// Projects evaluations for the hours after `now`.
pub struct ForecastProjector {
    hours: u32,
    depth: DepthCategory,
}

impl ForecastProjector {
    pub fn new(hours: u32, depth: DepthCategory) -> Self {
        ForecastProjector { hours, depth }
    }

    /// Build `hours` chronological entries, `now + 1h` first.
    ///
    /// `current` is the environment already resolved for `now`; it fills in
    /// cloud cover (not forecast hourly) and any missing hourly slot.
    pub async fn project<S: TideTableSource>(
        &self,
        fusion: &TideFusionEngine<S>,
        station: &ReferenceStation,
        report: &WeatherReport,
        current: &EnvironmentSnapshot,
        now: DateTime<FixedOffset>,
    ) -> Vec<ForecastEntry> {
        let mut entries = Vec::with_capacity(self.hours as usize);

        for i in 1..=self.hours {
            let timestamp = now + Duration::hours(i as i64);
            let index = (now.hour() + i) as usize;

            let (environment, weather_available, weather_code) =
                hourly_environment(report, current, index);
            if !weather_available {
                debug!(index, "no hourly weather, reusing current conditions");
            }

            let tide = fusion.fuse(timestamp, now, station).await;
            let strategy = strategy::recommend(&environment, &tide, self.depth, timestamp.month());
            let condition = scoring::score(
                tide.factor(),
                strategy.is_synced,
                environment.wind_speed_ms,
                environment.sea_surface_temp_c,
                environment.rain_mm,
            );

            entries.push(ForecastEntry {
                timestamp,
                environment,
                weather_available,
                weather_code,
                sky: Sky::from_weather_code(weather_code),
                is_synced: strategy.is_synced,
                is_next_day: timestamp.date_naive() != now.date_naive(),
                tide,
                strategy,
                condition,
            });
        }

        entries
    }
}

fn hourly_environment(
    report: &WeatherReport,
    current: &EnvironmentSnapshot,
    index: usize,
) -> (EnvironmentSnapshot, bool, Option<i32>) {
    match report.hourly.at(index) {
        Some(sample) => {
            let environment = EnvironmentSnapshot {
                wind_speed_ms: sample.wind_speed,
                wind_direction_deg: sample.wind_direction,
                sea_surface_temp_c: sample.sea_surface_temp.unwrap_or(current.sea_surface_temp_c),
                cloud_cover_pct: current.cloud_cover_pct,
                rain_mm: sample.rain.unwrap_or(0.0),
            }
            .normalized();
            (environment, true, sample.weather_code)
        }
        None => (
            EnvironmentSnapshot {
                rain_mm: 0.0,
                ..*current
            },
            false,
            None,
        ),
    }
}
