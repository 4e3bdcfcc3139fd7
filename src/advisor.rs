//! One full evaluation pass: locate, fuse the tide, recommend, score, pick a
//! seat and project the next hours.

use crate::forecast::{ForecastEntry, ForecastProjector, DEFAULT_FORECAST_HOURS};
use crate::fusion::TideFusionEngine;
use crate::scoring::{self, ConditionIndex};
use crate::seat::{self, Seat};
use crate::stations::{self, ReferenceStation, REMOTE_DISTANCE_KM};
use crate::strategy::{self, DepthCategory, DepthWeight, StrategyRecommendation};
use crate::tide_data::TideTableSource;
use crate::weather::{self, WeatherSource};
use crate::{Coordinates, EnvironmentSnapshot, TideState};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq)]
pub enum AdvisorError {
    /// No weather report could be obtained; there is nothing to fall back on.
    #[error("weather data unavailable for {latitude:.3}, {longitude:.3}")]
    WeatherUnavailable { latitude: f64, longitude: f64 },
}

/// Knobs for an [`Advisor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdvisorSettings {
    pub depth: DepthCategory,
    /// Used when the caller has no position
    pub default_position: Coordinates,
    pub forecast_hours: u32,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        let home = stations::default_station();
        AdvisorSettings {
            depth: DepthCategory::Mid,
            default_position: Coordinates {
                latitude: home.latitude,
                longitude: home.longitude,
            },
            forecast_hours: DEFAULT_FORECAST_HOURS,
        }
    }
}

/// Everything one evaluation produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assessment {
    pub position: Coordinates,
    pub station: &'static ReferenceStation,
    pub distance_km: f64,
    /// Station is far enough away that its tide is only indicative
    pub is_remote: bool,
    pub evaluated_at: DateTime<FixedOffset>,
    pub depth: DepthCategory,
    pub environment: EnvironmentSnapshot,
    pub tide: TideState,
    pub strategy: StrategyRecommendation,
    pub weight_chart: Vec<DepthWeight>,
    pub condition: ConditionIndex,
    pub seat: Seat,
    pub highlighted_seats: Vec<Seat>,
    pub forecast: Vec<ForecastEntry>,
}

pub struct Advisor<T, W> {
    fusion: TideFusionEngine<T>,
    weather: W,
    projector: ForecastProjector,
    settings: AdvisorSettings,
}

impl<T: TideTableSource, W: WeatherSource> Advisor<T, W> {
    pub fn new(tide_source: T, weather: W, settings: AdvisorSettings) -> Self {
        Advisor {
            fusion: TideFusionEngine::new(tide_source),
            weather,
            projector: ForecastProjector::new(settings.forecast_hours, settings.depth),
            settings,
        }
    }

    /// Evaluate conditions at `now` for `position` (or the default position).
    ///
    /// `now` may carry any offset; it is moved onto the weather clock (JST)
    /// before hourly slots are indexed or calendar days compared.
    pub async fn evaluate(
        &self,
        position: Option<Coordinates>,
        now: DateTime<FixedOffset>,
    ) -> Result<Assessment, AdvisorError> {
        let now = now.with_timezone(&weather::local_clock());
        let position = position.unwrap_or(self.settings.default_position);
        let (station, distance_km) = stations::nearest_station(position);
        debug!(station = station.id, distance_km, "nearest station resolved");

        let report = self
            .weather
            .fetch(position.latitude, position.longitude)
            .await
            .ok_or(AdvisorError::WeatherUnavailable {
                latitude: position.latitude,
                longitude: position.longitude,
            })?;

        let environment = report.snapshot(now.hour() as usize, now.month());
        let tide = self.fusion.fuse(now, now, station).await;

        let strategy = strategy::recommend(&environment, &tide, self.settings.depth, now.month());
        let weight_chart = strategy::weight_chart(
            tide.factor(),
            strategy.is_synced,
            environment.wind_speed_ms,
        );
        let condition = scoring::score(
            tide.factor(),
            strategy.is_synced,
            environment.wind_speed_ms,
            environment.sea_surface_temp_c,
            environment.rain_mm,
        );
        let seat = seat::best_seat(
            environment.wind_direction_deg,
            strategy.tide_direction_deg as f64,
        );

        let forecast = self
            .projector
            .project(&self.fusion, station, &report, &environment, now)
            .await;

        info!(
            station = station.id,
            authoritative = tide.is_authoritative(),
            score = condition.value,
            seat = seat.code(),
            "conditions evaluated"
        );

        Ok(Assessment {
            position,
            station,
            distance_km,
            is_remote: distance_km > REMOTE_DISTANCE_KM,
            evaluated_at: now,
            depth: self.settings.depth,
            environment,
            tide,
            strategy,
            weight_chart,
            condition,
            seat,
            highlighted_seats: seat.highlighted(),
            forecast,
        })
    }
}
