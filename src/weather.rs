//! # Marine Weather Fetching
//!
//! Open-Meteo forecast client: current wind/cloud/rain plus 48 hours of hourly
//! sea-surface temperature, wind, weather code and rain, in JST with wind in
//! m/s. Unlike the tide table there is no model to fall back on, so a missing
//! report stops the evaluation (see [`crate::advisor`]).

use crate::cache::TtlCache;
use crate::EnvironmentSnapshot;
use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Default TTL for a weather report (5 minutes).
pub const DEFAULT_WEATHER_TTL: Duration = Duration::from_secs(300);

const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m,wind_direction_10m,cloud_cover,rain";
const HOURLY_FIELDS: &str =
    "sea_surface_temperature,wind_speed_10m,wind_direction_10m,weather_code,rain";
const TIMEZONE: &str = "Asia/Tokyo";
/// UTC offset of [`TIMEZONE`]; JST has no daylight saving.
const LOCAL_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Clock the hourly arrays are indexed on.
pub fn local_clock() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Sea-surface temperature climatology for the eastern Seto Inland Sea (°C),
/// January first. Used when the hourly SST is missing.
const HISTORICAL_SEA_TEMPS: [f64; 12] = [
    10.5, 9.8, 10.5, 13.0, 17.5, 21.0, 25.5, 27.0, 25.5, 22.0, 18.0, 14.0,
];

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// Current conditions block of the forecast response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    #[serde(rename = "temperature_2m")]
    pub air_temperature: f64,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
    #[serde(rename = "wind_direction_10m")]
    pub wind_direction: f64,
    pub cloud_cover: f64,
    #[serde(default)]
    pub rain: f64,
}

/// Hourly arrays, index 0 = 00:00 JST today. Nulls are common for SST.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub sea_surface_temperature: Vec<Option<f64>>,
    #[serde(default, rename = "wind_speed_10m")]
    pub wind_speed: Vec<Option<f64>>,
    #[serde(default, rename = "wind_direction_10m")]
    pub wind_direction: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<i32>>,
    #[serde(default)]
    pub rain: Vec<Option<f64>>,
}

/// One hour pulled out of [`HourlyWeather`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourlySample {
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub sea_surface_temp: Option<f64>,
    pub weather_code: Option<i32>,
    pub rain: Option<f64>,
}

impl HourlyWeather {
    /// Sample at `index`; `None` unless both wind fields are present.
    pub fn at(&self, index: usize) -> Option<HourlySample> {
        let wind_speed = self.wind_speed.get(index).copied().flatten()?;
        let wind_direction = self.wind_direction.get(index).copied().flatten()?;

        Some(HourlySample {
            wind_speed,
            wind_direction,
            sea_surface_temp: self.sea_surface_temp(index),
            weather_code: self.weather_code.get(index).copied().flatten(),
            rain: self.rain.get(index).copied().flatten(),
        })
    }

    pub fn sea_surface_temp(&self, index: usize) -> Option<f64> {
        self.sea_surface_temperature.get(index).copied().flatten()
    }
}

/// Full forecast response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    #[serde(default)]
    pub hourly: HourlyWeather,
}

impl WeatherReport {
    /// Current environment, taking SST from the hourly array at `hour` or the
    /// monthly climatology when that slot is empty.
    pub fn snapshot(&self, hour: usize, month: u32) -> EnvironmentSnapshot {
        let sea_surface_temp_c = self
            .hourly
            .sea_surface_temp(hour)
            .unwrap_or_else(|| historical_sea_temp(month));

        EnvironmentSnapshot {
            wind_speed_ms: self.current.wind_speed,
            wind_direction_deg: self.current.wind_direction,
            sea_surface_temp_c,
            cloud_cover_pct: self.current.cloud_cover,
            rain_mm: self.current.rain,
        }
        .normalized()
    }
}

/// Typical sea temperature for a month (1–12); out-of-range months get 15 °C.
pub fn historical_sea_temp(month: u32) -> f64 {
    month
        .checked_sub(1)
        .and_then(|i| HISTORICAL_SEA_TEMPS.get(i as usize))
        .copied()
        .unwrap_or(15.0)
}

/// Fetch-by-coordinates weather capability. `None` means no data.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Option<WeatherReport>;
}

#[async_trait]
impl<T: WeatherSource + ?Sized> WeatherSource for Arc<T> {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Option<WeatherReport> {
        (**self).fetch(latitude, longitude).await
    }
}

/// Open-Meteo forecast client.
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    cache: TtlCache<String, WeatherReport>,
}

impl OpenMeteoClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        ttl: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(OpenMeteoClient {
            client,
            base_url: base_url.into(),
            cache: TtlCache::new(ttl),
        })
    }

    pub async fn fetch_report(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, WeatherError> {
        let key = format!("{latitude:.4},{longitude:.4}");
        if let Some(report) = self.cache.get(&key).await {
            debug!(%key, "weather served from cache");
            return Ok(report);
        }

        debug!(base_url = %self.base_url, %key, "fetching weather");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("timezone", TIMEZONE.to_string()),
                ("forecast_days", "2".to_string()),
                ("wind_speed_unit", "ms".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let report: WeatherReport = response.json().await?;
        self.cache.insert(key, report.clone()).await;
        Ok(report)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Option<WeatherReport> {
        match self.fetch_report(latitude, longitude).await {
            Ok(report) => Some(report),
            Err(error) => {
                warn!(latitude, longitude, %error, "weather unavailable");
                None
            }
        }
    }
}
