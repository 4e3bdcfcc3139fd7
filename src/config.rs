//! # Configuration Management
//!
//! Loads runtime settings from `tackle-config.toml`: the default fishing
//! position, target depth, upstream endpoints and cache lifetimes, and the
//! forecast window. Every section and field is optional; anything missing
//! takes its default, and an unreadable or invalid file falls back to the
//! defaults entirely.
//!
//! ```toml
//! [location]
//! default_latitude = 34.616
//! default_longitude = 135.021
//!
//! [fishing]
//! depth = "deep"
//!
//! [network]
//! request_timeout_secs = 10
//! weather_ttl_minutes = 5
//! tide_ttl_minutes = 30
//!
//! [forecast]
//! hours = 4
//! ```

use crate::advisor::AdvisorSettings;
use crate::forecast::DEFAULT_FORECAST_HOURS;
use crate::stations::default_station;
use crate::strategy::DepthCategory;
use crate::weather::DEFAULT_BASE_URL;
use crate::Coordinates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "tackle-config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not write configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration loaded from tackle-config.toml
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub fishing: FishingConfig,
    pub network: NetworkConfig,
    pub forecast: ForecastConfig,
}

/// Position used when no coordinates are given.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    pub default_latitude: f64,
    pub default_longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FishingConfig {
    /// Target depth band: "shallow", "mid" or "deep"
    pub depth: DepthCategory,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Open-Meteo forecast endpoint
    pub weather_base_url: String,
    pub request_timeout_secs: u64,
    pub weather_ttl_minutes: u64,
    pub tide_ttl_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Hours projected after now
    pub hours: u32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let home = default_station();
        LocationConfig {
            default_latitude: home.latitude,
            default_longitude: home.longitude,
        }
    }
}

impl Default for FishingConfig {
    fn default() -> Self {
        FishingConfig {
            depth: DepthCategory::Mid,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            weather_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            weather_ttl_minutes: 5,
            tide_ttl_minutes: 30,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            hours: DEFAULT_FORECAST_HOURS,
        }
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        depth = %config.fishing.depth,
                        "configuration loaded"
                    );
                    config
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write this configuration as TOML to `path`.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    pub fn default_position(&self) -> Coordinates {
        Coordinates {
            latitude: self.location.default_latitude,
            longitude: self.location.default_longitude,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.request_timeout_secs)
    }

    pub fn weather_ttl(&self) -> Duration {
        minutes(self.network.weather_ttl_minutes)
    }

    pub fn tide_ttl(&self) -> Duration {
        minutes(self.network.tide_ttl_minutes)
    }

    pub fn advisor_settings(&self) -> AdvisorSettings {
        AdvisorSettings {
            depth: self.fishing.depth,
            default_position: self.default_position(),
            forecast_hours: self.forecast.hours,
        }
    }
}

fn minutes(count: u64) -> Duration {
    Duration::from_secs(count.saturating_mul(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.location.default_latitude, 34.616);
        assert_eq!(config.fishing.depth, DepthCategory::Mid);
        assert_eq!(config.network.weather_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.weather_ttl(), Duration::from_secs(300));
        assert_eq!(config.tide_ttl(), Duration::from_secs(1800));
        assert_eq!(config.forecast.hours, 4);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[fishing]\ndepth = \"deep\"\n\n[forecast]\nhours = 6").unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.fishing.depth, DepthCategory::Deep);
        assert_eq!(config.forecast.hours, 6);
        assert_eq!(config.network, NetworkConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[fishing]\ndepth = \"abyssal\"").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tackle-config.toml");

        let mut config = Config::default();
        config.location.default_latitude = 34.238;
        config.location.default_longitude = 134.653;
        config.network.tide_ttl_minutes = 15;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.tide_ttl(), Duration::from_secs(900));
        assert_eq!(loaded.advisor_settings().default_position.latitude, 34.238);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[network]\ntide_ttl_minutes = {}", i64::MAX).unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.network.tide_ttl_minutes, i64::MAX as u64);
        assert_eq!(config.tide_ttl(), Duration::from_secs(u64::MAX));
        assert_eq!(config.weather_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\nhours = 3\nutc_offset_hours = 0").unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.forecast.hours, 3);
    }
}
