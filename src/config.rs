/// Service configuration.
///
/// Settings come from an optional TOML file; the API key comes from the
/// environment (a `.env` file is loaded first when present). Every setting
/// has a default, so an empty or absent file describes the standard run.
///
/// ```toml
/// [paths]
/// input = "data/municipios_madrid.geojson"
/// output = "data/weather_data.json"
///
/// [fetch]
/// timeout_secs = 10
/// pause_ms = 1000
///
/// [thresholds]
/// optimal_min = 15.0
/// wind_dangerous = 40.0
/// ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::analysis::suitability::SuitabilityThresholds;
use crate::ingest::openweather::OPENWEATHER_BASE_URL;
use crate::ingest::throttle::DEFAULT_PAUSE;
use crate::model::PreconditionError;
use crate::regions::RegionKeys;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "outdoor_index.toml";

/// Environment variable holding the OpenWeatherMap key.
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub fetch: FetchConfig,
    pub regions: RegionKeys,
    pub thresholds: SuitabilityThresholds,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/municipios_madrid.geojson"),
            output: PathBuf::from("data/weather_data.json"),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub pause_ms: u64,
    pub units: String,
    pub lang: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: OPENWEATHER_BASE_URL.to_string(),
            timeout_secs: 10,
            pause_ms: DEFAULT_PAUSE.as_millis() as u64,
            units: "metric".to_string(),
            lang: "es".to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl AppConfig {
    /// Parses configuration text and validates the thresholds.
    pub fn from_toml_str(text: &str) -> Result<Self, PreconditionError> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| PreconditionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, `DEFAULT_CONFIG_FILE` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, PreconditionError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(AppConfig::default());
                }
                default
            }
        };

        let text = fs::read_to_string(&path).map_err(|e| {
            PreconditionError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), PreconditionError> {
        self.thresholds
            .validate()
            .map_err(PreconditionError::InvalidThresholds)?;
        if self.fetch.timeout_secs == 0 {
            return Err(PreconditionError::Config(
                "fetch.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads the API key from the environment, after loading `.env` if present.
pub fn api_key_from_env() -> Result<String, PreconditionError> {
    dotenv::dotenv().ok();
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

/// A blank key is treated the same as a missing one.
pub fn api_key_from(value: Option<String>) -> Result<String, PreconditionError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(PreconditionError::MissingApiKey),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
