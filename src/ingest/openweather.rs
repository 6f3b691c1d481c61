/// OpenWeatherMap Current Weather API Client
///
/// Retrieves current conditions for a single point from the OpenWeatherMap
/// "current weather" endpoint, in metric units with Spanish descriptions.
///
/// API Documentation: https://openweathermap.org/current

use std::time::Duration;

use serde::Deserialize;

use crate::ingest::WeatherProvider;
use crate::model::{FetchError, WeatherObservation};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

// ============================================================================
// OpenWeatherMap API Response Structures
// ============================================================================

/// Current weather response. Only the fields the index needs are decoded.
#[derive(Debug, Deserialize)]
pub struct OwmCurrentResponse {
    pub main: OwmMain,
    pub wind: OwmWind,
    #[serde(default)]
    pub rain: Option<OwmPrecip>,
    #[serde(default)]
    pub snow: Option<OwmPrecip>,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
pub struct OwmMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub struct OwmWind {
    pub speed: f64, // m/s with units=metric
}

/// Precipitation volume block; only present while it rains or snows.
#[derive(Debug, Deserialize)]
pub struct OwmPrecip {
    #[serde(rename = "1h")]
    pub one_hour_mm: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OwmCondition {
    pub description: String,
    pub icon: String,
}

// ============================================================================
// API Client
// ============================================================================

/// Blocking client for the current weather endpoint.
pub struct OpenWeatherClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    units: String,
    lang: String,
}

impl OpenWeatherClient {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        units: &str,
        lang: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            units: units.to_string(),
            lang: lang.to_string(),
        })
    }

    /// Fetch current conditions at a point.
    ///
    /// # Parameters
    /// - `lat`, `lon`: WGS84 degrees
    ///
    /// # Returns
    /// The decoded observation, or the reason the request failed
    pub fn fetch_current(&self, lat: f64, lon: f64) -> Result<WeatherObservation, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
                ("lang", self.lang.clone()),
            ])
            .header("Accept", "application/json")
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.text().map_err(transport_error)?;
        parse_current_response(&body)
    }
}

impl WeatherProvider for OpenWeatherClient {
    fn fetch(&self, lat: f64, lon: f64, _region_name: &str) -> Result<WeatherObservation, FetchError> {
        self.fetch_current(lat, lon)
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = err.status() {
        FetchError::Http(status.as_u16())
    } else {
        FetchError::Network(err.to_string())
    }
}

/// Parse a current weather JSON body into our observation format.
pub fn parse_current_response(body: &str) -> Result<WeatherObservation, FetchError> {
    let raw: OwmCurrentResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    into_observation(raw)
}

fn into_observation(raw: OwmCurrentResponse) -> Result<WeatherObservation, FetchError> {
    let condition = raw
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Parse("response has no weather conditions".to_string()))?;

    Ok(WeatherObservation {
        temp_c: raw.main.temp,
        feels_like_c: raw.main.feels_like,
        humidity_pct: raw.main.humidity,
        wind_speed_ms: raw.wind.speed,
        rain_1h_mm: raw.rain.and_then(|r| r.one_hour_mm),
        snow_1h_mm: raw.snow.and_then(|s| s.one_hour_mm),
        description: condition.description,
        icon: condition.icon,
    })
}

// ============================================================================
// Tests
// ============================================================================
