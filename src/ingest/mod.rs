/// Weather data acquisition.
///
/// Submodules:
/// - `openweather`: OpenWeatherMap current-weather client.
/// - `throttle`: minimum spacing between successive fetches.

pub mod openweather;
pub mod throttle;

use crate::model::{FetchError, WeatherObservation};

/// Anything that can report current conditions at a point.
///
/// The batch runner only sees this trait, so tests substitute canned
/// observations for the live API.
pub trait WeatherProvider {
    /// `region_name` is for logging only; the query is by coordinates.
    fn fetch(&self, lat: f64, lon: f64, region_name: &str) -> Result<WeatherObservation, FetchError>;
}

impl<P: WeatherProvider + ?Sized> WeatherProvider for &P {
    fn fetch(&self, lat: f64, lon: f64, region_name: &str) -> Result<WeatherObservation, FetchError> {
        (**self).fetch(lat, lon, region_name)
    }
}
