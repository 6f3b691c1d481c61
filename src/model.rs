/// Region, WeatherObservation, SuitabilityVerdict, output records and errors
/// core data structures and error handling
///
/// Core data types for the outdoor-activity index service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O: only types, their serialized shape and the small
/// amount of logic that belongs to a type (level colors and headlines).

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// A municipality loaded from the boundary dataset.
///
/// `geometry` is the raw GeoJSON geometry object. It is reduced to a query
/// point by `geometry::centroid_of` and otherwise passed through untouched
/// to the output document.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub code: String,
    pub geometry: serde_json::Value,
}

/// Representative query point of a region, in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub lon: f64,
    pub lat: f64,
}

// ---------------------------------------------------------------------------
// Weather observation
// ---------------------------------------------------------------------------

/// Current conditions at a point, as returned by the weather provider.
///
/// Wind speed is kept in the provider's unit (m/s); `wind_kmh` converts it.
/// Hourly precipitation is `None` when the provider omitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_ms: f64,
    pub rain_1h_mm: Option<f64>,
    pub snow_1h_mm: Option<f64>,
    pub description: String,
    pub icon: String,
}

impl WeatherObservation {
    pub fn wind_kmh(&self) -> f64 {
        self.wind_speed_ms * 3.6
    }

    pub fn rain_mm(&self) -> f64 {
        self.rain_1h_mm.unwrap_or(0.0)
    }

    pub fn snow_mm(&self) -> f64 {
        self.snow_1h_mm.unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Suitability verdict
// ---------------------------------------------------------------------------

/// Suitability levels, serialized with the display client's identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuitabilityLevel {
    #[serde(rename = "verde")]
    Optimal,
    #[serde(rename = "amarillo")]
    Caution,
    #[serde(rename = "rojo")]
    Adverse,
    #[serde(rename = "sin-datos")]
    NoData,
}

impl SuitabilityLevel {
    /// Hex color used by the map display for this level.
    pub fn color(self) -> &'static str {
        match self {
            SuitabilityLevel::Optimal => "#10b981",
            SuitabilityLevel::Caution => "#f59e0b",
            SuitabilityLevel::Adverse => "#ef4444",
            SuitabilityLevel::NoData => "#9ca3af",
        }
    }

    /// Short headline shown next to the level.
    pub fn headline(self) -> &'static str {
        match self {
            SuitabilityLevel::Optimal => "Excelente para salir",
            SuitabilityLevel::Caution => "Aceptable con precauciones",
            SuitabilityLevel::Adverse => "Mejor quedarse en casa",
            SuitabilityLevel::NoData => "Datos no disponibles",
        }
    }
}

impl std::fmt::Display for SuitabilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuitabilityLevel::Optimal => write!(f, "verde"),
            SuitabilityLevel::Caution => write!(f, "amarillo"),
            SuitabilityLevel::Adverse => write!(f, "rojo"),
            SuitabilityLevel::NoData => write!(f, "sin-datos"),
        }
    }
}

/// Outcome of classifying one observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuitabilityVerdict {
    #[serde(rename = "nivel")]
    pub level: SuitabilityLevel,
    #[serde(rename = "puntuacion")]
    pub score: u8,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "consejos")]
    pub advice: Vec<String>,
    pub color: String,
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Rounded weather figures published for a region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    #[serde(rename = "temperatura")]
    pub temp_c: f64,
    #[serde(rename = "sensacion")]
    pub feels_like_c: f64,
    #[serde(rename = "humedad")]
    pub humidity_pct: u8,
    #[serde(rename = "viento")]
    pub wind_kmh: f64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "icono")]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProperties {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo_ine")]
    pub code: String,
    #[serde(rename = "coordenadas")]
    pub centroid: RoundedPoint,
    #[serde(rename = "clima")]
    pub weather: WeatherSummary,
    #[serde(rename = "indice")]
    pub verdict: SuitabilityVerdict,
}

/// Centroid rounded to 6 decimal places, serialized lat-first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundedPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One successfully processed region, shaped as a GeoJSON Feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedRegionRecord {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: RegionProperties,
    pub geometry: serde_json::Value,
}

/// Fixed provenance and format strings written to every snapshot.
pub const WEATHER_SOURCE: &str = "OpenWeatherMap";
pub const GEODATA_SOURCE: &str = "ESRI/IGN España";
pub const FORMAT_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchMetadata {
    #[serde(rename = "ultima_actualizacion")]
    pub generated_at: String,
    #[serde(rename = "ultima_actualizacion_formateada")]
    pub generated_at_display: String,
    #[serde(rename = "total_municipios")]
    pub processed_count: usize,
    #[serde(rename = "municipios_con_error")]
    pub failed_count: usize,
    #[serde(rename = "fuente_clima")]
    pub weather_source: &'static str,
    #[serde(rename = "fuente_geodatos")]
    pub geodata_source: &'static str,
    #[serde(rename = "version_script")]
    pub version: &'static str,
}

/// Output of one batch run.
///
/// `failures` is kept for reporting only and is not part of the written
/// document; the document carries just the count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub metadata: BatchMetadata,
    #[serde(rename = "municipios")]
    pub regions: Vec<ProcessedRegionRecord>,
    #[serde(skip)]
    pub failures: Vec<RegionFailure>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while reducing a boundary geometry to a point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Any geometry kind other than Polygon / MultiPolygon.
    #[error("unsupported geometry type: {0}")]
    Unsupported(String),
    /// A Polygon / MultiPolygon whose coordinates do not have the expected shape.
    #[error("malformed geometry: {0}")]
    Malformed(String),
    /// The exterior ring has no positions to average.
    #[error("exterior ring is empty")]
    EmptyRing,
}

/// Errors that can arise when fetching current weather for a point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// Non-2xx HTTP response from the weather API.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Connection, DNS or other transport failure.
    #[error("network error: {0}")]
    Network(String),
    /// The response body could not be decoded as an observation.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Why a region was left out of the output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionFailureReason {
    #[error(transparent)]
    UnsupportedGeometry(#[from] GeometryError),
    #[error(transparent)]
    FetchFailed(#[from] FetchError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// A skipped region, named for the failure report.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFailure {
    pub name: String,
    pub reason: RegionFailureReason,
}

/// Fatal conditions that abort a run before any output is written.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("OPENWEATHER_API_KEY is not set; configure it before running")]
    MissingApiKey,
    #[error("input dataset not found: {0}")]
    InputNotFound(String),
    #[error("could not read input dataset {path}: {source}")]
    InputUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("input dataset {path} is not valid JSON: {source}")]
    InputMalformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("input dataset {0} has no 'features' array")]
    MissingFeatures(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),
    #[error("could not write output {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}
