//! Batch runner.
//!
//! Walks the regions strictly in order, one fetch at a time, and gathers
//! the processed records and the failures into a `BatchResult`. A region
//! failure never stops the run. Request pacing is the provider's concern
//! (see `ingest::throttle`).

use chrono::{DateTime, Local};
use tracing::{info, info_span};

use crate::analysis::suitability::SuitabilityThresholds;
use crate::ingest::WeatherProvider;
use crate::logging::log_region_failure;
use crate::model::{
    BatchMetadata, BatchResult, Region, FORMAT_VERSION, GEODATA_SOURCE, WEATHER_SOURCE,
};
use crate::process::process_region;

/// Machine-readable generation time, e.g. `2025-03-14T09:05:27.123456`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
/// Display generation time, e.g. `14/03/2025 a las 09:05`.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y a las %H:%M";

pub struct BatchRunner<'a, P: ?Sized> {
    provider: &'a P,
    thresholds: &'a SuitabilityThresholds,
}

impl<'a, P: WeatherProvider + ?Sized> BatchRunner<'a, P> {
    pub fn new(provider: &'a P, thresholds: &'a SuitabilityThresholds) -> Self {
        Self {
            provider,
            thresholds,
        }
    }

    /// Runs the batch stamped with the current local time.
    pub fn run(&self, regions: &[Region]) -> BatchResult {
        self.run_at(regions, Local::now())
    }

    /// Runs the batch with an explicit generation time.
    pub fn run_at(&self, regions: &[Region], generated_at: DateTime<Local>) -> BatchResult {
        let total = regions.len();
        let mut processed = Vec::with_capacity(total);
        let mut failures = Vec::new();

        info!(total, "processing regions");

        for (idx, region) in regions.iter().enumerate() {
            let _span = info_span!("region", name = %region.name).entered();
            info!("[{}/{}] Processing: {}", idx + 1, total, region.name);

            match process_region(region, self.provider, self.thresholds) {
                Ok(record) => {
                    info!(
                        verdict = %record.properties.verdict.level,
                        score = record.properties.verdict.score,
                        "completed"
                    );
                    processed.push(record);
                }
                Err(failure) => {
                    log_region_failure(&failure);
                    failures.push(failure);
                }
            }
        }

        BatchResult {
            metadata: BatchMetadata {
                generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
                generated_at_display: generated_at.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
                processed_count: processed.len(),
                failed_count: failures.len(),
                weather_source: WEATHER_SOURCE,
                geodata_source: GEODATA_SOURCE,
                version: FORMAT_VERSION,
            },
            regions: processed,
            failures,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchError, RegionFailureReason, WeatherObservation};
    use chrono::TimeZone;
    use serde_json::json;

    /// Fails any region whose name starts with "Fail".
    struct NameKeyedProvider;

    impl WeatherProvider for NameKeyedProvider {
        fn fetch(&self, _lat: f64, _lon: f64, name: &str) -> Result<WeatherObservation, FetchError> {
            if name.starts_with("Fail") {
                return Err(FetchError::Timeout);
            }
            Ok(WeatherObservation {
                temp_c: 18.0,
                feels_like_c: 18.0,
                humidity_pct: 60,
                wind_speed_ms: 1.0,
                rain_1h_mm: None,
                snow_1h_mm: None,
                description: "nubes dispersas".to_string(),
                icon: "03d".to_string(),
            })
        }
    }

    fn region(name: &str, geometry_type: &str) -> Region {
        Region {
            name: name.to_string(),
            code: String::new(),
            geometry: json!({ "type": geometry_type, "coordinates": [[[-3.7, 40.4], [-3.5, 40.6]]] }),
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 5, 27).unwrap()
    }

    #[test]
    fn test_successes_keep_input_order_and_failures_are_counted() {
        let regions = vec![
            region("Aranjuez", "Polygon"),
            region("FailOne", "Polygon"),
            region("Boadilla", "Polygon"),
            region("Cercedilla", "Point"),
            region("Daganzo", "Polygon"),
        ];
        let thresholds = SuitabilityThresholds::default();
        let result = BatchRunner::new(&NameKeyedProvider, &thresholds).run_at(&regions, fixed_time());

        let names: Vec<_> = result.regions.iter().map(|r| r.properties.name.as_str()).collect();
        assert_eq!(names, vec!["Aranjuez", "Boadilla", "Daganzo"]);
        assert_eq!(result.metadata.processed_count, 3);
        assert_eq!(result.metadata.failed_count, 2);

        let failed: Vec<_> = result.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, vec!["FailOne", "Cercedilla"]);
        assert_eq!(
            result.failures[0].reason,
            RegionFailureReason::FetchFailed(FetchError::Timeout)
        );
    }

    #[test]
    fn test_metadata_timestamps_and_provenance() {
        let thresholds = SuitabilityThresholds::default();
        let result = BatchRunner::new(&NameKeyedProvider, &thresholds).run_at(&[], fixed_time());

        assert_eq!(result.metadata.generated_at, "2025-03-14T09:05:27.000000");
        assert_eq!(result.metadata.generated_at_display, "14/03/2025 a las 09:05");
        assert_eq!(result.metadata.weather_source, "OpenWeatherMap");
        assert_eq!(result.metadata.geodata_source, "ESRI/IGN España");
        assert_eq!(result.metadata.version, "2.0");
        assert!(result.regions.is_empty());
        assert_eq!(result.metadata.failed_count, 0);
    }
}
