/// Per-region pipeline: geometry → query point → weather → verdict → record.
///
/// Every failure path comes back as a `RegionFailure` value naming the
/// region, so the batch runner can count it and move on.

use crate::analysis::suitability::{classify, SuitabilityThresholds};
use crate::geometry::centroid_of;
use crate::ingest::WeatherProvider;
use crate::model::{
    ProcessedRegionRecord, Region, RegionFailure, RegionFailureReason, RegionProperties,
    RoundedPoint, WeatherObservation, WeatherSummary,
};

/// Rounds to `places` decimals by the exact binary value, ties to even.
///
/// Fixed-precision formatting is correctly rounded, so `21.25` becomes
/// `21.2` and `2.675` (stored just below) becomes `2.67`. Scaling by a power
/// of ten and calling `f64::round` would give `21.3` and `2.68`.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Processes one region against a weather provider.
pub fn process_region<P: WeatherProvider + ?Sized>(
    region: &Region,
    provider: &P,
    thresholds: &SuitabilityThresholds,
) -> Result<ProcessedRegionRecord, RegionFailure> {
    let fail = |reason: RegionFailureReason| RegionFailure {
        name: region.name.clone(),
        reason,
    };

    let centroid = centroid_of(&region.geometry).map_err(|e| fail(e.into()))?;
    if !(centroid.lat.is_finite() && centroid.lon.is_finite()) {
        return Err(fail(RegionFailureReason::Unexpected(
            "centroid is not a finite coordinate".to_string(),
        )));
    }

    let observation = provider
        .fetch(centroid.lat, centroid.lon, &region.name)
        .map_err(|e| fail(e.into()))?;
    check_observation(&observation).map_err(|msg| fail(RegionFailureReason::Unexpected(msg)))?;

    let verdict = classify(Some(&observation), thresholds);

    Ok(ProcessedRegionRecord {
        kind: "Feature",
        properties: RegionProperties {
            name: region.name.clone(),
            code: region.code.clone(),
            centroid: RoundedPoint {
                lat: round_to(centroid.lat, 6),
                lon: round_to(centroid.lon, 6),
            },
            weather: summarize(&observation),
            verdict,
        },
        geometry: region.geometry.clone(),
    })
}

/// Non-finite readings cannot be scored or serialized as JSON numbers.
fn check_observation(obs: &WeatherObservation) -> Result<(), String> {
    let readings = [
        ("temperature", obs.temp_c),
        ("feels_like", obs.feels_like_c),
        ("wind speed", obs.wind_speed_ms),
        ("rain", obs.rain_mm()),
        ("snow", obs.snow_mm()),
    ];
    match readings.iter().find(|(_, v)| !v.is_finite()) {
        Some((field, value)) => Err(format!("observation {} is not finite ({})", field, value)),
        None => Ok(()),
    }
}

fn summarize(obs: &WeatherObservation) -> WeatherSummary {
    WeatherSummary {
        temp_c: round_to(obs.temp_c, 1),
        feels_like_c: round_to(obs.feels_like_c, 1),
        humidity_pct: obs.humidity_pct,
        wind_kmh: round_to(obs.wind_kmh(), 1),
        description: obs.description.clone(),
        icon: obs.icon.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
