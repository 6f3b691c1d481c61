/// Fetch pacing.
///
/// The free OpenWeatherMap tier allows 60 calls per minute. Regions are
/// fetched one after another, so holding successive calls at least one
/// second apart keeps a full run under the limit.
///
/// # Clock injection
/// The wait is computed by `remaining_wait`, which takes the previous fetch
/// time and `now` explicitly, so the pacing rule is testable without sleeping.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::ingest::WeatherProvider;
use crate::model::{FetchError, WeatherObservation};

/// Default spacing between fetches.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// Time still to wait before the next fetch may start.
///
/// Returns zero for the first fetch or when `pause` has already elapsed.
pub fn remaining_wait(last_fetch: Option<Instant>, pause: Duration, now: Instant) -> Duration {
    match last_fetch {
        Some(last) => pause.saturating_sub(now.saturating_duration_since(last)),
        None => Duration::ZERO,
    }
}

/// Wraps a provider and spaces its calls at least `pause` apart, measured
/// from the end of one call to the start of the next.
///
/// Failed fetches count as calls: the API saw the request either way.
pub struct ThrottledProvider<P> {
    inner: P,
    pause: Duration,
    last_fetch: Cell<Option<Instant>>,
}

impl<P: WeatherProvider> ThrottledProvider<P> {
    pub fn new(inner: P, pause: Duration) -> Self {
        Self {
            inner,
            pause,
            last_fetch: Cell::new(None),
        }
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: WeatherProvider> WeatherProvider for ThrottledProvider<P> {
    fn fetch(&self, lat: f64, lon: f64, region_name: &str) -> Result<WeatherObservation, FetchError> {
        let wait = remaining_wait(self.last_fetch.get(), self.pause, Instant::now());
        if !wait.is_zero() {
            tracing::trace!(wait_ms = (wait.as_millis() as u64), "pacing weather request");
            std::thread::sleep(wait);
        }
        let result = self.inner.fetch(lat, lon, region_name);
        self.last_fetch.set(Some(Instant::now()));
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
