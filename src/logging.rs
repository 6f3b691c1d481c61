/// Structured logging for the outdoor index service
///
/// Installs a `tracing` subscriber that writes to the console and,
/// optionally, appends plain-text lines to a log file for unattended runs.
/// Also classifies per-region failures so the log level reflects whether a
/// failure is routine or points at a configuration or service problem.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use crate::model::{FetchError, RegionFailure, RegionFailureReason};

/// How many failed region names the run summary lists before eliding.
pub const SUMMARY_NAME_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Subscriber setup
// ---------------------------------------------------------------------------

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `default_level` when set. The file layer, when
/// configured, never carries ANSI color codes.
pub fn init_logging(default_level: &str, log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = tfmt::layer().with_writer(std::io::stderr).with_target(false);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tfmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the dataset holds a geometry we do not reduce
    Expected,
    /// Unexpected failure - bad key, quota exhausted, provider outage, or a bug
    Unexpected,
    /// Unknown - transient network conditions, cannot tell yet
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify a region failure by its reason.
pub fn classify_failure(reason: &RegionFailureReason) -> FailureType {
    match reason {
        RegionFailureReason::UnsupportedGeometry(_) => FailureType::Expected,
        RegionFailureReason::FetchFailed(FetchError::Http(_)) => FailureType::Unexpected,
        RegionFailureReason::FetchFailed(_) => FailureType::Unknown,
        RegionFailureReason::Unexpected(_) => FailureType::Unexpected,
    }
}

/// Log a region failure at the level its classification calls for.
pub fn log_region_failure(failure: &RegionFailure) {
    let class = classify_failure(&failure.reason);
    match class {
        FailureType::Expected => info!(region = %failure.name, class = %class, "skipped: {}", failure.reason),
        FailureType::Unknown => warn!(region = %failure.name, class = %class, "skipped: {}", failure.reason),
        FailureType::Unexpected => error!(region = %failure.name, class = %class, "skipped: {}", failure.reason),
    }
}

// ---------------------------------------------------------------------------
// Run Summary
// ---------------------------------------------------------------------------

/// Lists up to `SUMMARY_NAME_LIMIT` names, noting how many were left out.
pub fn summarize_failed_names<S: AsRef<str>>(names: &[S]) -> String {
    let shown: Vec<&str> = names
        .iter()
        .take(SUMMARY_NAME_LIMIT)
        .map(AsRef::as_ref)
        .collect();
    let mut line = shown.join(", ");
    if names.len() > SUMMARY_NAME_LIMIT {
        line.push_str(&format!(" ... and {} more", names.len() - SUMMARY_NAME_LIMIT));
    }
    line
}

/// Log a summary of the batch run.
pub fn log_batch_summary(processed: usize, failures: &[RegionFailure]) {
    let total = processed + failures.len();
    let message = format!(
        "Run complete: {}/{} regions processed, {} failed",
        processed,
        total,
        failures.len()
    );

    if failures.is_empty() {
        info!("{}", message);
        return;
    }

    let names: Vec<&str> = failures.iter().map(|f| f.name.as_str()).collect();
    if processed == 0 {
        error!("{}", message);
    } else {
        warn!("{}", message);
    }
    warn!("Failed regions: {}", summarize_failed_names(&names));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeometryError;

    #[test]
    fn test_failure_classification() {
        let geometry = RegionFailureReason::UnsupportedGeometry(GeometryError::Unsupported("Point".into()));
        assert_eq!(classify_failure(&geometry), FailureType::Expected);

        let http = RegionFailureReason::FetchFailed(FetchError::Http(401));
        assert_eq!(classify_failure(&http), FailureType::Unexpected);

        let timeout = RegionFailureReason::FetchFailed(FetchError::Timeout);
        assert_eq!(classify_failure(&timeout), FailureType::Unknown);

        let parse = RegionFailureReason::FetchFailed(FetchError::Parse("eof".into()));
        assert_eq!(classify_failure(&parse), FailureType::Unknown);

        let other = RegionFailureReason::Unexpected("boom".into());
        assert_eq!(classify_failure(&other), FailureType::Unexpected);
    }

    #[test]
    fn test_summary_lists_all_names_when_few() {
        assert_eq!(summarize_failed_names(&["Getafe", "Parla"]), "Getafe, Parla");
        assert_eq!(summarize_failed_names::<&str>(&[]), "");
    }

    #[test]
    fn test_summary_elides_beyond_five_names() {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        assert_eq!(summarize_failed_names(&names), "A, B, C, D, E ... and 2 more");
    }

    #[test]
    fn test_summary_with_exactly_five_names_has_no_suffix() {
        let names = ["A", "B", "C", "D", "E"];
        assert_eq!(summarize_failed_names(&names), "A, B, C, D, E");
    }
}
