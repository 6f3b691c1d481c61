//! `outdoor-index`: one unattended update of the weather snapshot.
//!
//! Exit status is 0 whenever a snapshot was written, even if some regions
//! were skipped, and 1 when a precondition fails (missing key, unreadable
//! dataset or config, unwritable output).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use outdoor_index_service::batch::BatchRunner;
use outdoor_index_service::config::{api_key_from_env, AppConfig};
use outdoor_index_service::ingest::openweather::OpenWeatherClient;
use outdoor_index_service::ingest::throttle::ThrottledProvider;
use outdoor_index_service::logging::{init_logging, log_batch_summary};
use outdoor_index_service::model::PreconditionError;
use outdoor_index_service::output::write_snapshot;
use outdoor_index_service::regions::load_regions;

#[derive(Debug, Parser)]
#[command(name = "outdoor-index", version, about = "Update the municipal outdoor-activity weather snapshot")]
struct Args {
    /// TOML configuration file (defaults to ./outdoor_index.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection with municipal boundaries
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the JSON snapshot
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Minimum milliseconds between weather requests
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// A fatal error, tagged with whether the tracing subscriber was installed
/// when it happened.
#[derive(Debug)]
struct RunError {
    error: PreconditionError,
    logging_ready: bool,
}

impl RunError {
    fn before_logging(error: PreconditionError) -> Self {
        Self {
            error,
            logging_ready: false,
        }
    }

    fn logged(error: PreconditionError) -> Self {
        Self {
            error,
            logging_ready: true,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError { error, logging_ready: true }) => {
            error!("{}", error);
            ExitCode::FAILURE
        }
        Err(RunError { error, logging_ready: false }) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), RunError> {
    let config = configure(&args).map_err(RunError::before_logging)?;

    let level = if args.verbose { "debug" } else { "info" };
    init_logging(level, config.paths.log_file.as_deref()).map_err(|e| {
        RunError::before_logging(PreconditionError::Config(format!(
            "could not open log file: {}",
            e
        )))
    })?;

    update_snapshot(&config).map_err(RunError::logged)
}

/// Loads the config file and applies the command-line overrides.
fn configure(args: &Args) -> Result<AppConfig, PreconditionError> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(input) = &args.input {
        config.paths.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.paths.output = output.clone();
    }
    if let Some(log_file) = &args.log_file {
        config.paths.log_file = Some(log_file.clone());
    }
    if let Some(pause_ms) = args.pause_ms {
        config.fetch.pause_ms = pause_ms;
    }
    Ok(config)
}

fn update_snapshot(config: &AppConfig) -> Result<(), PreconditionError> {
    info!("Starting weather snapshot update");

    let api_key = api_key_from_env()?;
    info!("OpenWeatherMap API key found");

    info!(path = %config.paths.input.display(), "Reading boundary dataset");
    let regions = load_regions(&config.paths.input, &config.regions)?;
    info!(count = regions.len(), "Boundary dataset loaded");

    let client = OpenWeatherClient::new(
        &config.fetch.base_url,
        &api_key,
        config.fetch.timeout(),
        &config.fetch.units,
        &config.fetch.lang,
    )
    .map_err(|e| PreconditionError::HttpClient(e.to_string()))?;
    let provider = ThrottledProvider::new(client, config.fetch.pause());
    info!(pause_ms = (provider.pause().as_millis() as u64), "Weather requests are paced");

    let result = BatchRunner::new(&provider, &config.thresholds).run(&regions);

    write_snapshot(&result, &config.paths.output)?;
    info!(path = %config.paths.output.display(), "Snapshot written");

    log_batch_summary(result.metadata.processed_count, &result.failures);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
