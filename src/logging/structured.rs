//! Run-log setup using tracing
//!
//! Each run writes a plain-text log file next to the export, truncated at the
//! start of the run, and optionally mirrors the same lines to the console.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tautulli_exporter::config::LoggingConfig;
//! use tautulli_exporter::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging(Path::new("/data/exports/movies_log.txt"), &config)
//!     .expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{ExporterError, Result};
use std::fs::File;
use std::path::Path;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Timestamp format of every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Guard that must be kept alive for the duration of the run
/// to ensure the log file is flushed
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Local wall-clock timestamps, second precision
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Build the run-log subscriber without installing it
///
/// The log file is created (or truncated). Callers decide whether the
/// subscriber becomes the global default or is scoped to a thread.
///
/// # Errors
///
/// Returns an error if the level is invalid or the file cannot be created.
pub fn build_subscriber(
    log_path: &Path,
    config: &LoggingConfig,
) -> Result<(impl Subscriber + Send + Sync + 'static, LoggingGuard)> {
    let log_level = parse_log_level(&config.log_level)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tautulli_exporter={log_level}")));

    let file = File::create(log_path).map_err(|e| {
        ExporterError::Io(format!(
            "Failed to create log file {}: {e}",
            log_path.display()
        ))
    })?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let mut layers = Vec::new();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(LocalTimestamp)
        .with_writer(non_blocking)
        .with_filter(env_filter.clone());
    layers.push(file_layer.boxed());

    if config.console_enabled {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_timer(LocalTimestamp)
            .with_filter(env_filter);
        layers.push(console_layer.boxed());
    }

    let subscriber = tracing_subscriber::registry().with(layers);
    Ok((subscriber, LoggingGuard::new(Some(guard))))
}

/// Initialize logging for this process
///
/// # Returns
///
/// A `LoggingGuard` that must be kept alive until the run ends
pub fn init_logging(log_path: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    let (subscriber, guard) = build_subscriber(log_path, config)?;

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        ExporterError::Configuration(format!("Failed to install log subscriber: {e}"))
    })?;

    tracing::debug!(
        log_path = %log_path.display(),
        log_level = %config.log_level,
        console_enabled = config.console_enabled,
        "Logging initialized"
    );

    Ok(guard)
}

/// Parse log level from string
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(ExporterError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
