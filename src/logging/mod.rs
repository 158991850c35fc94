//! Logging and observability
//!
//! This module provides the run log:
//! - Plain-text file next to the export, truncated each run
//! - Optional console mirror
//! - Level from `RUST_LOG` or the configured level
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tautulli_exporter::config::LoggingConfig;
//! use tautulli_exporter::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging(Path::new("exports/movies_log.txt"), &config)
//!     .expect("Failed to initialize logging");
//!
//! tracing::info!("Exporting library...");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{build_subscriber, init_logging, parse_log_level, LoggingGuard};

/// Log an error with its full source chain and context
///
/// # Example
///
/// ```no_run
/// use tautulli_exporter::log_error_with_context;
/// use tautulli_exporter::domain::{ExporterError, ExportId};
///
/// let error = ExporterError::ExportFailed(ExportId::new(42));
/// log_error_with_context!(&error, "Export run aborted");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$crate::domain::error_chain($error),
            context = $context,
            "Error occurred"
        );
    };
    ($error:expr, $context:expr, $($field:tt)+) => {
        tracing::error!(
            error = %$crate::domain::error_chain($error),
            context = $context,
            $($field)+,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::build_subscriber;
    use crate::config::LoggingConfig;
    use crate::domain::{ExportId, ExporterError, TautulliError};
    use tempfile::TempDir;

    #[test]
    fn test_log_error_with_context_writes_source_chain() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("movies_log.txt");
        let config = LoggingConfig {
            log_level: "info".to_string(),
            console_enabled: false,
        };
        let error = ExporterError::Cleanup {
            export_id: ExportId::new(42),
            source: TautulliError::ServerError {
                status: 503,
                message: "unavailable".to_string(),
            },
        };

        let (subscriber, guard) = build_subscriber(&log_path, &config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            log_error_with_context!(&error, "Export run aborted");
            log_error_with_context!(&error, "Export run aborted", stage = "downloaded");
        });
        drop(guard);

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(log.lines().filter(|l| l.contains("ERROR")).count(), 2);
        assert!(log.contains("Export run aborted"));
        assert!(log.contains("stage=\"downloaded\""));
        assert!(log.contains("503"));
    }
}
