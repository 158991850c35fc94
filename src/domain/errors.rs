//! Domain error types
//!
//! This module defines the error hierarchy for the exporter. Every workflow step
//! maps its failure onto one [`ExporterError`] variant; HTTP-level detail is kept
//! as the [`TautulliError`] source so the full chain can be logged.

use crate::domain::ids::{ExportId, SectionId};
use thiserror::Error;

/// Main exporter error type
///
/// Returned by every fallible operation in the crate. The step variants
/// (`Submission`, `Listing`, `Download`, `Cleanup`) carry the remote failure
/// that caused them.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The export_metadata call failed
    #[error("Export submission failed for section {section_id}")]
    Submission {
        section_id: SectionId,
        #[source]
        source: TautulliError,
    },

    /// The get_exports_table call failed
    #[error("Listing export jobs failed for section {section_id}")]
    Listing {
        section_id: SectionId,
        #[source]
        source: TautulliError,
    },

    /// The expected export job is missing from the listing
    #[error("Export job not found: {0}")]
    JobNotFound(String),

    /// The server reported the export job as failed
    #[error("Export job {0} failed on the server")]
    ExportFailed(ExportId),

    /// The download_export call failed
    #[error("Downloading export {export_id} failed")]
    Download {
        export_id: ExportId,
        #[source]
        source: TautulliError,
    },

    /// Writing the artifact (or the run log) failed
    #[error("I/O error: {0}")]
    Io(String),

    /// The delete_export call failed
    #[error("Deleting export {export_id} failed")]
    Cleanup {
        export_id: ExportId,
        #[source]
        source: TautulliError,
    },
}

/// Tautulli API errors
///
/// Errors that occur when talking to the Tautulli HTTP API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum TautulliError {
    /// Failed to reach the server
    #[error("Failed to connect to Tautulli: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The API envelope reported `"result": "error"`
    #[error("Tautulli API error: {0}")]
    ApiError(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}

/// Render an error and all of its sources as one line
///
/// ```
/// use tautulli_exporter::domain::errors::{error_chain, ExporterError, TautulliError};
/// use tautulli_exporter::domain::ExportId;
///
/// let err = ExporterError::Cleanup {
///     export_id: ExportId::new(42),
///     source: TautulliError::Timeout("30s".to_string()),
/// };
/// assert_eq!(error_chain(&err), "Deleting export 42 failed: Request timeout: 30s");
/// ```
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
