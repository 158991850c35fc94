//! Domain models and types for the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SectionId`], [`ExportId`])
//! - **Export models** ([`ExportRequest`], [`ExportJobRecord`], [`FileFormat`])
//! - **Error types** ([`ExporterError`], [`TautulliError`])
//! - **Result type aliases** ([`Result`], [`ApiResult`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExporterError>`]:
//!
//! ```rust
//! use tautulli_exporter::domain::{ExporterError, Result, SectionId};
//!
//! fn parse_section(raw: &str) -> Result<SectionId> {
//!     raw.parse().map_err(ExporterError::Configuration)
//! }
//!
//! assert!(parse_section("5").is_ok());
//! assert!(parse_section("movies").is_err());
//! ```

pub mod errors;
pub mod export;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{error_chain, ExporterError, TautulliError};
pub use export::{ExportJobRecord, ExportRequest, ExportStatus, FileFormat};
pub use ids::{ExportId, SectionId};
pub use result::{ApiResult, Result};
