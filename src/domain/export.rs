//! Export request and job record models
//!
//! [`ExportRequest`] is what the exporter asks Tautulli to produce;
//! [`ExportJobRecord`] is a row of the server's export table as observed
//! while polling. The exporter never mutates a job record.

use super::ids::{ExportId, SectionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format of an export
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    #[default]
    Json,
    Xml,
    M3u,
}

impl FileFormat {
    /// Value sent as the `file_format` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Xml => "xml",
            FileFormat::M3u => "m3u",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata export request for one library section
///
/// Built once per run and never mutated afterwards.
///
/// # Example
///
/// ```
/// use tautulli_exporter::domain::{ExportRequest, FileFormat, SectionId};
///
/// let request = ExportRequest::new(SectionId::new(5))
///     .with_file_format(FileFormat::Csv)
///     .with_custom_fields(vec!["year".to_string(), "studio".to_string()]);
///
/// let params = request.query_params();
/// assert!(params.contains(&("custom_fields", "year,studio".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    section_id: SectionId,
    file_format: FileFormat,
    metadata_level: u32,
    media_info_level: u32,
    custom_fields: Vec<String>,
}

impl ExportRequest {
    /// Creates a request with default format (json) and levels (0)
    pub fn new(section_id: SectionId) -> Self {
        Self {
            section_id,
            file_format: FileFormat::default(),
            metadata_level: 0,
            media_info_level: 0,
            custom_fields: Vec::new(),
        }
    }

    /// Sets the file format
    pub fn with_file_format(mut self, file_format: FileFormat) -> Self {
        self.file_format = file_format;
        self
    }

    /// Sets the metadata level
    pub fn with_metadata_level(mut self, level: u32) -> Self {
        self.metadata_level = level;
        self
    }

    /// Sets the media info level
    pub fn with_media_info_level(mut self, level: u32) -> Self {
        self.media_info_level = level;
        self
    }

    /// Sets the custom metadata fields, order preserved
    pub fn with_custom_fields(mut self, fields: Vec<String>) -> Self {
        self.custom_fields = fields;
        self
    }

    pub fn section_id(&self) -> SectionId {
        self.section_id
    }

    pub fn file_format(&self) -> FileFormat {
        self.file_format
    }

    pub fn metadata_level(&self) -> u32 {
        self.metadata_level
    }

    pub fn media_info_level(&self) -> u32 {
        self.media_info_level
    }

    pub fn custom_fields(&self) -> &[String] {
        &self.custom_fields
    }

    /// Query parameters for the `export_metadata` command
    ///
    /// `custom_fields` is only present when at least one field was requested.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("section_id", self.section_id.to_string()),
            ("file_format", self.file_format.as_str().to_string()),
            ("metadata_level", self.metadata_level.to_string()),
            ("media_info_level", self.media_info_level.to_string()),
        ];
        if !self.custom_fields.is_empty() {
            params.push(("custom_fields", self.custom_fields.join(",")));
        }
        params
    }
}

/// Completion state of a server-side export job
///
/// Tautulli reports this as an integer: `0` pending, `1` complete, `-1` failed.
/// Any other code is kept as `Unknown` so one unfamiliar row does not make the
/// whole listing unreadable; such a job is neither pending nor complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ExportStatus {
    Pending,
    Complete,
    Failed,
    Unknown(i64),
}

impl From<i64> for ExportStatus {
    fn from(value: i64) -> Self {
        match value {
            0 => ExportStatus::Pending,
            1 => ExportStatus::Complete,
            -1 => ExportStatus::Failed,
            other => ExportStatus::Unknown(other),
        }
    }
}

impl From<ExportStatus> for i64 {
    fn from(status: ExportStatus) -> Self {
        match status {
            ExportStatus::Pending => 0,
            ExportStatus::Complete => 1,
            ExportStatus::Failed => -1,
            ExportStatus::Unknown(code) => code,
        }
    }
}

/// One row of the export table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJobRecord {
    /// Job identifier
    pub export_id: ExportId,

    /// Creation time in epoch seconds
    pub timestamp: i64,

    /// Completion state
    pub complete: ExportStatus,

    /// Name of the produced file, once known
    #[serde(default)]
    pub filename: Option<String>,

    /// Format the job was submitted with
    #[serde(default)]
    pub file_format: Option<String>,
}

impl ExportJobRecord {
    /// Creates a record with no descriptive fields
    pub fn new(export_id: ExportId, timestamp: i64, complete: ExportStatus) -> Self {
        Self {
            export_id,
            timestamp,
            complete,
            filename: None,
            file_format: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.complete == ExportStatus::Pending
    }
}
