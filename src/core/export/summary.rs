//! Export summary and reporting

use crate::domain::{ExportId, SectionId};
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a successful export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Section that was exported
    pub section_id: SectionId,

    /// Job that produced the artifact
    pub export_id: ExportId,

    /// Where the artifact was written
    pub destination: PathBuf,

    /// Size of the artifact in bytes
    pub bytes_written: usize,

    /// Number of status checks after the job was located
    pub poll_count: u32,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Log the summary
    pub fn log_summary(&self) {
        tracing::debug!(
            section_id = %self.section_id,
            export_id = %self.export_id,
            destination = %self.destination.display(),
            bytes_written = self.bytes_written,
            poll_count = self.poll_count,
            duration_secs = self.duration.as_secs(),
            "Export run summary"
        );
    }
}
