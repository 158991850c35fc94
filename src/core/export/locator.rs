//! Job selection within an export table listing

use crate::domain::{ExportId, ExportJobRecord};

/// Pick the newest pending job
///
/// Among records that are still pending, returns the one with the greatest
/// timestamp. When several share that timestamp the first one in listing
/// order wins. Returns `None` if nothing is pending.
pub fn select_latest_pending(records: &[ExportJobRecord]) -> Option<&ExportJobRecord> {
    records
        .iter()
        .filter(|record| record.is_pending())
        .fold(None, |best: Option<&ExportJobRecord>, record| match best {
            Some(current) if current.timestamp >= record.timestamp => Some(current),
            _ => Some(record),
        })
}

/// Find a job by id
pub fn find_job(records: &[ExportJobRecord], export_id: ExportId) -> Option<&ExportJobRecord> {
    records.iter().find(|record| record.export_id == export_id)
}
