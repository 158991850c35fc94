//! Tautulli API response models
//!
//! Every JSON response from `/api/v2` is wrapped in the same envelope:
//!
//! ```json
//! {"response": {"result": "success", "message": null, "data": { ... }}}
//! ```

use crate::domain::ExportJobRecord;
use serde::Deserialize;

/// Outer `{"response": ...}` wrapper
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: ApiResponse<T>,
}

/// Result/message/data triple inside the envelope
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: String,

    #[serde(default)]
    pub message: Option<String>,

    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.result.eq_ignore_ascii_case("success")
    }
}

/// Payload of `get_exports_table`
///
/// The table is paginated for the web UI; the exporter only reads the rows.
#[derive(Debug, Deserialize)]
pub struct ExportsTable {
    #[serde(default, rename = "recordsTotal")]
    pub records_total: Option<u64>,

    #[serde(default)]
    pub data: Vec<ExportJobRecord>,
}
