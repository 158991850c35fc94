//! Tautulli API trait definition
//!
//! The export workflow only needs four commands from Tautulli. Putting them
//! behind a trait keeps the orchestrator independent of the HTTP client and
//! lets tests drive it with scripted responses.

use crate::domain::{ApiResult, ExportId, ExportJobRecord, ExportRequest, SectionId};
use async_trait::async_trait;

/// The subset of the Tautulli API used by the exporter
///
/// # Example
///
/// ```no_run
/// use tautulli_exporter::adapters::tautulli::{TautulliApi, TautulliClient};
/// use tautulli_exporter::config::secret_string;
/// use tautulli_exporter::domain::SectionId;
/// use std::time::Duration;
///
/// # async fn example() -> tautulli_exporter::domain::Result<()> {
/// let client = TautulliClient::new(
///     "http://localhost:8181",
///     secret_string("api-key".to_string()),
///     Duration::from_secs(30),
/// )?;
///
/// let jobs = client.get_exports_table(SectionId::new(1)).await;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait TautulliApi: Send + Sync {
    /// Submit a metadata export (`cmd=export_metadata`)
    ///
    /// The response body is not inspected; Tautulli does not reliably
    /// return the new job id here.
    async fn export_metadata(&self, request: &ExportRequest) -> ApiResult<()>;

    /// List export jobs of a section (`cmd=get_exports_table`)
    async fn get_exports_table(&self, section_id: SectionId) -> ApiResult<Vec<ExportJobRecord>>;

    /// Fetch the produced file (`cmd=download_export`)
    async fn download_export(&self, export_id: ExportId) -> ApiResult<Vec<u8>>;

    /// Remove the job record (`cmd=delete_export`)
    async fn delete_export(&self, export_id: ExportId) -> ApiResult<()>;

    /// Base URL of the server, for logging
    fn base_url(&self) -> &str;
}
