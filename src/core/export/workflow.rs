//! Export workflow - drives one export job through its lifecycle
//!
//! A run submits an export, finds the job Tautulli created for it, polls until
//! the job completes, downloads the file and deletes the job record. The run is
//! strictly sequential; the first failing step aborts everything after it.

use crate::adapters::tautulli::TautulliApi;
use crate::config::ExporterConfig;
use crate::core::export::destination::resolve_destination;
use crate::core::export::locator::{find_job, select_latest_pending};
use crate::core::export::stage::WorkflowStage;
use crate::core::export::summary::ExportSummary;
use crate::domain::{
    ExportId, ExportJobRecord, ExportRequest, ExportStatus, ExporterError, Result,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where and how often a run writes and polls
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Folder the artifact is written to
    pub destination_folder: PathBuf,

    /// Requested file name inside the folder
    pub new_filename: String,

    /// Replace an existing file instead of writing a dated copy
    pub overwrite: bool,

    /// Pause before every status check
    pub poll_interval: Duration,
}

impl WorkflowOptions {
    pub fn from_config(config: &ExporterConfig) -> Self {
        Self {
            destination_folder: config.destination_folder().to_path_buf(),
            new_filename: config.output.new_filename.clone(),
            overwrite: config.output.overwrite,
            poll_interval: config.poll_interval(),
        }
    }
}

/// Export workflow orchestrator
pub struct ExportWorkflow {
    api: Arc<dyn TautulliApi>,
    request: ExportRequest,
    options: WorkflowOptions,
    stage: WorkflowStage,
    failed_at: Option<WorkflowStage>,
}

impl ExportWorkflow {
    /// Create a new workflow for one run
    pub fn new(
        api: Arc<dyn TautulliApi>,
        request: ExportRequest,
        options: WorkflowOptions,
    ) -> Self {
        Self {
            api,
            request,
            options,
            stage: WorkflowStage::Idle,
            failed_at: None,
        }
    }

    /// Create a workflow from validated configuration
    pub fn from_config(config: &ExporterConfig, api: Arc<dyn TautulliApi>) -> Result<Self> {
        let request = config.export_request()?;
        Ok(Self::new(api, request, WorkflowOptions::from_config(config)))
    }

    /// Current lifecycle stage
    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// Last stage reached before the run failed
    pub fn failed_at(&self) -> Option<WorkflowStage> {
        self.failed_at
    }

    /// Execute the run
    ///
    /// 1. Resolve the destination path
    /// 2. Submit the export
    /// 3. Locate the newest pending job of the section
    /// 4. Poll until that job completes
    /// 5. Download the artifact to the destination
    /// 6. Delete the job record
    ///
    /// A workflow runs once; calling `run` again after a terminal stage is a
    /// configuration error.
    pub async fn run(&mut self) -> Result<ExportSummary> {
        if self.stage != WorkflowStage::Idle {
            return Err(ExporterError::Configuration(format!(
                "export workflow already ran (stage: {})",
                self.stage
            )));
        }

        match self.execute().await {
            Ok(summary) => {
                self.transition(WorkflowStage::Done);
                Ok(summary)
            }
            Err(e) => {
                self.failed_at = Some(self.stage);
                self.transition(WorkflowStage::Failed);
                Err(e)
            }
        }
    }

    async fn execute(&mut self) -> Result<ExportSummary> {
        let start_time = Instant::now();

        let destination = resolve_destination(
            &self.options.destination_folder,
            &self.options.new_filename,
            self.options.overwrite,
        );
        tracing::debug!(
            server = self.api.base_url(),
            destination = %destination.display(),
            "Resolved destination path"
        );

        self.submit().await?;
        let export_id = self.locate().await?;
        let poll_count = self.wait_for_completion(export_id).await?;
        let bytes_written = self.download(export_id, &destination).await?;
        self.delete(export_id).await?;

        tracing::info!("Done!");

        Ok(ExportSummary {
            section_id: self.request.section_id(),
            export_id,
            destination,
            bytes_written,
            poll_count,
            duration: start_time.elapsed(),
        })
    }

    async fn submit(&mut self) -> Result<()> {
        tracing::info!(
            section_id = %self.request.section_id(),
            file_format = %self.request.file_format(),
            "Exporting library..."
        );

        self.api
            .export_metadata(&self.request)
            .await
            .map_err(|source| ExporterError::Submission {
                section_id: self.request.section_id(),
                source,
            })?;

        self.transition(WorkflowStage::Submitted);
        Ok(())
    }

    async fn locate(&mut self) -> Result<ExportId> {
        tracing::info!("Finding the latest generated entry...");

        let records = self.list_jobs().await?;
        let job = select_latest_pending(&records).ok_or_else(|| {
            ExporterError::JobNotFound(format!(
                "no pending export job in section {} after submission",
                self.request.section_id()
            ))
        })?;

        tracing::debug!(
            export_id = %job.export_id,
            timestamp = job.timestamp,
            filename = job.filename.as_deref().unwrap_or("-"),
            file_format = job.file_format.as_deref().unwrap_or("-"),
            "Located export job"
        );

        let export_id = job.export_id;
        self.transition(WorkflowStage::Located);
        Ok(export_id)
    }

    /// Returns the number of status checks made
    async fn wait_for_completion(&mut self, export_id: ExportId) -> Result<u32> {
        tracing::info!(export_id = %export_id, "Waiting for export to complete...");
        self.transition(WorkflowStage::Polling);

        let mut poll_count = 0;
        loop {
            tokio::time::sleep(self.options.poll_interval).await;
            poll_count += 1;

            let records = self.list_jobs().await?;
            let job = find_job(&records, export_id).ok_or_else(|| {
                ExporterError::JobNotFound(format!(
                    "export job {export_id} disappeared from section {} after {poll_count} checks",
                    self.request.section_id()
                ))
            })?;

            match job.complete {
                ExportStatus::Complete => {
                    tracing::debug!(export_id = %export_id, poll_count, "Export job complete");
                    return Ok(poll_count);
                }
                ExportStatus::Failed => return Err(ExporterError::ExportFailed(export_id)),
                ExportStatus::Pending => {
                    tracing::debug!(export_id = %export_id, poll_count, "Export job still pending");
                }
                ExportStatus::Unknown(code) => {
                    tracing::debug!(
                        export_id = %export_id,
                        poll_count,
                        complete = code,
                        "Export job in unrecognized state, still waiting"
                    );
                }
            }
        }
    }

    async fn download(&mut self, export_id: ExportId, destination: &Path) -> Result<usize> {
        tracing::info!(
            export_id = %export_id,
            destination = %destination.display(),
            "Downloading export..."
        );

        let artifact = self
            .api
            .download_export(export_id)
            .await
            .map_err(|source| ExporterError::Download { export_id, source })?;

        tokio::fs::write(destination, &artifact).await.map_err(|e| {
            ExporterError::Io(format!(
                "Failed to write export to {}: {e}",
                destination.display()
            ))
        })?;

        self.transition(WorkflowStage::Downloaded);
        Ok(artifact.len())
    }

    async fn delete(&mut self, export_id: ExportId) -> Result<()> {
        tracing::info!(export_id = %export_id, "Deleting the export from the table...");

        self.api
            .delete_export(export_id)
            .await
            .map_err(|source| ExporterError::Cleanup { export_id, source })?;

        self.transition(WorkflowStage::Deleted);
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<ExportJobRecord>> {
        let section_id = self.request.section_id();
        self.api
            .get_exports_table(section_id)
            .await
            .map_err(|source| ExporterError::Listing { section_id, source })
    }

    fn transition(&mut self, next: WorkflowStage) {
        tracing::debug!(from = %self.stage, to = %next, "Workflow stage transition");
        self.stage = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use crate::domain::{ApiResult, ExportStatus::*, SectionId, TautulliError};
    use crate::logging::build_subscriber;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::time::Instant as TokioInstant;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Submit(Vec<(&'static str, String)>),
        List(SectionId),
        Download(ExportId),
        Delete(ExportId),
    }

    /// Replays one listing per `get_exports_table` call
    struct ScriptedApi {
        listings: Mutex<VecDeque<Vec<ExportJobRecord>>>,
        calls: Mutex<Vec<(Call, TokioInstant)>>,
        artifact: Vec<u8>,
        fail_submit: bool,
        fail_delete: bool,
    }

    impl ScriptedApi {
        fn new(listings: Vec<Vec<ExportJobRecord>>) -> Self {
            Self {
                listings: Mutex::new(listings.into()),
                calls: Mutex::new(Vec::new()),
                artifact: b"DATA".to_vec(),
                fail_submit: false,
                fail_delete: false,
            }
        }

        fn record(&self, call: Call) {
            self.calls
                .lock()
                .unwrap()
                .push((call, TokioInstant::now()));
        }

        fn calls(&self) -> Vec<Call> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(c, _)| c.clone())
                .collect()
        }

        fn list_times(&self) -> Vec<TokioInstant> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(c, _)| matches!(c, Call::List(_)))
                .map(|(_, t)| *t)
                .collect()
        }
    }

    #[async_trait]
    impl TautulliApi for ScriptedApi {
        async fn export_metadata(&self, request: &ExportRequest) -> ApiResult<()> {
            self.record(Call::Submit(request.query_params()));
            if self.fail_submit {
                return Err(TautulliError::ConnectionFailed("refused".to_string()));
            }
            Ok(())
        }

        async fn get_exports_table(
            &self,
            section_id: SectionId,
        ) -> ApiResult<Vec<ExportJobRecord>> {
            self.record(Call::List(section_id));
            Ok(self.listings.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn download_export(&self, export_id: ExportId) -> ApiResult<Vec<u8>> {
            self.record(Call::Download(export_id));
            Ok(self.artifact.clone())
        }

        async fn delete_export(&self, export_id: ExportId) -> ApiResult<()> {
            self.record(Call::Delete(export_id));
            if self.fail_delete {
                return Err(TautulliError::ServerError {
                    status: 500,
                    message: "database is locked".to_string(),
                });
            }
            Ok(())
        }

        fn base_url(&self) -> &str {
            "http://scripted"
        }
    }

    fn job(id: u64, timestamp: i64, complete: ExportStatus) -> ExportJobRecord {
        ExportJobRecord::new(ExportId::new(id), timestamp, complete)
    }

    fn options(folder: &Path) -> WorkflowOptions {
        WorkflowOptions {
            destination_folder: folder.to_path_buf(),
            new_filename: "movies.json".to_string(),
            overwrite: false,
            poll_interval: Duration::from_secs(5),
        }
    }

    fn workflow(api: &Arc<ScriptedApi>, folder: &Path) -> ExportWorkflow {
        let api: Arc<dyn TautulliApi> = api.clone();
        ExportWorkflow::new(api, ExportRequest::new(SectionId::new(5)), options(folder))
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_at_fixed_interval_until_complete() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(41, 900, Complete), job(42, 1000, Pending)],
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Complete)],
        ]));

        let mut wf = workflow(&api, dir.path());
        let summary = wf.run().await.unwrap();

        assert_eq!(summary.export_id, ExportId::new(42));
        assert_eq!(summary.poll_count, 3);
        assert_eq!(summary.bytes_written, 4);
        assert_eq!(wf.stage(), WorkflowStage::Done);

        let times = api.list_times();
        assert_eq!(times.len(), 4);
        for pair in times.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::from_secs(5));
        }

        assert_eq!(
            api.calls().last(),
            Some(&Call::Delete(ExportId::new(42)))
        );
        assert_eq!(std::fs::read(dir.path().join("movies.json")).unwrap(), b"DATA");
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_sequence() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Complete)],
        ]));

        workflow(&api, dir.path()).run().await.unwrap();

        let section = SectionId::new(5);
        assert_eq!(
            api.calls(),
            vec![
                Call::Submit(ExportRequest::new(section).query_params()),
                Call::List(section),
                Call::List(section),
                Call::Download(ExportId::new(42)),
                Call::Delete(ExportId::new(42)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_disappearing_mid_poll_stops_the_run() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Pending)],
            vec![job(17, 1200, Pending)],
            vec![job(42, 1000, Complete)],
        ]));

        let mut wf = workflow(&api, dir.path());
        let err = wf.run().await.unwrap_err();

        assert!(matches!(err, ExporterError::JobNotFound(_)));
        assert_eq!(wf.stage(), WorkflowStage::Failed);
        assert_eq!(wf.failed_at(), Some(WorkflowStage::Polling));
        assert!(matches!(api.calls().last(), Some(Call::List(_))));
        assert_eq!(api.list_times().len(), 3);
        assert!(!dir.path().join("movies.json").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pending_job_after_submit() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![vec![job(40, 800, Complete)]]));

        let mut wf = workflow(&api, dir.path());
        let err = wf.run().await.unwrap_err();

        assert!(matches!(err, ExporterError::JobNotFound(_)));
        assert_eq!(wf.failed_at(), Some(WorkflowStage::Submitted));
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_aborts_polling() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Failed)],
        ]));

        let err = workflow(&api, dir.path()).run().await.unwrap_err();

        assert!(matches!(err, ExporterError::ExportFailed(id) if id == ExportId::new(42)));
        assert!(!api.calls().contains(&Call::Download(ExportId::new(42))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_failure_makes_no_further_calls() {
        let dir = TempDir::new().unwrap();
        let mut scripted = ScriptedApi::new(vec![vec![job(42, 1000, Pending)]]);
        scripted.fail_submit = true;
        let api = Arc::new(scripted);

        let mut wf = workflow(&api, dir.path());
        let err = wf.run().await.unwrap_err();

        assert!(matches!(err, ExporterError::Submission { .. }));
        assert_eq!(wf.failed_at(), Some(WorkflowStage::Idle));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_failure_fails_run_after_download() {
        let dir = TempDir::new().unwrap();
        let mut scripted = ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Complete)],
        ]);
        scripted.fail_delete = true;
        let api = Arc::new(scripted);

        let mut wf = workflow(&api, dir.path());
        let err = wf.run().await.unwrap_err();

        assert!(matches!(err, ExporterError::Cleanup { .. }));
        assert_eq!(wf.failed_at(), Some(WorkflowStage::Downloaded));
        assert_eq!(std::fs::read(dir.path().join("movies.json")).unwrap(), b"DATA");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unwritable_destination_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Complete)],
        ]));

        let err = workflow(&api, &missing).run().await.unwrap_err();

        assert!(matches!(err, ExporterError::Io(_)));
        assert!(!api.calls().contains(&Call::Delete(ExportId::new(42))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_existing_file_is_kept_and_dated_copy_written() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("movies.json"), b"OLD").unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Complete)],
        ]));

        let summary = workflow(&api, dir.path()).run().await.unwrap();

        assert_ne!(summary.destination, dir.path().join("movies.json"));
        assert_eq!(std::fs::read(dir.path().join("movies.json")).unwrap(), b"OLD");
        assert_eq!(std::fs::read(&summary.destination).unwrap(), b"DATA");
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_fields_are_submitted_joined() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Complete)],
        ]));
        let request = ExportRequest::new(SectionId::new(5))
            .with_custom_fields(vec!["year".to_string(), "studio".to_string()]);
        let dyn_api: Arc<dyn TautulliApi> = api.clone();

        ExportWorkflow::new(dyn_api, request, options(dir.path()))
            .run()
            .await
            .unwrap();

        match &api.calls()[0] {
            Call::Submit(params) => {
                assert!(params.contains(&("custom_fields", "year,studio".to_string())))
            }
            other => panic!("expected submit first, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrecognized_status_keeps_polling() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(41, 900, Unknown(2)), job(42, 1000, Pending)],
            vec![job(42, 1000, Unknown(3))],
            vec![job(42, 1000, Complete)],
        ]));

        let summary = workflow(&api, dir.path()).run().await.unwrap();

        assert_eq!(summary.export_id, ExportId::new(42));
        assert_eq!(summary.poll_count, 2);
        assert_eq!(std::fs::read(dir.path().join("movies.json")).unwrap(), b"DATA");
    }

    #[tokio::test(start_paused = true)]
    async fn test_located_job_details_are_logged() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("movies_log.txt");
        let config = LoggingConfig {
            log_level: "debug".to_string(),
            console_enabled: false,
        };
        let mut located = job(42, 1000, Pending);
        located.filename = Some("Movies - All [5].json".to_string());
        located.file_format = Some("json".to_string());
        let api = Arc::new(ScriptedApi::new(vec![
            vec![located],
            vec![job(42, 1000, Complete)],
        ]));

        let (subscriber, guard) = build_subscriber(&log_path, &config).unwrap();
        {
            let _default = tracing::subscriber::set_default(subscriber);
            workflow(&api, dir.path()).run().await.unwrap();
        }
        drop(guard);

        let log = std::fs::read_to_string(&log_path).unwrap();
        let line = log
            .lines()
            .find(|l| l.contains("Located export job"))
            .unwrap();
        assert!(line.contains("Movies - All [5].json"));
        assert!(line.contains("file_format=\"json\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_workflow_runs_only_once() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(ScriptedApi::new(vec![
            vec![job(42, 1000, Pending)],
            vec![job(42, 1000, Complete)],
        ]));

        let mut wf = workflow(&api, dir.path());
        wf.run().await.unwrap();
        let err = wf.run().await.unwrap_err();

        assert!(matches!(err, ExporterError::Configuration(_)));
        assert_eq!(wf.stage(), WorkflowStage::Done);
    }
}
