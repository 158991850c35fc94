//! Export command implementation
//!
//! Builds the configuration from file, environment and flags, sets up the run
//! log and drives one export workflow.

use crate::adapters::tautulli::{TautulliApi, TautulliClient};
use crate::config::{config_from_env, load_config, secret_string, ExporterConfig};
use crate::core::export::{run_log_path, ExportWorkflow};
use crate::domain::{ExporterError, FileFormat};
use crate::log_error_with_context;
use crate::logging::init_logging;
use clap::Args;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Exit code for configuration and argument errors
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Exit code when the run log cannot be set up
pub const EXIT_LOGGING_ERROR: i32 = 5;

/// Arguments for an export run
#[derive(Args, Default)]
pub struct ExportArgs {
    /// Base URL of the Tautulli server
    #[arg(long, alias = "tautulli_url", env = "TAUTULLI_URL")]
    pub tautulli_url: Option<String>,

    /// Tautulli API key
    #[arg(long, alias = "api_key", env = "TAUTULLI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Library section to export
    #[arg(long, alias = "library_id")]
    pub library_id: Option<u32>,

    /// Folder the export is written to
    #[arg(long, alias = "destination_folder")]
    pub destination_folder: Option<String>,

    /// File name of the export
    #[arg(long, alias = "new_filename")]
    pub new_filename: Option<String>,

    /// Additional metadata fields to include
    #[arg(long, alias = "custom_metadata_tags", num_args = 1.., value_name = "TAG")]
    pub custom_metadata_tags: Vec<String>,

    /// Replace an existing file instead of writing a date-suffixed copy
    #[arg(long)]
    pub overwrite: bool,

    /// Metadata level
    #[arg(long, alias = "metadata_level")]
    pub metadata_level: Option<u32>,

    /// Media info level
    #[arg(long, alias = "media_info_level")]
    pub media_info_level: Option<u32>,

    /// Output file format
    #[arg(long, alias = "file_format", value_enum)]
    pub file_format: Option<FileFormat>,

    /// Seconds between job status checks
    #[arg(long, alias = "poll_interval_secs")]
    pub poll_interval_secs: Option<u64>,
}

impl fmt::Debug for ExportArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportArgs")
            .field("tautulli_url", &self.tautulli_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("library_id", &self.library_id)
            .field("destination_folder", &self.destination_folder)
            .field("new_filename", &self.new_filename)
            .field("custom_metadata_tags", &self.custom_metadata_tags)
            .field("overwrite", &self.overwrite)
            .field("metadata_level", &self.metadata_level)
            .field("media_info_level", &self.media_info_level)
            .field("file_format", &self.file_format)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}

impl ExportArgs {
    /// Apply command-line values on top of file and environment settings
    pub fn apply_to(&self, config: &mut ExporterConfig) {
        if let Some(url) = &self.tautulli_url {
            config.tautulli.base_url = url.clone();
        }
        if let Some(key) = &self.api_key {
            config.tautulli.api_key = Some(secret_string(key.clone()));
        }
        if let Some(library_id) = self.library_id {
            config.export.library_id = Some(library_id);
        }
        if let Some(folder) = &self.destination_folder {
            config.output.destination_folder = folder.clone();
        }
        if let Some(filename) = &self.new_filename {
            config.output.new_filename = filename.clone();
        }
        if !self.custom_metadata_tags.is_empty() {
            config.export.custom_fields = self.custom_metadata_tags.clone();
        }
        if self.overwrite {
            config.output.overwrite = true;
        }
        if let Some(level) = self.metadata_level {
            config.export.metadata_level = level;
        }
        if let Some(level) = self.media_info_level {
            config.export.media_info_level = level;
        }
        if let Some(format) = self.file_format {
            config.export.file_format = format;
        }
        if let Some(secs) = self.poll_interval_secs {
            config.export.poll_interval_secs = secs;
        }
    }

    /// Merge configuration from all sources and validate it
    pub fn resolve_config(
        &self,
        config_path: Option<&Path>,
        log_level: Option<&str>,
    ) -> crate::domain::Result<ExporterConfig> {
        let mut config = match config_path {
            Some(path) => load_config(path)?,
            None => config_from_env()?,
        };

        self.apply_to(&mut config);
        if let Some(level) = log_level {
            config.logging.log_level = level.to_string();
        }

        config.validate().map_err(ExporterError::Configuration)?;
        Ok(config)
    }

    /// Execute an export run
    ///
    /// Configuration problems are reported before anything is sent and exit
    /// with code 2. A failed run is logged with its cause and exits 0.
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        log_level: Option<&str>,
    ) -> anyhow::Result<i32> {
        let config = match self.resolve_config(config_path, log_level) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let log_path = run_log_path(config.destination_folder(), &config.output.new_filename);
        let _guard = match init_logging(&log_path, &config.logging) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Failed to initialize logging: {e}");
                return Ok(EXIT_LOGGING_ERROR);
            }
        };

        tracing::debug!(
            version = env!("CARGO_PKG_VERSION"),
            base_url = %config.tautulli.base_url,
            library_id = ?config.export.library_id,
            "Starting export run"
        );

        let api = match build_client(&config) {
            Ok(client) => Arc::new(client) as Arc<dyn TautulliApi>,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create Tautulli client");
                eprintln!("Failed to initialize export: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let mut workflow = match ExportWorkflow::from_config(&config, api) {
            Ok(workflow) => workflow,
            Err(e) => {
                log_error_with_context!(&e, "Failed to prepare export");
                eprintln!("Failed to initialize export: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        match workflow.run().await {
            Ok(summary) => {
                summary.log_summary();
                println!("{}", summary.destination.display());
            }
            Err(e) => {
                let stage = workflow
                    .failed_at()
                    .map(|stage| stage.as_str())
                    .unwrap_or("unknown");
                log_error_with_context!(&e, "Export run aborted", stage = stage);
            }
        }

        Ok(0)
    }
}

fn build_client(config: &ExporterConfig) -> crate::domain::Result<TautulliClient> {
    let api_key = config.tautulli.api_key.clone().ok_or_else(|| {
        ExporterError::Configuration("tautulli.api_key is required".to_string())
    })?;

    TautulliClient::new(&config.tautulli.base_url, api_key, config.request_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn full_args(folder: &str) -> ExportArgs {
        ExportArgs {
            tautulli_url: Some("http://localhost:8181".to_string()),
            api_key: Some("abc123".to_string()),
            library_id: Some(5),
            destination_folder: Some(folder.to_string()),
            new_filename: Some("movies.json".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let args = ExportArgs {
            custom_metadata_tags: vec!["year".to_string(), "studio".to_string()],
            overwrite: true,
            metadata_level: Some(3),
            file_format: Some(FileFormat::Csv),
            poll_interval_secs: Some(2),
            ..full_args("/data/exports")
        };
        let mut config = ExporterConfig::default();

        args.apply_to(&mut config);

        assert_eq!(config.tautulli.base_url, "http://localhost:8181");
        assert_eq!(
            config.tautulli.api_key.as_ref().unwrap().expose_secret(),
            "abc123"
        );
        assert_eq!(config.export.library_id, Some(5));
        assert_eq!(config.export.custom_fields, vec!["year", "studio"]);
        assert_eq!(config.export.metadata_level, 3);
        assert_eq!(config.export.media_info_level, 0);
        assert_eq!(config.export.file_format, FileFormat::Csv);
        assert_eq!(config.export.poll_interval_secs, 2);
        assert_eq!(config.output.destination_folder, "/data/exports");
        assert_eq!(config.output.new_filename, "movies.json");
        assert!(config.output.overwrite);
    }

    #[test]
    fn test_apply_to_keeps_config_values_without_flags() {
        let mut config = ExporterConfig::default();
        config.export.custom_fields = vec!["year".to_string()];
        config.output.overwrite = true;

        ExportArgs::default().apply_to(&mut config);

        assert_eq!(config.export.custom_fields, vec!["year"]);
        assert!(config.output.overwrite);
    }

    #[test]
    fn test_resolve_config_from_file_with_flag_override() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("exporter.toml");
        std::fs::write(
            &config_path,
            r#"
[tautulli]
base_url = "http://tautulli.local:8181"
api_key = "from-file"

[export]
library_id = 1

[output]
destination_folder = "/tmp"
new_filename = "library.json"
"#,
        )
        .unwrap();

        let args = ExportArgs {
            library_id: Some(9),
            ..Default::default()
        };
        let config = args
            .resolve_config(Some(&config_path), Some("debug"))
            .unwrap();

        assert_eq!(config.tautulli.base_url, "http://tautulli.local:8181");
        assert_eq!(config.export.library_id, Some(9));
        assert_eq!(config.logging.log_level, "debug");
    }

    #[test]
    fn test_resolve_config_missing_library_id() {
        let args = ExportArgs {
            library_id: None,
            ..full_args("/data/exports")
        };
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("empty.toml");
        std::fs::write(&config_path, "").unwrap();

        let result = args.resolve_config(Some(&config_path), None);
        assert!(matches!(result, Err(ExporterError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_execute_reports_config_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("missing.toml");

        let code = full_args("/data/exports")
            .execute(Some(&config_path), None)
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", full_args("/data/exports"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("abc123"));
    }
}
