//! Configuration schema types
//!
//! Every setting has a default so a run can be configured entirely from the
//! command line; the settings without a sensible default (server, key,
//! library, destination) are enforced by [`ExporterConfig::validate`].

use crate::config::SecretString;
use crate::domain::{
    ExportRequest, ExporterError, FileFormat, Result as ExporterResult, SectionId,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Once validated it is treated as immutable for the rest of the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Tautulli connection settings
    #[serde(default)]
    pub tautulli: TautulliConfig,

    /// What to export
    #[serde(default)]
    pub export: ExportConfig,

    /// Where to write the result
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are missing or invalid
    pub fn validate(&self) -> Result<(), String> {
        self.tautulli.validate()?;
        self.export.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Build the export request described by this configuration
    pub fn export_request(&self) -> ExporterResult<ExportRequest> {
        let library_id = self.export.library_id.ok_or_else(|| {
            ExporterError::Configuration("export.library_id is required".to_string())
        })?;

        Ok(ExportRequest::new(SectionId::new(library_id))
            .with_file_format(self.export.file_format)
            .with_metadata_level(self.export.metadata_level)
            .with_media_info_level(self.export.media_info_level)
            .with_custom_fields(self.export.custom_fields.clone()))
    }

    /// Interval between job status checks
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.export.poll_interval_secs)
    }

    /// Per-request HTTP timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.tautulli.timeout_seconds)
    }

    /// Folder the artifact and run log are written to
    pub fn destination_folder(&self) -> &Path {
        Path::new(&self.output.destination_folder)
    }
}

/// Tautulli server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TautulliConfig {
    /// Base URL of the Tautulli instance (e.g. `http://localhost:8181`)
    #[serde(default)]
    pub base_url: String,

    /// API key from Tautulli's web interface settings
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl TautulliConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err(
                "tautulli.base_url is required (use --tautulli-url or TAUTULLI_URL)".to_string(),
            );
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            format!("tautulli.base_url '{}' is not a valid URL: {e}", self.base_url)
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("tautulli.base_url must start with http:// or https://".to_string());
        }

        if self
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().is_empty())
            .unwrap_or(true)
        {
            return Err(
                "tautulli.api_key is required (use --api-key or TAUTULLI_API_KEY)".to_string(),
            );
        }

        if self.timeout_seconds == 0 {
            return Err("tautulli.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for TautulliConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Library section to export
    #[serde(default)]
    pub library_id: Option<u32>,

    /// Output file format (csv, json, xml, m3u)
    #[serde(default)]
    pub file_format: FileFormat,

    /// Metadata level (0 = Tautulli's default set)
    #[serde(default)]
    pub metadata_level: u32,

    /// Media info level (0 = Tautulli's default set)
    #[serde(default)]
    pub media_info_level: u32,

    /// Additional metadata fields to include, in order
    #[serde(default)]
    pub custom_fields: Vec<String>,

    /// Seconds to wait between job status checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.library_id.is_none() {
            return Err("export.library_id is required (use --library-id)".to_string());
        }

        if self.poll_interval_secs == 0 {
            return Err("export.poll_interval_secs must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            library_id: None,
            file_format: FileFormat::default(),
            metadata_level: 0,
            media_info_level: 0,
            custom_fields: Vec::new(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Folder the export is written to
    #[serde(default)]
    pub destination_folder: String,

    /// File name of the export inside the destination folder
    #[serde(default)]
    pub new_filename: String,

    /// Replace an existing file instead of writing a date-suffixed copy
    #[serde(default)]
    pub overwrite: bool,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.destination_folder.trim().is_empty() {
            return Err(
                "output.destination_folder is required (use --destination-folder)".to_string(),
            );
        }

        let name = self.new_filename.trim();
        if name.is_empty() {
            return Err("output.new_filename is required (use --new-filename)".to_string());
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(format!(
                "output.new_filename '{}' must be a plain file name, not a path",
                self.new_filename
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Mirror log lines to the console
    #[serde(default = "default_true")]
    pub console_enabled: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            console_enabled: true,
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_poll_interval_secs() -> u64 {
    5
}
