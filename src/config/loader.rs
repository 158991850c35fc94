//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use crate::domain::FileFormat;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "TAUTULLI_EXPORT_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides (TAUTULLI_EXPORT_* prefix)
///
/// Validation is left to the caller, because command-line flags are applied
/// on top of the loaded values first.
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
///
/// # Examples
///
/// ```no_run
/// use tautulli_exporter::config::loader::load_config;
///
/// let config = load_config("exporter.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Defaults plus environment overrides, for runs without a config file
pub fn config_from_env() -> Result<ExporterConfig> {
    let mut config = ExporterConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched. All missing variables are reported
/// in a single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExporterError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the TAUTULLI_EXPORT_* prefix
///
/// Variables follow the pattern `TAUTULLI_EXPORT_<SECTION>_<KEY>`, for example
/// `TAUTULLI_EXPORT_EXPORT_POLL_INTERVAL_SECS` or
/// `TAUTULLI_EXPORT_OUTPUT_OVERWRITE`.
fn apply_env_overrides(config: &mut ExporterConfig) -> Result<()> {
    // Tautulli overrides
    if let Some(val) = env_override("TAUTULLI_TIMEOUT_SECONDS") {
        config.tautulli.timeout_seconds = parse_override("TAUTULLI_TIMEOUT_SECONDS", &val)?;
    }

    // Export overrides
    if let Some(val) = env_override("EXPORT_LIBRARY_ID") {
        config.export.library_id = Some(parse_override("EXPORT_LIBRARY_ID", &val)?);
    }
    if let Some(val) = env_override("EXPORT_FILE_FORMAT") {
        config.export.file_format = parse_file_format(&val)?;
    }
    if let Some(val) = env_override("EXPORT_METADATA_LEVEL") {
        config.export.metadata_level = parse_override("EXPORT_METADATA_LEVEL", &val)?;
    }
    if let Some(val) = env_override("EXPORT_MEDIA_INFO_LEVEL") {
        config.export.media_info_level = parse_override("EXPORT_MEDIA_INFO_LEVEL", &val)?;
    }
    if let Some(val) = env_override("EXPORT_CUSTOM_FIELDS") {
        config.export.custom_fields = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(val) = env_override("EXPORT_POLL_INTERVAL_SECS") {
        config.export.poll_interval_secs = parse_override("EXPORT_POLL_INTERVAL_SECS", &val)?;
    }

    // Output overrides
    if let Some(val) = env_override("OUTPUT_DESTINATION_FOLDER") {
        config.output.destination_folder = val;
    }
    if let Some(val) = env_override("OUTPUT_NEW_FILENAME") {
        config.output.new_filename = val;
    }
    if let Some(val) = env_override("OUTPUT_OVERWRITE") {
        config.output.overwrite = parse_override("OUTPUT_OVERWRITE", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_override("LOGGING_LOG_LEVEL") {
        config.logging.log_level = val;
    }
    if let Some(val) = env_override("LOGGING_CONSOLE_ENABLED") {
        config.logging.console_enabled = parse_override("LOGGING_CONSOLE_ENABLED", &val)?;
    }

    Ok(())
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_override<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ExporterError::Configuration(format!("Invalid value '{value}' for {ENV_PREFIX}{key}: {e}"))
    })
}

fn parse_file_format(value: &str) -> Result<FileFormat> {
    match value.trim().to_lowercase().as_str() {
        "csv" => Ok(FileFormat::Csv),
        "json" => Ok(FileFormat::Json),
        "xml" => Ok(FileFormat::Xml),
        "m3u" => Ok(FileFormat::M3u),
        other => Err(ExporterError::Configuration(format!(
            "Invalid file format '{other}'. Must be one of: csv, json, xml, m3u"
        ))),
    }
}
