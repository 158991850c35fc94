//! Configuration management for the exporter.
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. Command-line flags (see [`crate::cli`])
//! 2. Environment variables (`TAUTULLI_URL`, `TAUTULLI_API_KEY`, and
//!    `TAUTULLI_EXPORT_<SECTION>_<KEY>` overrides)
//! 3. An optional TOML file passed with `--config`
//!
//! Everything is merged into one [`ExporterConfig`], validated once, and then
//! treated as immutable.
//!
//! # Example Configuration
//!
//! ```toml
//! [tautulli]
//! base_url = "http://localhost:8181"
//! api_key = "${TAUTULLI_API_KEY}"
//!
//! [export]
//! library_id = 1
//! file_format = "json"
//! custom_fields = ["year", "studio"]
//!
//! [output]
//! destination_folder = "/data/exports"
//! new_filename = "movies.json"
//! overwrite = false
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use tautulli_exporter::config::load_config;
//!
//! # fn example() {
//! match load_config("exporter.toml").map(|c| c.validate()) {
//!     Ok(Ok(())) => println!("Configuration valid"),
//!     Ok(Err(e)) => eprintln!("Configuration invalid: {e}"),
//!     Err(e) => eprintln!("Configuration error: {e}"),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{config_from_env, load_config};
pub use schema::{ExportConfig, ExporterConfig, LoggingConfig, OutputConfig, TautulliConfig};
pub use secret::{secret_string, SecretString, SecretValue};
