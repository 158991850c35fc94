//! Core business logic.
//!
//! # Export Workflow
//!
//! 1. **Resolve** the destination path (dated copy when the file exists)
//! 2. **Submit** an `export_metadata` request
//! 3. **Locate** the newest pending job of the section
//! 4. **Poll** the export table at a fixed interval until the job completes
//! 5. **Download** the artifact to the destination
//! 6. **Delete** the job record
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tautulli_exporter::adapters::tautulli::TautulliClient;
//! use tautulli_exporter::config::{load_config, secret_string};
//! use tautulli_exporter::core::export::ExportWorkflow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("exporter.toml")?;
//! let client = TautulliClient::new(
//!     &config.tautulli.base_url,
//!     secret_string("api-key".to_string()),
//!     config.request_timeout(),
//! )?;
//!
//! let mut workflow = ExportWorkflow::from_config(&config, Arc::new(client))?;
//! let summary = workflow.run().await?;
//! println!("Wrote {} bytes to {}", summary.bytes_written, summary.destination.display());
//! # Ok(())
//! # }
//! ```

pub mod export;
