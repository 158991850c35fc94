// Tautulli Exporter - library metadata export tool
// Copyright (c) 2025 Tautulli Exporter Contributors
// Licensed under the MIT License

//! # Tautulli Exporter
//!
//! Exports the metadata of one Plex library section through a Tautulli server
//! and saves the resulting file locally.
//!
//! ## Overview
//!
//! Tautulli builds exports asynchronously. A run therefore:
//! - **Submits** an export for a library section
//! - **Locates** the job Tautulli created (newest pending entry of the section)
//! - **Polls** the job at a fixed interval until it completes
//! - **Downloads** the file into the destination folder
//! - **Deletes** the job record from Tautulli's export table
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The export workflow and its helpers
//! - [`adapters`] - Tautulli API client
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Run log setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tautulli_exporter::adapters::tautulli::TautulliClient;
//! use tautulli_exporter::config::load_config;
//! use tautulli_exporter::core::export::ExportWorkflow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("exporter.toml")?;
//!     config.validate()?;
//!
//!     let api_key = config.tautulli.api_key.clone().ok_or("missing api key")?;
//!     let client = TautulliClient::new(
//!         &config.tautulli.base_url,
//!         api_key,
//!         config.request_timeout(),
//!     )?;
//!
//!     let mut workflow = ExportWorkflow::from_config(&config, Arc::new(client))?;
//!     let summary = workflow.run().await?;
//!
//!     println!("Saved {}", summary.destination.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every step of a run maps its failure onto one [`domain::ExporterError`]
//! variant. Remote failures keep their [`domain::TautulliError`] as the source:
//!
//! ```rust,no_run
//! use tautulli_exporter::domain::{error_chain, ExporterError};
//!
//! fn report(err: &ExporterError) {
//!     eprintln!("{}", error_chain(err));
//! }
//! ```
//!
//! ## Logging
//!
//! The exporter logs with the `tracing` crate. Step progress is logged at
//! `info`, each status check at `debug`:
//!
//! ```rust,no_run
//! tracing::info!("Exporting library...");
//! tracing::debug!(export_id = 42, complete = 0, "Export still pending");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
