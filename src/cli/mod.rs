//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the exporter using clap.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

/// Export a Tautulli library's metadata to a local file
#[derive(Parser, Debug)]
#[command(name = "tautulli-exporter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "TAUTULLI_EXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, alias = "log_level")]
    pub log_level: Option<String>,

    /// Export settings
    #[command(flatten)]
    pub export: commands::export::ExportArgs,
}
