// Tautulli Exporter - library metadata export tool
// Copyright (c) 2025 Tautulli Exporter Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use tautulli_exporter::cli::Cli;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let exit_code = match cli
        .export
        .execute(cli.config.as_deref(), cli.log_level.as_deref())
        .await
    {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    process::exit(exit_code);
}
