// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! infrascope - infrastructure configuration analyzer
//!
//! Ingest JSON/YAML infrastructure files and report on them.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use infrascope::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so JSON output stays clean
    let default_filter = if cli.verbose {
        "infrascope=debug"
    } else {
        "infrascope=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Analyze { files, format } => {
            infrascope::cli::analyze::run(files, format, cli.config, cli.verbose).await
        }
        Commands::Validate { file } => {
            infrascope::cli::validate::run(file, cli.config, cli.verbose).await
        }
        Commands::Graph { file, format } => {
            infrascope::cli::graph::run(file, format, cli.config, cli.verbose).await
        }
        Commands::Export { file, kind, output } => {
            infrascope::cli::export::run(file, kind, output, cli.config, cli.verbose).await
        }
    }
}
