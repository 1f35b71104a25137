// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Export command - write canonical, raw or summary JSON

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::load_analyzer;
use crate::analyzer::{export_as_json, ExportKind};
use crate::errors::InfraError;

/// Run the export command
pub async fn run(
    file: PathBuf,
    kind: ExportKind,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let analyzer = load_analyzer(config.as_deref())?;
    let report = analyzer.analyze_file(&file).await?;

    if let Some(error) = &report.parse_error {
        return Err(miette::miette!("Failed to parse {}: {}", file.display(), error));
    }

    let json = match kind {
        ExportKind::Canonical => export_as_json(&report.parsed)?,
        ExportKind::Raw => export_as_json(&report.raw_parsed)?,
        ExportKind::Summary => export_as_json(&report.summary(&analyzer.metadata_options()))?,
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, format!("{}\n", json))
                .await
                .map_err(|e| InfraError::FileWriteError {
                    path: path.clone(),
                    error: e.to_string(),
                })?;

            if verbose {
                let stem = file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "export".to_string());
                eprintln!("  suggested name: {}", kind.file_name(&stem).dimmed());
            }
            eprintln!("{} {}", "✓ Exported to".green(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
