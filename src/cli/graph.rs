// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Graph command - print the infrastructure of a file as a diagram

use miette::Result;
use std::path::PathBuf;

use super::{load_analyzer, GraphFormat};

/// Run the graph command
pub async fn run(
    file: PathBuf,
    format: GraphFormat,
    config: Option<PathBuf>,
    _verbose: bool,
) -> Result<()> {
    let analyzer = load_analyzer(config.as_deref())?;
    let report = analyzer.analyze_file(&file).await?;

    if let Some(error) = &report.parse_error {
        return Err(miette::miette!("Failed to parse {}: {}", file.display(), error));
    }

    let diagram = report.diagram();
    let output = match format {
        GraphFormat::Mermaid => diagram.to_mermaid(),
        GraphFormat::Dot => diagram.to_dot(),
    };

    print!("{}", output);

    Ok(())
}
