// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Analyze command - ingest files and report on them

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use super::{load_analyzer, OutputFormat};
use crate::analyzer::{export_as_json, IngestReport};
use crate::utils::{self, print_bullet, print_header, print_section};

/// Run the analyze command
pub async fn run(
    files: Vec<PathBuf>,
    format: OutputFormat,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    if files.is_empty() {
        return Err(miette::miette!(
            "No files specified.\n\n\
             Usage: infrascope analyze <file>..."
        ));
    }

    let analyzer = load_analyzer(config.as_deref())?;
    let mut reports = Vec::new();

    for file in &files {
        match analyzer.analyze_file(file).await {
            Ok(report) => match format {
                OutputFormat::Text => print_text_report(file, &report, verbose),
                OutputFormat::Json => reports.push(report),
            },
            Err(e) => {
                eprintln!("{}: Failed to analyze {}: {}", "Error".red(), file.display(), e);
            }
        }
    }

    if format == OutputFormat::Json {
        let json = match reports.as_slice() {
            [single] => export_as_json(single)?,
            many => export_as_json(many)?,
        };
        println!("{}", json);
    }

    Ok(())
}

fn print_text_report(file: &Path, report: &IngestReport, verbose: bool) {
    println!();
    print_header(&format!("Analyzing: {}", file.display()));
    println!();

    println!("{}:  {}", "Format".bold(), report.detected_type);
    println!("{}:    {} bytes", "Size".bold(), report.size);

    if let Some(error) = &report.parse_error {
        println!();
        println!("{}: {}", "Parse error".red().bold(), error);
        print_section("Preview");
        println!("{}", report.preview.dimmed());
        println!();
        return;
    }

    if let Some(validation) = &report.validation {
        println!(
            "{}:  {} ({})",
            "Detected".bold(),
            validation.detected_format.as_deref().unwrap_or("-"),
            utils::confidence(validation.confidence)
        );
    }

    if let Some(parsed) = &report.parsed {
        print_section("Services");
        if parsed.services().is_empty() {
            println!("  {}", "none".dimmed());
        }
        for service in parsed.services() {
            let runtime = service
                .runtime
                .as_deref()
                .map(|r| format!(" [{}]", r))
                .unwrap_or_default();
            println!("  • {} ({}){}", service.name, service.service_type, runtime.dimmed());
        }

        print_section("Databases");
        if parsed.databases().is_empty() {
            println!("  {}", "none".dimmed());
        }
        for db in parsed.databases() {
            let port = db.port.map(|p| format!(":{}", p)).unwrap_or_default();
            let host = db.host.as_deref().unwrap_or("");
            println!("  • {}: {} {}", db.db_type, db.name, format!("{}{}", host, port).dimmed());
        }

        println!();
        println!(
            "{}: {} variable(s)",
            "Environment".bold(),
            parsed.environment_len()
        );
    }

    if let Some(metadata) = &report.metadata {
        print_section("Complexity");
        println!(
            "  {} ({} properties, depth {})",
            utils::complexity(metadata.complexity),
            metadata.total_properties,
            metadata.max_depth
        );
        if verbose {
            for key in &metadata.sensitive_keys {
                println!("  {} {}", "⚠".yellow(), key);
            }
        }
        if !metadata.recommendations.is_empty() {
            print_section("Recommendations");
            for recommendation in &metadata.recommendations {
                print_bullet(recommendation);
            }
        }
    }

    if !report.suggestions.is_empty() {
        print_section("Suggestions");
        for suggestion in &report.suggestions {
            print_bullet(suggestion);
        }
    }

    println!();
}
