// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Validate command - check whether a file looks like infrastructure

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::load_analyzer;
use crate::utils::{self, print_error, print_success, print_warning};

/// Run the validate command
pub async fn run(file: PathBuf, config: Option<PathBuf>, verbose: bool) -> Result<()> {
    println!("{}", "Validating configuration...".bold());
    println!();

    let analyzer = load_analyzer(config.as_deref())?;
    let report = analyzer.analyze_file(&file).await?;

    if let Some(error) = &report.parse_error {
        print_error("Failed to parse file");
        eprintln!();
        return Err(miette::miette!("Parse error: {}", error));
    }

    print_success(&format!("File is valid {}", report.detected_type));

    let Some(validation) = &report.validation else {
        return Err(miette::miette!("No validation result for {}", file.display()));
    };

    println!(
        "  Detected format: {} (confidence: {})",
        validation
            .detected_format
            .as_deref()
            .unwrap_or("none")
            .bold(),
        utils::confidence(validation.confidence)
    );

    if !report.suggestions.is_empty() {
        println!();
        println!("{}:", "Suggestions".yellow().bold());
        for suggestion in &report.suggestions {
            print_warning(suggestion);
        }
    }

    if verbose {
        if let Some(parsed) = &report.parsed {
            println!();
            println!("{}:", "Summary".bold());
            println!("  Services: {}", parsed.services().len());
            println!("  Databases: {}", parsed.databases().len());
            println!("  Environment variables: {}", parsed.environment_len());
        }
    }

    println!();

    if validation.is_valid {
        println!("{}", "Configuration looks valid!".green().bold());
        Ok(())
    } else {
        Err(miette::miette!(
            "{} is not recognized as an infrastructure configuration",
            file.display()
        ))
    }
}
