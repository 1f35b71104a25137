// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for infrascope.

pub mod analyze;
pub mod export;
pub mod graph;
pub mod validate;

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::{Path, PathBuf};

use crate::analyzer::{ExportKind, InfraAnalyzer};
use crate::config::Settings;

/// Infrastructure configuration analyzer
///
/// Ingest JSON/YAML infrastructure files, normalize them and report on them.
#[derive(Parser, Debug)]
#[clap(
    name = "infrascope",
    version,
    about = "Analyze, normalize and diagram infrastructure configuration files",
    long_about = None,
    after_help = "Examples:\n\
        infrascope analyze docker-compose.yml       Analyze a file\n\
        infrascope validate infra.json              Check the structure of a file\n\
        infrascope graph infra.yaml                 Print a Mermaid diagram\n\
        infrascope export infra.yaml -k summary     Export a JSON summary\n\n\
        See 'infrascope <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Settings file (defaults to .infrascope.yaml in the working directory)
    #[clap(long, global = true, env = "INFRASCOPE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze infrastructure files
    Analyze {
        /// Files to analyze
        files: Vec<PathBuf>,

        /// Output format (text, json)
        #[clap(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check whether a file looks like an infrastructure configuration
    Validate {
        /// File to validate
        file: PathBuf,
    },

    /// Show the infrastructure of a file as a diagram
    Graph {
        /// File to diagram
        file: PathBuf,

        /// Output format (mermaid, dot)
        #[clap(short, long, default_value = "mermaid")]
        format: GraphFormat,
    },

    /// Export analysis results as JSON
    Export {
        /// File to export
        file: PathBuf,

        /// What to export
        #[clap(short, long, value_enum, default_value = "canonical")]
        kind: ExportKind,

        /// Output file (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

/// Output format for analyze command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" => Ok(Self::Mermaid),
            "dot" => Ok(Self::Dot),
            _ => Err(format!("Unknown graph format: {}", s)),
        }
    }
}

/// Build an analyzer from the explicit settings file, or the one in the
/// working directory when none was given
pub fn load_analyzer(config: Option<&Path>) -> Result<InfraAnalyzer> {
    let settings = match config {
        Some(path) => {
            if !path.exists() {
                return Err(miette::miette!(
                    "Settings file not found: {}",
                    path.display()
                ));
            }
            Settings::load(path)?
        }
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
            Settings::load_from_dir(&cwd)?
        }
    };

    Ok(InfraAnalyzer::new(settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::try_parse_from([
            "infrascope",
            "export",
            "infra.yaml",
            "--kind",
            "summary",
            "-o",
            "out.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Export { file, kind, output } => {
                assert_eq!(file, PathBuf::from("infra.yaml"));
                assert_eq!(kind, ExportKind::Summary);
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_format_defaults() {
        let cli = Cli::try_parse_from(["infrascope", "graph", "a.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Graph { format: GraphFormat::Mermaid, .. }
        ));

        let cli = Cli::try_parse_from(["infrascope", "analyze", "a.json", "-f", "JSON"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Analyze { format: OutputFormat::Json, .. }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["infrascope", "graph", "a.json", "-f", "png"]).is_err());
    }

    #[test]
    fn test_missing_explicit_settings_file() {
        assert!(load_analyzer(Some(Path::new("/nonexistent/.infrascope.yaml"))).is_err());
    }
}
