// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Error types
//!
//! Only CLI-level problems surface as errors. Everything that goes wrong
//! while reading a configuration's contents degrades to a field of the
//! ingest report instead.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for infrascope operations
pub type InfraResult<T> = Result<T, InfraError>;

/// Main error type for infrascope
#[derive(Error, Debug, Diagnostic)]
pub enum InfraError {
    // ─────────────────────────────────────────────────────────────────────────
    // Decode Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to parse as JSON or YAML. JSON error: {json_error}. YAML error: {yaml_error}")]
    #[diagnostic(
        code(infrascope::decode_failed),
        help("Check the file for syntax errors; only JSON and YAML content can be analyzed")
    )]
    Decode {
        json_error: String,
        yaml_error: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Upload Gatekeeping
    // ─────────────────────────────────────────────────────────────────────────
    #[error("File '{path}' is {size} bytes, above the {limit} byte limit")]
    #[diagnostic(
        code(infrascope::file_too_large),
        help("Raise 'max_file_size' in .infrascope.yaml or split the configuration")
    )]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Unsupported file type '{extension}' for '{path}'")]
    #[diagnostic(
        code(infrascope::unsupported_extension),
        help("Supported extensions: {allowed}")
    )]
    UnsupportedExtension {
        path: PathBuf,
        extension: String,
        allowed: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    #[diagnostic(code(infrascope::file_not_found))]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(infrascope::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(infrascope::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid settings in '{path}': {message}")]
    #[diagnostic(
        code(infrascope::invalid_settings),
        help("See 'infrascope --help' for the supported .infrascope.yaml keys")
    )]
    InvalidSettings { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Export Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("JSON error: {message}")]
    #[diagnostic(code(infrascope::json_error))]
    Json { message: String },
}

impl From<serde_json::Error> for InfraError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl InfraError {
    /// Create a decode error from the two parser messages
    pub fn decode(json_error: impl Into<String>, yaml_error: impl Into<String>) -> Self {
        Self::Decode {
            json_error: json_error.into(),
            yaml_error: yaml_error.into(),
        }
    }

    /// True for errors raised by upload gatekeeping rather than by decoding
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::FileTooLarge { .. } | Self::UnsupportedExtension { .. }
        )
    }
}
