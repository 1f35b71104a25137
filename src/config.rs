// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Settings loading
//!
//! Load limits and scan options from `.infrascope.yaml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analyzer::extension_of;
use crate::errors::{InfraError, InfraResult};

/// Default settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = ".infrascope.yaml";

/// Extensions accepted by upload gatekeeping unless overridden
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "json",
    "yaml",
    "yml",
    "toml",
    "xml",
    "config",
    "conf",
    "properties",
    "env",
    "tf",
    "hcl",
    "dockerfile",
];

/// Settings from .infrascope.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Largest file accepted, in bytes
    pub max_file_size: u64,

    /// Accepted extensions, lowercase and without the dot
    pub allowed_extensions: Vec<String>,

    /// Accept files that have no extension at all
    pub allow_no_extension: bool,

    /// Characters of raw content kept in the report preview
    pub preview_chars: usize,

    /// Deepest nesting level tree walks will expand
    pub max_depth: usize,

    /// Sensitive key detection
    pub secret_scan: SecretScanSettings,
}

/// Sensitive key detection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretScanSettings {
    /// Match `password`/`secret`/`key` only in the exact case given
    pub case_sensitive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            allow_no_extension: true,
            preview_chars: 500,
            max_depth: 100,
            secret_scan: SecretScanSettings::default(),
        }
    }
}

impl Settings {
    /// Load from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> InfraResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| InfraError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| InfraError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a project directory (looks for .infrascope.yaml)
    pub fn load_from_dir(dir: &Path) -> InfraResult<Self> {
        Self::load(&dir.join(SETTINGS_FILE))
    }

    /// Parse settings from YAML; an empty document yields defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Upload gatekeeping: size cap and extension allow-list
    pub fn check_upload(&self, path: &Path, size: u64) -> InfraResult<()> {
        if size > self.max_file_size {
            return Err(InfraError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_file_size,
            });
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match extension_of(&file_name) {
            None if self.allow_no_extension => Ok(()),
            Some(ext) if self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => {
                Ok(())
            }
            other => Err(InfraError::UnsupportedExtension {
                path: PathBuf::from(path),
                extension: other.unwrap_or_else(|| "(none)".to_string()),
                allowed: self.allowed_extensions.join(", "),
            }),
        }
    }
}
