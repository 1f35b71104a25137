// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Content type detection

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Decodable content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Json,
    Yaml,
    Unknown,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::Json => "JSON",
            ContentType::Yaml => "YAML",
            ContentType::Unknown => "unknown",
        })
    }
}

/// What the verdict was based on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// The file name carried a `.json`, `.yaml` or `.yml` extension
    Extension,
    /// The trimmed content looked like one format
    Content,
    /// Nothing matched
    Undetermined,
}

/// Classifier verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub content_type: ContentType,
    pub source: DetectionSource,
}

/// File kinds recognized for routing and logging. Only JSON and YAML are
/// decodable; every other kind goes through content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    Yaml,
    Toml,
    Xml,
    Config,
    Properties,
    DotEnv,
    Terraform,
    Dockerfile,
    Other,
}

impl FileKind {
    pub fn from_filename(filename: &str) -> Self {
        match extension_of(filename).as_deref() {
            Some("json") => FileKind::Json,
            Some("yaml" | "yml") => FileKind::Yaml,
            Some("toml") => FileKind::Toml,
            Some("xml") => FileKind::Xml,
            Some("config" | "conf") => FileKind::Config,
            Some("properties") => FileKind::Properties,
            Some("env") => FileKind::DotEnv,
            Some("tf" | "hcl") => FileKind::Terraform,
            Some("dockerfile") => FileKind::Dockerfile,
            _ => FileKind::Other,
        }
    }
}

/// Lowercased extension of a file name, without the dot.
///
/// Dotfiles like `.env` count as having the extension `env`, and a bare
/// `Dockerfile` counts as `dockerfile`.
pub fn extension_of(filename: &str) -> Option<String> {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    if name.eq_ignore_ascii_case("dockerfile") {
        return Some("dockerfile".to_string());
    }

    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}

/// Decide whether `content` is JSON, YAML or unknown.
///
/// A recognized extension wins over content inspection. Never fails.
pub fn detect_content_type(content: &str, filename: &str) -> Detection {
    match extension_of(filename).as_deref() {
        Some("json") => return Detection::from_extension(ContentType::Json),
        Some("yaml" | "yml") => return Detection::from_extension(ContentType::Yaml),
        _ => {}
    }

    let trimmed = content.trim();

    if looks_like_json(trimmed) {
        return Detection::from_content(ContentType::Json);
    }

    if trimmed.contains("---") || has_key_line(trimmed) || trimmed.starts_with("- ") {
        return Detection::from_content(ContentType::Yaml);
    }

    Detection {
        content_type: ContentType::Unknown,
        source: DetectionSource::Undetermined,
    }
}

/// Trimmed text enclosed in `{}` or `[]`
pub fn looks_like_json(content: &str) -> bool {
    let trimmed = content.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}

fn has_key_line(content: &str) -> bool {
    static KEY_LINE: OnceLock<Option<Regex>> = OnceLock::new();
    KEY_LINE
        .get_or_init(|| Regex::new(r"(?m)^\s*[\w.-]+\s*:").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(content))
}

impl Detection {
    fn from_extension(content_type: ContentType) -> Self {
        Self {
            content_type,
            source: DetectionSource::Extension,
        }
    }

    fn from_content(content_type: ContentType) -> Self {
        Self {
            content_type,
            source: DetectionSource::Content,
        }
    }
}
