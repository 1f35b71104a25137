// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Infrastructure analyzer
//!
//! Runs one uploaded file through classification, decoding, normalization
//! and the informational analyzers, and collects everything into an
//! [`IngestReport`]. Nothing here fails on bad content: decode problems
//! become `parse_error`, and the structure and metadata passes are
//! independent of normalization.

pub mod content_type;
pub mod decoder;
pub mod metadata;
pub mod normalizer;
mod sensitive;
pub mod structure;
pub mod summary;

pub use content_type::{detect_content_type, extension_of, ContentType, Detection, FileKind};
pub use decoder::{decode, Decoded};
pub use metadata::{analyze_metadata, ComplexityLevel, Metadata, MetadataOptions};
pub use normalizer::normalize;
pub use structure::{Confidence, StructureClassifier, ValidationResult};
pub use summary::{export_as_json, generate_infra_summary, summarize, ExportKind, InfraSummary};

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::diagram::{Diagram, DiagramBuilder};
use crate::errors::{InfraError, InfraResult};
use crate::model::CanonicalInfra;
use crate::tree::RawTree;
use content_type::DetectionSource;

/// Everything derived from one uploaded file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub filename: String,
    /// Size of the raw upload in bytes
    pub size: usize,
    /// Leading characters of the raw content
    pub preview: String,
    /// Format that decoded, or the classifier verdict when decoding failed
    #[serde(rename = "type")]
    pub detected_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<CanonicalInfra>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_parsed: Option<RawTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub suggestions: Vec<String>,
}

impl IngestReport {
    /// Diagram of the parsed content, or the placeholder when nothing parsed
    pub fn diagram(&self) -> Diagram {
        let empty = CanonicalInfra::default();
        DiagramBuilder::build(self.parsed.as_ref().unwrap_or(&empty), self.raw_parsed.as_ref())
    }

    /// Summary of the parsed content
    pub fn summary(&self, options: &MetadataOptions) -> InfraSummary {
        let empty = CanonicalInfra::default();
        summarize(self.parsed.as_ref().unwrap_or(&empty), options)
    }
}

/// Stateless analyzer configured from [`Settings`]
#[derive(Debug, Clone)]
pub struct InfraAnalyzer {
    settings: Settings,
}

impl InfraAnalyzer {
    /// Create a new analyzer
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Tree walker settings derived from the analyzer settings
    pub fn metadata_options(&self) -> MetadataOptions {
        MetadataOptions {
            max_depth: self.settings.max_depth,
            case_sensitive: self.settings.secret_scan.case_sensitive,
        }
    }

    /// Read a file from disk, apply upload gatekeeping, and ingest it
    pub async fn analyze_file(&self, path: &Path) -> InfraResult<IngestReport> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => InfraError::FileNotFound {
                    path: path.to_path_buf(),
                },
                _ => InfraError::FileReadError {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                },
            })?
            .len();

        if let Err(e) = self.settings.check_upload(path, size) {
            warn!(path = %path.display(), error = %e, "upload rejected");
            return Err(e);
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| InfraError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(self.ingest(&filename, &bytes))
    }

    /// Process one upload. Never fails; problems are reported in the result.
    pub fn ingest(&self, filename: &str, bytes: &[u8]) -> IngestReport {
        let content = String::from_utf8_lossy(bytes);
        let kind = FileKind::from_filename(filename);
        let detection = detect_content_type(&content, filename);
        debug!(filename, ?kind, verdict = %detection.content_type, source = ?detection.source, "classified upload");

        let preview: String = content.chars().take(self.settings.preview_chars).collect();

        let mut report = IngestReport {
            filename: filename.to_string(),
            size: bytes.len(),
            preview,
            detected_type: detection.content_type,
            parsed: None,
            raw_parsed: None,
            parse_error: None,
            validation: None,
            metadata: None,
            suggestions: Vec::new(),
        };

        let decoded = match decode(&content, &detection) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(filename, error = %e, "decode failed");
                report.parse_error = Some(e.to_string());
                return report;
            }
        };

        let classifier = StructureClassifier::new(self.settings.secret_scan.case_sensitive);
        let validation = classifier.classify(Some(&decoded.tree));
        let parsed = normalize(Some(&decoded.tree));
        let metadata = analyze_metadata(&decoded.tree, &self.metadata_options());

        if detection.source == DetectionSource::Extension
            && decoded.effective_type != detection.content_type
        {
            report.suggestions.push(format!(
                "File extension suggests {} but the content was parsed as {}",
                detection.content_type, decoded.effective_type
            ));
        }
        report.suggestions.extend(validation.suggestions.iter().cloned());

        info!(
            filename,
            format = %decoded.effective_type,
            services = parsed.services().len(),
            databases = parsed.databases().len(),
            environment = parsed.environment_len(),
            "ingested"
        );

        report.detected_type = decoded.effective_type;
        report.parsed = Some(parsed);
        report.raw_parsed = Some(decoded.tree);
        report.validation = Some(validation);
        report.metadata = Some(metadata);
        report
    }
}

impl Default for InfraAnalyzer {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
