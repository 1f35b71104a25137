// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Structure classification
//!
//! Scores a decoded tree against known infrastructure conventions. The
//! result is informational only; extraction always runs.

use serde::{Deserialize, Serialize};

use super::sensitive::{SensitiveKeyMatcher, STRUCTURE_NEEDLES};
use crate::tree::{Mapping, RawTree};

/// How well the input matched a known convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Map an accumulated score onto a confidence level
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 3 => Confidence::High,
            s if s >= 1 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

/// Outcome of structure classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub confidence: Confidence,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_format: Option<String>,
}

/// A known convention and the top-level keys that signal it
#[derive(Debug, Clone, Copy)]
pub struct FormatSignature {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub weight: u32,
    /// Key that must also be present for the signature to count
    pub required_key: Option<&'static str>,
}

impl FormatSignature {
    fn matches(&self, map: &Mapping) -> bool {
        self.tags.iter().any(|tag| map.contains_key(tag))
            && self.required_key.map_or(true, |key| map.contains_key(key))
    }
}

/// Signatures in scoring order. All matching signatures add up.
pub const SIGNATURES: &[FormatSignature] = &[
    FormatSignature {
        name: "Kubernetes",
        tags: &["apiVersion", "kind", "metadata", "spec"],
        weight: 3,
        required_key: None,
    },
    FormatSignature {
        name: "Docker Compose",
        tags: &["version", "services", "volumes", "networks"],
        weight: 3,
        required_key: Some("services"),
    },
    FormatSignature {
        name: "Terraform",
        tags: &["resource", "provider", "variable", "output"],
        weight: 2,
        required_key: None,
    },
    FormatSignature {
        name: "Generic Infrastructure",
        tags: &["services", "applications", "apps", "components", "containers"],
        weight: 2,
        required_key: None,
    },
    FormatSignature {
        name: "Database Config",
        tags: &["databases", "db", "data", "storage"],
        weight: 1,
        required_key: None,
    },
    FormatSignature {
        name: "Environment Config",
        tags: &["environment", "env", "config", "variables"],
        weight: 1,
        required_key: None,
    },
];

/// Top-level key count above which a reorganization note is added
const CROWDED_KEY_COUNT: usize = 10;

/// Accumulated score and the names of every matched signature
pub fn score(map: &Mapping) -> (u32, Vec<&'static str>) {
    SIGNATURES
        .iter()
        .filter(|sig| sig.matches(map))
        .fold((0, Vec::new()), |(total, mut names), sig| {
            names.push(sig.name);
            (total + sig.weight, names)
        })
}

/// Structure classifier
#[derive(Debug, Clone, Copy)]
pub struct StructureClassifier {
    matcher: SensitiveKeyMatcher,
}

impl StructureClassifier {
    /// Create a classifier; `case_sensitive` controls the sensitive key scan
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            matcher: SensitiveKeyMatcher::new(STRUCTURE_NEEDLES, case_sensitive),
        }
    }

    /// Classify a decoded tree. `None` means nothing was decoded.
    pub fn classify(&self, tree: Option<&RawTree>) -> ValidationResult {
        match tree {
            Some(RawTree::Mapping(map)) => self.classify_mapping(map),
            Some(RawTree::Sequence(_)) => ValidationResult {
                is_valid: true,
                confidence: Confidence::Medium,
                suggestions: vec![
                    "Array detected: each item will be treated as a service".to_string(),
                ],
                detected_format: Some("Service Array".to_string()),
            },
            _ => ValidationResult {
                is_valid: false,
                confidence: Confidence::Low,
                suggestions: vec![
                    "Provide a JSON or YAML object (or an array of services) describing your infrastructure"
                        .to_string(),
                ],
                detected_format: None,
            },
        }
    }

    fn classify_mapping(&self, map: &Mapping) -> ValidationResult {
        let (total, matched) = score(map);
        let confidence = Confidence::from_score(total);

        let mut suggestions = Vec::new();
        match confidence {
            Confidence::High => {}
            Confidence::Medium => suggestions.push(
                "Structure partially recognized. Use top-level 'services', 'databases' and \
                 'environment' keys for the most complete extraction"
                    .to_string(),
            ),
            Confidence::Low => {
                suggestions.push(
                    "No known infrastructure format detected. Add a 'services' array or object \
                     to describe your components"
                        .to_string(),
                );
                suggestions.push(
                    "Nested objects will be shown as generic components".to_string(),
                );
            }
        }

        if matched.contains(&"Terraform") {
            suggestions.push(
                "Terraform blocks are shown as generic components; resources are not expanded"
                    .to_string(),
            );
        }
        if matched.contains(&"Kubernetes") && !map.contains_key("services") {
            suggestions.push(
                "Kubernetes manifest detected: workloads under 'spec' are shown as components"
                    .to_string(),
            );
        }

        if map.len() > CROWDED_KEY_COUNT {
            suggestions.push(format!(
                "Configuration has {} top-level keys; consider organizing related settings into sections",
                map.len()
            ));
        }

        let sensitive: Vec<&str> = map.keys().filter(|k| self.matcher.matches(k)).collect();
        if !sensitive.is_empty() {
            suggestions.push(format!(
                "Security warning: keys that may hold credentials ({}). Avoid committing secrets to configuration files",
                sensitive.join(", ")
            ));
        }

        let detected_format = if !matched.is_empty() {
            matched.join(" + ")
        } else if map.values().any(|v| v.as_mapping().is_some()) {
            "Generic Config".to_string()
        } else {
            "Unknown Format".to_string()
        };

        ValidationResult {
            is_valid: true,
            confidence,
            suggestions,
            detected_format: Some(detected_format),
        }
    }
}

impl Default for StructureClassifier {
    fn default() -> Self {
        Self::new(false)
    }
}
