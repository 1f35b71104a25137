// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Infrastructure summary and JSON export

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metadata::{analyze_metadata, ComplexityLevel, MetadataOptions};
use crate::errors::InfraResult;
use crate::model::CanonicalInfra;

/// Aggregate view of a canonical description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfraSummary {
    pub services: usize,
    pub databases: usize,
    pub environment_variables: usize,
    /// Service count per type
    pub service_types: BTreeMap<String, usize>,
    /// Database count per type
    pub database_types: BTreeMap<String, usize>,
    /// Distinct runtimes in first-seen order
    pub runtimes: Vec<String>,
    pub complexity: ComplexityLevel,
    pub total_properties: usize,
    pub max_depth: usize,
    pub sensitive_keys: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Summarize a canonical description with default walker settings
pub fn generate_infra_summary(canonical: &CanonicalInfra) -> InfraSummary {
    summarize(canonical, &MetadataOptions::default())
}

/// Summarize a canonical description. Complexity figures come from walking
/// the canonical shape itself.
pub fn summarize(canonical: &CanonicalInfra, options: &MetadataOptions) -> InfraSummary {
    let metadata = analyze_metadata(&canonical.to_raw_tree(), options);

    let mut service_types = BTreeMap::new();
    let mut runtimes: Vec<String> = Vec::new();
    for service in canonical.services() {
        *service_types.entry(service.service_type.clone()).or_insert(0) += 1;
        if let Some(runtime) = &service.runtime {
            if !runtimes.contains(runtime) {
                runtimes.push(runtime.clone());
            }
        }
    }

    let mut database_types = BTreeMap::new();
    for database in canonical.databases() {
        *database_types.entry(database.db_type.clone()).or_insert(0) += 1;
    }

    InfraSummary {
        services: canonical.services().len(),
        databases: canonical.databases().len(),
        environment_variables: canonical.environment_len(),
        service_types,
        database_types,
        runtimes,
        complexity: metadata.complexity,
        total_properties: metadata.total_properties,
        max_depth: metadata.max_depth,
        sensitive_keys: metadata.sensitive_keys,
        recommendations: metadata.recommendations,
    }
}

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// The normalized services/databases/environment
    Canonical,
    /// The decoded input tree
    Raw,
    /// The aggregate summary
    Summary,
}

impl ExportKind {
    /// Suggested download file name
    pub fn file_name(self, source_stem: &str) -> String {
        let suffix = match self {
            ExportKind::Canonical => "canonical",
            ExportKind::Raw => "raw",
            ExportKind::Summary => "summary",
        };
        format!("{source_stem}-{suffix}.json")
    }
}

/// Serialize any export as pretty-printed JSON
pub fn export_as_json<T: Serialize + ?Sized>(value: &T) -> InfraResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
