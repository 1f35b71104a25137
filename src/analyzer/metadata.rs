// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Metadata and complexity analysis

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::sensitive::{SensitiveKeyMatcher, VALUE_NEEDLES};
use crate::tree::RawTree;

/// Coarse complexity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
}

/// Aggregate statistics over a tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Array lengths plus object key counts, summed over every level
    pub total_properties: usize,
    /// Deepest container level reached, the root container being 1
    pub max_depth: usize,
    /// Some container sits below the root
    pub has_nesting: bool,
    /// Dotted paths of keys holding a non-empty credential-like string
    pub sensitive_keys: Vec<String>,
    pub complexity: ComplexityLevel,
    pub recommendations: Vec<String>,
    /// Content below the depth limit was not expanded
    pub truncated: bool,
}

/// Tree walker settings
#[derive(Debug, Clone, Copy)]
pub struct MetadataOptions {
    pub max_depth: usize,
    pub case_sensitive: bool,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            max_depth: 100,
            case_sensitive: false,
        }
    }
}

#[derive(Default)]
struct Walk {
    total_properties: usize,
    max_depth: usize,
    has_nesting: bool,
    sensitive_keys: Vec<String>,
    truncated: bool,
}

/// Walk every node of `tree` and derive complexity and recommendations
pub fn analyze_metadata(tree: &RawTree, options: &MetadataOptions) -> Metadata {
    let matcher = SensitiveKeyMatcher::new(VALUE_NEEDLES, options.case_sensitive);
    let mut walk = Walk::default();
    visit(tree, 0, "", options.max_depth, &matcher, &mut walk);

    if walk.truncated {
        warn!(limit = options.max_depth, "nesting limit reached, deeper content treated as opaque");
    }

    let complexity = classify(walk.total_properties, walk.has_nesting);
    let recommendations = recommend(complexity, &walk, options.max_depth);

    Metadata {
        total_properties: walk.total_properties,
        max_depth: walk.max_depth,
        has_nesting: walk.has_nesting,
        sensitive_keys: walk.sensitive_keys,
        complexity,
        recommendations,
        truncated: walk.truncated,
    }
}

fn visit(
    node: &RawTree,
    depth: usize,
    path: &str,
    limit: usize,
    matcher: &SensitiveKeyMatcher,
    walk: &mut Walk,
) {
    if !node.is_container() {
        return;
    }
    if depth >= limit {
        walk.truncated = true;
        return;
    }

    walk.max_depth = walk.max_depth.max(depth + 1);
    if depth > 0 {
        walk.has_nesting = true;
    }

    match node {
        RawTree::Sequence(items) => {
            walk.total_properties += items.len();
            for (idx, item) in items.iter().enumerate() {
                visit(item, depth + 1, &format!("{path}[{idx}]"), limit, matcher, walk);
            }
        }
        RawTree::Mapping(map) => {
            walk.total_properties += map.len();
            for (key, value) in map.iter() {
                let child = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{path}.{key}")
                };
                if matcher.matches(key) && value.as_str().is_some_and(|s| !s.is_empty()) {
                    walk.sensitive_keys.push(child.clone());
                }
                visit(value, depth + 1, &child, limit, matcher, walk);
            }
        }
        _ => {}
    }
}

/// Bucket a property count
pub fn classify(total_properties: usize, has_nesting: bool) -> ComplexityLevel {
    if total_properties > 50 || (has_nesting && total_properties > 20) {
        ComplexityLevel::Complex
    } else if total_properties > 15 || has_nesting {
        ComplexityLevel::Moderate
    } else {
        ComplexityLevel::Simple
    }
}

fn recommend(complexity: ComplexityLevel, walk: &Walk, limit: usize) -> Vec<String> {
    let mut recommendations = Vec::new();

    match complexity {
        ComplexityLevel::Complex => {
            recommendations.push(
                "Split this configuration into smaller files per service or environment"
                    .to_string(),
            );
            recommendations.push(
                "Describe service relationships with an orchestration format such as Docker Compose or Kubernetes"
                    .to_string(),
            );
        }
        ComplexityLevel::Moderate => {
            recommendations.push(
                "Group related settings into named sections to keep the configuration readable"
                    .to_string(),
            );
        }
        ComplexityLevel::Simple => {}
    }

    if !walk.sensitive_keys.is_empty() {
        recommendations.push(format!(
            "Move {} credential value(s) into a secrets manager or an untracked .env file",
            walk.sensitive_keys.len()
        ));
        recommendations.push(
            "Never commit plaintext passwords or secrets to version control".to_string(),
        );
    }

    if walk.truncated {
        recommendations.push(format!(
            "Nesting exceeds {limit} levels; flatten the structure so it can be fully analyzed"
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(json: &str) -> Metadata {
        let tree: RawTree = serde_json::from_str(json).unwrap();
        analyze_metadata(&tree, &MetadataOptions::default())
    }

    #[test]
    fn test_simple_flat_object() {
        let meta = analyze(r#"{"name": "test", "value": 42}"#);
        assert_eq!(meta.total_properties, 2);
        assert_eq!(meta.max_depth, 1);
        assert!(!meta.has_nesting);
        assert_eq!(meta.complexity, ComplexityLevel::Simple);
        assert!(meta.recommendations.is_empty());
    }

    #[test]
    fn test_counts_across_levels() {
        let meta = analyze(r#"{"a": {"b": {"c": 1}}, "list": [1, 2, 3]}"#);
        // root 2 + a 1 + b 1 + list 3
        assert_eq!(meta.total_properties, 7);
        assert_eq!(meta.max_depth, 3);
        assert!(meta.has_nesting);
        assert_eq!(meta.complexity, ComplexityLevel::Moderate);
    }

    #[test]
    fn test_scalar_root() {
        let meta = analyze(r#""hello""#);
        assert_eq!(meta.total_properties, 0);
        assert_eq!(meta.max_depth, 0);
        assert_eq!(meta.complexity, ComplexityLevel::Simple);
    }

    #[test]
    fn test_complexity_buckets() {
        assert_eq!(classify(15, false), ComplexityLevel::Simple);
        assert_eq!(classify(16, false), ComplexityLevel::Moderate);
        assert_eq!(classify(20, true), ComplexityLevel::Moderate);
        assert_eq!(classify(21, true), ComplexityLevel::Complex);
        assert_eq!(classify(50, false), ComplexityLevel::Moderate);
        assert_eq!(classify(51, false), ComplexityLevel::Complex);
    }

    #[test]
    fn test_sensitive_values() {
        let meta = analyze(
            r#"{"db": {"password": "hunter2", "secret_token": ""},
                "services": [{"CLIENT_SECRET": "abc"}], "api_key": "k"}"#,
        );
        assert_eq!(meta.sensitive_keys, vec!["db.password", "services[0].CLIENT_SECRET"]);
        assert!(meta.recommendations.iter().any(|r| r.contains("2 credential value(s)")));
    }

    #[test]
    fn test_sensitive_values_case_sensitive() {
        let tree: RawTree =
            serde_json::from_str(r#"{"DB_PASSWORD": "x", "db_password": "y"}"#).unwrap();
        let options = MetadataOptions {
            case_sensitive: true,
            ..Default::default()
        };
        let meta = analyze_metadata(&tree, &options);
        assert_eq!(meta.sensitive_keys, vec!["db_password"]);
    }

    #[test]
    fn test_depth_limit_truncates() {
        let tree: RawTree = serde_json::from_str(r#"{"a": {"b": {"c": {"d": 1}}}}"#).unwrap();
        let options = MetadataOptions {
            max_depth: 2,
            ..Default::default()
        };
        let meta = analyze_metadata(&tree, &options);
        assert!(meta.truncated);
        assert_eq!(meta.max_depth, 2);
        assert_eq!(meta.total_properties, 2);
        assert!(meta.recommendations.iter().any(|r| r.contains("exceeds 2 levels")));
    }
}
