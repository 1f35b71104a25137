// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Dual-format decoding
//!
//! Each format is attempted in isolation. The classifier's verdict only
//! decides the order of attempts and which result is preferred.

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Unexpected, Visitor};
use std::fmt;
use tracing::debug;

use super::content_type::{looks_like_json, ContentType, Detection, DetectionSource};
use crate::errors::{InfraError, InfraResult};
use crate::tree::RawTree;

/// A successfully decoded document
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub tree: RawTree,
    /// The format that actually decoded, which may differ from the verdict
    pub effective_type: ContentType,
}

/// Decode `content` as JSON and/or YAML following the classifier verdict.
///
/// Fails only when both formats fail, carrying both parser messages.
pub fn decode(content: &str, detection: &Detection) -> InfraResult<Decoded> {
    let order: [ContentType; 2] = match detection.content_type {
        ContentType::Yaml => [ContentType::Yaml, ContentType::Json],
        ContentType::Json | ContentType::Unknown => [ContentType::Json, ContentType::Yaml],
    };

    // YAML reads broken JSON such as `{"a": }` as `{a: null}`. For JSON-dialect
    // text in a `.json` file the YAML reading must not contain empty values.
    let strict_json = detection.source == DetectionSource::Extension
        && detection.content_type == ContentType::Json
        && is_json_dialect(content);

    let mut json_error = String::new();
    let mut yaml_error = String::new();

    for format in order {
        let attempt = match format {
            ContentType::Json => parse_json(content),
            ContentType::Yaml if strict_json => parse_yaml_without_empty_values(content),
            ContentType::Yaml => parse_yaml(content),
            ContentType::Unknown => continue,
        };

        match attempt {
            Ok(tree) => {
                if format != detection.content_type {
                    debug!(
                        verdict = %detection.content_type,
                        effective = %format,
                        "decoded with fallback format"
                    );
                }
                return Ok(Decoded {
                    tree,
                    effective_type: format,
                });
            }
            Err(message) => {
                debug!(format = %format, error = %message, "decode attempt failed");
                match format {
                    ContentType::Json => json_error = message,
                    _ => yaml_error = message,
                }
            }
        }
    }

    Err(InfraError::decode(json_error, yaml_error))
}

/// Parse JSON into a tree
pub fn parse_json(content: &str) -> Result<RawTree, String> {
    serde_json::from_str::<RawTree>(content).map_err(|e| e.to_string())
}

/// Parse YAML into a tree. Multi-document streams become a sequence with
/// one element per document.
pub fn parse_yaml(content: &str) -> Result<RawTree, String> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        documents.push(RawTree::deserialize(document).map_err(|e| e.to_string())?);
    }

    Ok(match documents.len() {
        0 => RawTree::Null,
        1 => documents.remove(0),
        _ => RawTree::Sequence(documents),
    })
}

/// YAML reading that rejects empty and null values, reporting the parser
/// position of the first one
fn parse_yaml_without_empty_values(content: &str) -> Result<RawTree, String> {
    for document in serde_yaml::Deserializer::from_str(content) {
        NoEmptyValues::deserialize(document).map_err(|e| e.to_string())?;
    }
    parse_yaml(content)
}

/// Brace- or bracket-delimited text whose object keys are all double-quoted
pub fn is_json_dialect(content: &str) -> bool {
    if !looks_like_json(content) {
        return false;
    }

    let mut containers = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut expect_key = false;

    for c in content.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        if std::mem::take(&mut expect_key) && c != '"' && c != '}' {
            return false;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                containers.push('{');
                expect_key = true;
            }
            '[' => containers.push('['),
            '}' | ']' => {
                containers.pop();
            }
            ',' => expect_key = containers.last() == Some(&'{'),
            _ => {}
        }
    }

    true
}

/// Validates a document without keeping it; fails on the first empty value
struct NoEmptyValues;

impl<'de> Visitor<'de> for NoEmptyValues {
    type Value = NoEmptyValues;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, _: bool) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_i64<E>(self, _: i64) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_u64<E>(self, _: u64) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_f64<E>(self, _: f64) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_str<E>(self, _: &str) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self, E> {
        Err(E::invalid_type(Unexpected::Other("empty value"), &self))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self, E> {
        self.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self, D::Error> {
        NoEmptyValues::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self, A::Error> {
        while seq.next_element::<NoEmptyValues>()?.is_some() {}
        Ok(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self, A::Error> {
        while map.next_entry::<IgnoredAny, NoEmptyValues>()?.is_some() {}
        Ok(self)
    }
}

impl<'de> Deserialize<'de> for NoEmptyValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NoEmptyValues)
    }
}
