// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Sensitive key name matching

/// Substrings that mark a key as holding credentials in structure checks
pub const STRUCTURE_NEEDLES: &[&str] = &["password", "secret", "key"];

/// Substrings that mark a key as holding credentials in metadata walks
pub const VALUE_NEEDLES: &[&str] = &["password", "secret"];

/// Substring matcher over key names
#[derive(Debug, Clone, Copy)]
pub struct SensitiveKeyMatcher {
    needles: &'static [&'static str],
    case_sensitive: bool,
}

impl SensitiveKeyMatcher {
    pub fn new(needles: &'static [&'static str], case_sensitive: bool) -> Self {
        Self {
            needles,
            case_sensitive,
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        if self.case_sensitive {
            self.needles.iter().any(|needle| key.contains(needle))
        } else {
            let lower = key.to_lowercase();
            self.needles.iter().any(|needle| lower.contains(needle))
        }
    }
}
