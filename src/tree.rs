// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Schema-free document tree
//!
//! Every decoded JSON or YAML document becomes a [`RawTree`]. Both parsers
//! deserialize straight into it, so mapping keys keep their source order and
//! non-string YAML keys are stringified on the way in.

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Number;
use std::fmt;

/// A decoded JSON/YAML value with no fixed schema
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawTree {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<RawTree>),
    Mapping(Mapping),
}

impl RawTree {
    /// Borrow as a mapping, if this node is one
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            RawTree::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as a sequence, if this node is one
    pub fn as_sequence(&self) -> Option<&[RawTree]> {
        match self {
            RawTree::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawTree::String(s) => Some(s),
            _ => None,
        }
    }

    /// True for sequences and mappings
    pub fn is_container(&self) -> bool {
        matches!(self, RawTree::Sequence(_) | RawTree::Mapping(_))
    }

    /// Look up a key when this node is a mapping
    pub fn get(&self, key: &str) -> Option<&RawTree> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Runtime type name of the node
    pub fn type_name(&self) -> &'static str {
        match self {
            RawTree::Null => "null",
            RawTree::Bool(_) => "boolean",
            RawTree::Number(_) => "number",
            RawTree::String(_) => "string",
            RawTree::Sequence(_) => "array",
            RawTree::Mapping(_) => "object",
        }
    }

    /// Type name with the element count for sequences, e.g. `array[3]`
    pub fn shape_label(&self) -> String {
        match self {
            RawTree::Sequence(items) => format!("array[{}]", items.len()),
            other => other.type_name().to_string(),
        }
    }

    /// Scalar coercion: strings, numbers and booleans become text, anything
    /// else becomes the empty string.
    pub fn coerce_string(&self) -> String {
        match self {
            RawTree::String(s) => s.clone(),
            RawTree::Number(n) => n.to_string(),
            RawTree::Bool(b) => b.to_string(),
            RawTree::Null | RawTree::Sequence(_) | RawTree::Mapping(_) => String::new(),
        }
    }
}

impl From<&str> for RawTree {
    fn from(s: &str) -> Self {
        RawTree::String(s.to_string())
    }
}

impl From<String> for RawTree {
    fn from(s: String) -> Self {
        RawTree::String(s)
    }
}

/// Insertion-ordered string-keyed mapping
///
/// Re-inserting an existing key replaces its value in place. Equality is
/// order-sensitive.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct Mapping(IndexMap<String, RawTree>);

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: RawTree) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&RawTree> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawTree)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &RawTree> {
        self.0.values()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl FromIterator<(String, RawTree)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, RawTree)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Deserialization
// ─────────────────────────────────────────────────────────────────────────────

struct RawTreeVisitor;

impl<'de> Visitor<'de> for RawTreeVisitor {
    type Value = RawTree;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON or YAML value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<RawTree, E> {
        Ok(RawTree::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<RawTree, E> {
        Ok(RawTree::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<RawTree, E> {
        Ok(RawTree::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<RawTree, E> {
        // NaN and infinities have no JSON number form
        Ok(Number::from_f64(v).map_or(RawTree::Null, RawTree::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<RawTree, E> {
        Ok(RawTree::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<RawTree, E> {
        Ok(RawTree::String(v))
    }

    fn visit_unit<E>(self) -> Result<RawTree, E> {
        Ok(RawTree::Null)
    }

    fn visit_none<E>(self) -> Result<RawTree, E> {
        Ok(RawTree::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawTree, D::Error> {
        RawTree::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawTree, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<RawTree>()? {
            items.push(item);
        }
        Ok(RawTree::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawTree, A::Error> {
        let mut map = Mapping::new();
        while let Some((MapKey(key), value)) = access.next_entry::<MapKey, RawTree>()? {
            map.insert(key, value);
        }
        Ok(RawTree::Mapping(map))
    }

    // YAML tags such as `!Ref name` arrive as enums; keep the tagged value
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<RawTree, A::Error> {
        let (_tag, variant) = data.variant::<String>()?;
        variant.newtype_variant::<RawTree>()
    }
}

impl<'de> Deserialize<'de> for RawTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawTreeVisitor)
    }
}

/// Mapping key, stringified from any YAML scalar
struct MapKey(String);

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_bool<E>(self, v: bool) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_i64<E>(self, v: i64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<MapKey, E> {
        Ok(MapKey(v))
    }

    fn visit_unit<E>(self) -> Result<MapKey, E> {
        Ok(MapKey("null".to_string()))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<MapKey, A::Error> {
        let (_tag, variant) = data.variant::<String>()?;
        variant.newtype_variant::<MapKey>()
    }

    fn visit_map<A: MapAccess<'de>>(self, _map: A) -> Result<MapKey, A::Error> {
        Err(de::Error::custom("complex mapping keys are not supported"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<MapKey, A::Error> {
        Err(de::Error::custom("complex mapping keys are not supported"))
    }
}

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

impl Serialize for RawTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawTree::Null => serializer.serialize_unit(),
            RawTree::Bool(b) => serializer.serialize_bool(*b),
            RawTree::Number(n) => n.serialize(serializer),
            RawTree::String(s) => serializer.serialize_str(s),
            RawTree::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            RawTree::Mapping(map) => map.serialize(serializer),
        }
    }
}
