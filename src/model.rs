// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Canonical infrastructure model
//!
//! The fixed `{services, databases, environment}` shape every input is
//! normalized into. A section is `None` when the source carried no signal
//! for it, and `Some(vec![])` when the signal was present but empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tree::{Mapping, RawTree};

/// Normalized infrastructure description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalInfra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<Database>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
}

impl CanonicalInfra {
    /// True when no section was recognized at all
    pub fn is_empty(&self) -> bool {
        self.services.is_none() && self.databases.is_none() && self.environment.is_none()
    }

    pub fn services(&self) -> &[Service] {
        self.services.as_deref().unwrap_or_default()
    }

    pub fn databases(&self) -> &[Database] {
        self.databases.as_deref().unwrap_or_default()
    }

    pub fn environment_len(&self) -> usize {
        self.environment.as_ref().map_or(0, BTreeMap::len)
    }

    /// Re-express the canonical shape as a document tree, so tree walkers
    /// can run over it the same way they run over decoded input.
    pub fn to_raw_tree(&self) -> RawTree {
        let mut root = Mapping::new();

        if let Some(services) = &self.services {
            let items = services.iter().map(Service::to_raw_tree).collect();
            root.insert("services".into(), RawTree::Sequence(items));
        }

        if let Some(databases) = &self.databases {
            let items = databases.iter().map(Database::to_raw_tree).collect();
            root.insert("databases".into(), RawTree::Sequence(items));
        }

        if let Some(environment) = &self.environment {
            let vars = environment
                .iter()
                .map(|(k, v)| (k.clone(), RawTree::from(v.as_str())))
                .collect();
            root.insert("environment".into(), RawTree::Mapping(vars));
        }

        RawTree::Mapping(root)
    }
}

/// A deployable unit: application, container, component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,

    #[serde(rename = "type")]
    pub service_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
}

impl Service {
    /// A service with only the mandatory fields set
    pub fn new(name: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service_type: service_type.into(),
            runtime: None,
            build_command: None,
            start_command: None,
            root_dir: None,
        }
    }

    fn to_raw_tree(&self) -> RawTree {
        let mut map = Mapping::new();
        map.insert("name".into(), RawTree::from(self.name.as_str()));
        map.insert("type".into(), RawTree::from(self.service_type.as_str()));
        let optional = [
            ("runtime", &self.runtime),
            ("buildCommand", &self.build_command),
            ("startCommand", &self.start_command),
            ("rootDir", &self.root_dir),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                map.insert(key.into(), RawTree::from(value.as_str()));
            }
        }
        RawTree::Mapping(map)
    }
}

/// A data store the services depend on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,

    #[serde(rename = "type")]
    pub db_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Database {
    pub fn new(name: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_type: db_type.into(),
            version: None,
            host: None,
            port: None,
        }
    }

    fn to_raw_tree(&self) -> RawTree {
        let mut map = Mapping::new();
        map.insert("name".into(), RawTree::from(self.name.as_str()));
        map.insert("type".into(), RawTree::from(self.db_type.as_str()));
        if let Some(version) = &self.version {
            map.insert("version".into(), RawTree::from(version.as_str()));
        }
        if let Some(host) = &self.host {
            map.insert("host".into(), RawTree::from(host.as_str()));
        }
        if let Some(port) = self.port {
            map.insert("port".into(), RawTree::Number(port.into()));
        }
        RawTree::Mapping(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_sections_are_not_serialized() {
        let infra = CanonicalInfra::default();
        assert_eq!(serde_json::to_string(&infra).unwrap(), "{}");
    }

    #[test]
    fn test_empty_services_section_is_serialized() {
        let infra = CanonicalInfra {
            services: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&infra).unwrap(), r#"{"services":[]}"#);
    }

    #[test]
    fn test_service_wire_names() {
        let mut service = Service::new("api", "unknown");
        service.build_command = Some("npm run build".into());
        let json = serde_json::to_value(&service).unwrap();

        assert_eq!(json["type"], "unknown");
        assert_eq!(json["buildCommand"], "npm run build");
        assert!(json.get("runtime").is_none());
    }

    #[test]
    fn test_to_raw_tree_matches_serialized_shape() {
        let mut db = Database::new("main", "postgres");
        db.port = Some(5432);
        let infra = CanonicalInfra {
            services: Some(vec![Service::new("api", "service")]),
            databases: Some(vec![db]),
            environment: Some(BTreeMap::from([("PORT".to_string(), "8080".to_string())])),
        };

        let via_tree = serde_json::to_value(infra.to_raw_tree()).unwrap();
        let direct = serde_json::to_value(&infra).unwrap();
        assert_eq!(via_tree, direct);
    }
}
