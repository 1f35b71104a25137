// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Normalization engine
//!
//! Maps an arbitrary decoded tree onto the canonical
//! `{services, databases, environment}` shape. Every lookup goes through an
//! ordered table and stops at the first match, so priorities can be read
//! straight off the constants below.
//!
//! Only the first two levels of the input are ever inspected; deeper
//! content is carried through untouched in the raw tree.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{CanonicalInfra, Database, Service};
use crate::tree::{Mapping, RawTree};

/// Top-level keys holding services, highest priority first
pub const SERVICE_SECTION_KEYS: &[&str] = &["services", "applications", "apps"];

/// Top-level keys holding databases, highest priority first
pub const DATABASE_SECTION_KEYS: &[&str] = &["databases", "db", "data"];

/// Top-level keys holding environment variables, highest priority first
pub const ENVIRONMENT_SECTION_KEYS: &[&str] = &["environment", "env", "envVars", "variables"];

const NAME_ALIASES: &[&str] = &["name", "id"];
const SERVICE_TYPE_ALIASES: &[&str] = &["type", "kind"];
const RUNTIME_ALIASES: &[&str] = &["runtime", "image", "version"];
const BUILD_ALIASES: &[&str] = &["buildCommand", "build"];
const START_ALIASES: &[&str] = &["startCommand", "command", "cmd"];
const ROOT_DIR_ALIASES: &[&str] = &["rootDir", "workingDir", "path"];

const DATABASE_TYPE_ALIASES: &[&str] = &["type", "engine"];
const VERSION_ALIASES: &[&str] = &["version"];
const HOST_ALIASES: &[&str] = &["host", "hostname"];
const PORT_ALIASES: &[&str] = &["port"];

/// Name given to list-form databases that carry no name of their own
pub const UNNAMED_DATABASE: &str = "Unknown Database";

/// Where a service record was extracted from; decides its default type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOrigin {
    /// An element of a root-level array
    RootArray,
    /// An element of a services list
    SectionList,
    /// An entry of a services object, keyed by name
    SectionKeyed,
    /// A nested top-level object picked up by fallback extraction
    Fallback,
}

impl ServiceOrigin {
    pub fn default_type(self) -> &'static str {
        match self {
            ServiceOrigin::SectionList => "unknown",
            ServiceOrigin::RootArray | ServiceOrigin::SectionKeyed => "service",
            ServiceOrigin::Fallback => "component",
        }
    }
}

/// Normalize a decoded tree. Never fails; unrecognized input yields an
/// empty or partial result.
pub fn normalize(tree: Option<&RawTree>) -> CanonicalInfra {
    match tree {
        Some(RawTree::Sequence(items)) => CanonicalInfra {
            services: Some(services_from_list(items, ServiceOrigin::RootArray)),
            ..Default::default()
        },
        Some(RawTree::Mapping(root)) => normalize_mapping(root),
        _ => CanonicalInfra::default(),
    }
}

fn normalize_mapping(root: &Mapping) -> CanonicalInfra {
    let mut infra = CanonicalInfra {
        services: extract_services(root),
        databases: extract_databases(root),
        environment: extract_environment(root),
    };

    if infra.is_empty() {
        let implicit = fallback_services(root);
        if !implicit.is_empty() {
            debug!(count = implicit.len(), "fallback extraction produced components");
            infra.services = Some(implicit);
        }
    }

    infra
}

/// First section key present with a non-null value. A scalar there still
/// claims the section, which then yields nothing.
fn find_section<'a>(root: &'a Mapping, keys: &[&'static str]) -> Option<(&'static str, &'a RawTree)> {
    keys.iter().find_map(|&key| {
        root.get(key)
            .filter(|v| !matches!(v, RawTree::Null))
            .map(|v| (key, v))
    })
}

fn extract_services(root: &Mapping) -> Option<Vec<Service>> {
    let (key, section) = find_section(root, SERVICE_SECTION_KEYS)?;
    debug!(key, "services section found");

    match section {
        RawTree::Sequence(items) => Some(services_from_list(items, ServiceOrigin::SectionList)),
        RawTree::Mapping(entries) => Some(
            entries
                .iter()
                .enumerate()
                .map(|(idx, (name, body))| {
                    service_from_entry(idx, name, body, ServiceOrigin::SectionKeyed)
                })
                .collect(),
        ),
        _ => {
            debug!(key, kind = section.type_name(), "services section is not a list or object");
            None
        }
    }
}

fn extract_databases(root: &Mapping) -> Option<Vec<Database>> {
    let (key, section) = find_section(root, DATABASE_SECTION_KEYS)?;
    debug!(key, "databases section found");

    match section {
        RawTree::Sequence(items) => Some(
            items
                .iter()
                .map(|item| database_from_body(item, UNNAMED_DATABASE, false))
                .collect(),
        ),
        RawTree::Mapping(entries) => Some(
            entries
                .iter()
                .map(|(key, body)| match non_blank(key) {
                    Some(name) => database_from_body(body, name, true),
                    None => database_from_body(body, UNNAMED_DATABASE, false),
                })
                .collect(),
        ),
        _ => {
            debug!(key, kind = section.type_name(), "databases section is not a list or object");
            None
        }
    }
}

fn extract_environment(root: &Mapping) -> Option<BTreeMap<String, String>> {
    let (key, section) = find_section(root, ENVIRONMENT_SECTION_KEYS)?;
    let Some(vars) = section.as_mapping() else {
        debug!(key, kind = section.type_name(), "environment section is not an object");
        return None;
    };
    debug!(key, "environment section found");

    Some(
        vars.iter()
            .map(|(name, value)| (name.to_string(), value.coerce_string()))
            .collect(),
    )
}

/// Every non-array object at the top level becomes a component named after
/// its key.
fn fallback_services(root: &Mapping) -> Vec<Service> {
    root.iter()
        .filter(|(_, value)| value.as_mapping().is_some())
        .enumerate()
        .map(|(idx, (key, body))| service_from_entry(idx, key, body, ServiceOrigin::Fallback))
        .collect()
}

fn services_from_list(items: &[RawTree], origin: ServiceOrigin) -> Vec<Service> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let default_name = format!("Service {}", idx + 1);
            match item {
                RawTree::Mapping(body) => service_from_body(body, &default_name, origin),
                // A bare string in a list names the service
                RawTree::String(name) if !name.trim().is_empty() => {
                    Service::new(name.clone(), origin.default_type())
                }
                _ => Service::new(default_name, origin.default_type()),
            }
        })
        .collect()
}

/// A keyed entry is named by its key. A blank key falls back to the body's
/// own name, then to its position.
fn service_from_entry(idx: usize, key: &str, body: &RawTree, origin: ServiceOrigin) -> Service {
    let positional = format!("Service {}", idx + 1);
    match (body, non_blank(key)) {
        (RawTree::Mapping(fields), Some(name)) => {
            let mut service = service_from_body(fields, name, origin);
            service.name = name.to_string();
            service
        }
        (RawTree::Mapping(fields), None) => service_from_body(fields, &positional, origin),
        (_, Some(name)) => Service::new(name, origin.default_type()),
        (_, None) => Service::new(positional, origin.default_type()),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

fn service_from_body(body: &Mapping, default_name: &str, origin: ServiceOrigin) -> Service {
    Service {
        name: resolve(body, NAME_ALIASES).unwrap_or_else(|| default_name.to_string()),
        service_type: resolve(body, SERVICE_TYPE_ALIASES)
            .unwrap_or_else(|| origin.default_type().to_string()),
        runtime: resolve(body, RUNTIME_ALIASES),
        build_command: resolve(body, BUILD_ALIASES),
        start_command: resolve(body, START_ALIASES),
        root_dir: resolve(body, ROOT_DIR_ALIASES),
    }
}

/// `keyed_name` marks `default_name` as the entry's key, which wins over
/// any name inside the body
fn database_from_body(body: &RawTree, default_name: &str, keyed_name: bool) -> Database {
    let Some(fields) = body.as_mapping() else {
        return Database::new(default_name, "database");
    };

    let name = if keyed_name {
        default_name.to_string()
    } else {
        resolve(fields, NAME_ALIASES).unwrap_or_else(|| default_name.to_string())
    };

    Database {
        name,
        db_type: resolve(fields, DATABASE_TYPE_ALIASES).unwrap_or_else(|| "database".to_string()),
        version: resolve(fields, VERSION_ALIASES),
        host: resolve(fields, HOST_ALIASES),
        port: PORT_ALIASES
            .iter()
            .find_map(|alias| fields.get(alias))
            .and_then(coerce_port),
    }
}

/// First alias whose value coerces to a string that is not blank
pub fn resolve(body: &Mapping, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| body.get(alias))
        .map(RawTree::coerce_string)
        .find(|value| !value.trim().is_empty())
}

/// Numbers and numeric strings become a port; anything else is dropped
pub fn coerce_port(value: &RawTree) -> Option<u16> {
    match value {
        RawTree::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|port| u16::try_from(port).ok()),
        RawTree::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize_json(json: &str) -> CanonicalInfra {
        let tree: RawTree = serde_json::from_str(json).unwrap();
        normalize(Some(&tree))
    }

    fn normalize_yaml(yaml: &str) -> CanonicalInfra {
        let tree: RawTree = serde_yaml::from_str(yaml).unwrap();
        normalize(Some(&tree))
    }

    #[test]
    fn test_missing_input_is_empty() {
        assert_eq!(normalize(None), CanonicalInfra::default());
        assert_eq!(normalize(Some(&RawTree::from("text"))), CanonicalInfra::default());
    }

    #[test]
    fn test_services_and_databases_scenario() {
        let infra = normalize_json(
            r#"{"services":[{"name":"api","runtime":"node:18"}],"databases":[{"type":"postgres","port":"5432"}]}"#,
        );

        let services = infra.services.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "api");
        assert_eq!(services[0].runtime.as_deref(), Some("node:18"));
        assert_eq!(services[0].service_type, "unknown");

        let databases = infra.databases.unwrap();
        assert_eq!(databases[0].name, "Unknown Database");
        assert_eq!(databases[0].db_type, "postgres");
        assert_eq!(databases[0].port, Some(5432));
        assert!(infra.environment.is_none());
    }

    #[test]
    fn test_empty_root_array() {
        let infra = normalize_json("[]");
        assert_eq!(infra.services, Some(vec![]));
        assert!(infra.databases.is_none());
    }

    #[test]
    fn test_root_array_keeps_count_and_order() {
        let infra = normalize_json(r#"[{"id": "gateway"}, {"image": "redis:7"}, "worker", 5]"#);
        let names: Vec<&str> = infra.services().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["gateway", "Service 2", "worker", "Service 4"]);
        assert!(infra.services().iter().all(|s| s.service_type == "service"));
        assert_eq!(infra.services()[1].runtime.as_deref(), Some("redis:7"));
    }

    #[test]
    fn test_unrecognized_scalars_yield_nothing() {
        let infra = normalize_json(r#"{"foo": "bar"}"#);
        assert!(infra.is_empty());
        assert_eq!(serde_json::to_string(&infra).unwrap(), "{}");
    }

    #[test]
    fn test_docker_compose_keyed_services() {
        let infra = normalize_yaml(
            r#"
version: "3.8"
services:
  web:
    image: nginx:1.25
    command: nginx -g 'daemon off;'
    workingDir: /srv
  db:
    image: postgres:16
    build:
      context: ./db
"#,
        );

        let services = infra.services.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "web");
        assert_eq!(services[0].service_type, "service");
        assert_eq!(services[0].runtime.as_deref(), Some("nginx:1.25"));
        assert_eq!(services[0].start_command.as_deref(), Some("nginx -g 'daemon off;'"));
        assert_eq!(services[0].root_dir.as_deref(), Some("/srv"));
        assert_eq!(services[1].name, "db");
        assert_eq!(services[1].build_command, None);
        assert!(infra.databases.is_none());
    }

    #[test]
    fn test_keyed_name_wins_over_body_name() {
        let infra = normalize_json(r#"{"services": {"api": {"name": "other", "kind": "lambda"}}}"#);
        let services = infra.services.unwrap();
        assert_eq!(services[0].name, "api");
        assert_eq!(services[0].service_type, "lambda");
    }

    #[test]
    fn test_section_key_priority() {
        let infra = normalize_json(
            r#"{"apps": [{"name": "from-apps"}], "applications": [{"name": "from-applications"}]}"#,
        );
        assert_eq!(infra.services()[0].name, "from-applications");
    }

    #[test]
    fn test_first_present_section_key_wins_even_when_scalar() {
        let infra = normalize_json(r#"{"services": "none", "apps": [{"name": "x"}]}"#);
        assert!(infra.services.is_none());

        let infra = normalize_json(r#"{"services": null, "apps": [{"name": "x"}]}"#);
        assert_eq!(infra.services()[0].name, "x");

        let infra = normalize_json(r#"{"databases": 3, "db": [{"name": "main"}], "env": {"A": "1"}}"#);
        assert!(infra.databases.is_none());
        assert!(infra.services.is_none());
    }

    #[test]
    fn test_alias_priority() {
        let infra = normalize_json(
            r#"{"services": [{"id": "svc", "kind": "worker", "image": "img", "version": "1.0",
                "build": "make", "cmd": "run", "command": "serve", "path": "./app"}]}"#,
        );
        let service = &infra.services()[0];
        assert_eq!(service.name, "svc");
        assert_eq!(service.service_type, "worker");
        assert_eq!(service.runtime.as_deref(), Some("img"));
        assert_eq!(service.build_command.as_deref(), Some("make"));
        assert_eq!(service.start_command.as_deref(), Some("serve"));
        assert_eq!(service.root_dir.as_deref(), Some("./app"));
    }

    #[test]
    fn test_composite_alias_values_fall_through() {
        let infra = normalize_json(r#"{"services": [{"name": {"first": "x"}, "runtime": ["a"], "image": 18}]}"#);
        let service = &infra.services()[0];
        assert_eq!(service.name, "Service 1");
        assert_eq!(service.runtime.as_deref(), Some("18"));
    }

    #[test]
    fn test_keyed_databases() {
        let infra = normalize_yaml(
            r#"
db:
  primary:
    engine: postgres
    version: 16
    hostname: db.internal
    port: 5432
  cache:
    type: redis
    port: "not-a-port"
"#,
        );
        let databases = infra.databases.unwrap();
        assert_eq!(databases[0].name, "primary");
        assert_eq!(databases[0].db_type, "postgres");
        assert_eq!(databases[0].version.as_deref(), Some("16"));
        assert_eq!(databases[0].host.as_deref(), Some("db.internal"));
        assert_eq!(databases[0].port, Some(5432));
        assert_eq!(databases[1].name, "cache");
        assert_eq!(databases[1].port, None);
    }

    #[test]
    fn test_database_defaults() {
        let infra = normalize_json(r#"{"databases": [{}]}"#);
        let db = &infra.databases()[0];
        assert_eq!(db.name, UNNAMED_DATABASE);
        assert_eq!(db.db_type, "database");
    }

    #[test]
    fn test_environment_values_stringified() {
        let infra = normalize_json(
            r#"{"env": {"PORT": 8080, "DEBUG": false, "NAME": "api", "LIST": [1], "NOTHING": null}}"#,
        );
        let env = infra.environment.unwrap();
        assert_eq!(env["PORT"], "8080");
        assert_eq!(env["DEBUG"], "false");
        assert_eq!(env["NAME"], "api");
        assert_eq!(env["LIST"], "");
        assert_eq!(env["NOTHING"], "");
    }

    #[test]
    fn test_environment_sequence_is_not_accepted() {
        let infra = normalize_json(r#"{"environment": ["A=1"], "variables": {"B": "2"}}"#);
        assert!(infra.environment.is_none());

        let infra = normalize_json(r#"{"env": null, "variables": {"B": "2"}}"#);
        assert_eq!(infra.environment.unwrap()["B"], "2");
    }

    #[test]
    fn test_fallback_extraction() {
        let infra = normalize_json(
            r#"{"frontend": {"runtime": "node"}, "backend": {"kind": "api"}, "list": [{}], "flag": true}"#,
        );
        let services = infra.services.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "frontend");
        assert_eq!(services[0].service_type, "component");
        assert_eq!(services[0].runtime.as_deref(), Some("node"));
        assert_eq!(services[1].service_type, "api");
    }

    #[test]
    fn test_fallback_not_used_when_a_section_matched() {
        let infra = normalize_json(r#"{"env": {"A": "1"}, "frontend": {"runtime": "node"}}"#);
        assert!(infra.services.is_none());
    }

    #[test]
    fn test_canonical_input_is_idempotent() {
        let source = r#"{
            "services": [{"name": "api", "type": "web", "runtime": "node:18",
                          "buildCommand": "npm ci", "startCommand": "npm start", "rootDir": "api"}],
            "databases": [{"name": "main", "type": "postgres", "version": "16", "host": "db", "port": 5432}],
            "environment": {"NODE_ENV": "production"}
        }"#;
        let infra = normalize_json(source);

        let again: RawTree = serde_json::from_str(&serde_json::to_string(&infra).unwrap()).unwrap();
        assert_eq!(normalize(Some(&again)), infra);

        let expected: serde_json::Value = serde_json::from_str(source).unwrap();
        assert_eq!(serde_json::to_value(&infra).unwrap(), expected);
    }

    #[test]
    fn test_blank_keys_never_produce_blank_names() {
        let infra = normalize_yaml(
            r#"
services:
  "": {image: nginx}
  "  ": {name: named-in-body}
databases:
  "": {engine: pg}
  " ": {name: reports}
"#,
        );
        let services: Vec<&str> = infra.services().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(services, vec!["Service 1", "named-in-body"]);
        let databases: Vec<&str> = infra.databases().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(databases, vec![UNNAMED_DATABASE, "reports"]);

        let infra = normalize_json(r#"{"": {"runtime": "node"}, "worker": {"kind": "job"}}"#);
        let names: Vec<&str> = infra.services().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Service 1", "worker"]);
        assert_eq!(infra.services()[0].service_type, "component");
    }

    #[test]
    fn test_whitespace_alias_values_fall_through() {
        let infra = normalize_json(r#"{"services": [{"name": "   ", "id": "svc"}, {"name": "\t"}]}"#);
        assert_eq!(infra.services()[0].name, "svc");
        assert_eq!(infra.services()[1].name, "Service 2");
        assert!(infra.services().iter().all(|s| !s.name.trim().is_empty()));
    }

    #[test]
    fn test_keyed_database_name_wins_over_body_name() {
        let infra = normalize_json(r#"{"databases": {"primary": {"name": "other", "type": "mysql"}}}"#);
        assert_eq!(infra.databases()[0].name, "primary");
        assert_eq!(infra.databases()[0].db_type, "mysql");
    }

    #[test]
    fn test_coerce_port() {
        assert_eq!(coerce_port(&RawTree::Number(3306.into())), Some(3306));
        assert_eq!(coerce_port(&RawTree::from(" 6379 ")), Some(6379));
        assert_eq!(coerce_port(&RawTree::from("8080:80")), None);
        assert_eq!(coerce_port(&RawTree::Number(70000.into())), None);
        assert_eq!(coerce_port(&RawTree::Bool(true)), None);
    }
}
