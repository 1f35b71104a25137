// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! End-to-end tests for the infrascope binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn infrascope(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("infrascope").unwrap();
    cmd.current_dir(dir)
        .env_remove("INFRASCOPE_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) {
    std::fs::write(dir.path().join(name), content).unwrap();
}

#[test]
fn analyze_json_report() {
    let temp = TempDir::new().unwrap();
    write(
        &temp,
        "infra.json",
        r#"{"services":[{"name":"api","runtime":"node:18"}],"databases":[{"type":"postgres","port":"5432"}]}"#,
    );

    let output = infrascope(temp.path())
        .args(["analyze", "infra.json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["filename"], "infra.json");
    assert_eq!(report["type"], "json");
    assert_eq!(report["parsed"]["services"][0]["name"], "api");
    assert_eq!(report["parsed"]["services"][0]["type"], "unknown");
    assert_eq!(report["parsed"]["databases"][0]["name"], "Unknown Database");
    assert_eq!(report["parsed"]["databases"][0]["port"], 5432);
    assert_eq!(report["validation"]["confidence"], "high");
}

#[test]
fn analyze_yaml_content_in_json_file() {
    let temp = TempDir::new().unwrap();
    write(&temp, "config.json", "services:\n  - name: api\n");

    let output = infrascope(temp.path())
        .args(["analyze", "config.json", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["type"], "yaml");
    assert_eq!(report["parsed"]["services"][0]["name"], "api");
    assert!(report["suggestions"][0]
        .as_str()
        .unwrap()
        .starts_with("File extension suggests JSON"));
}

#[test]
fn analyze_reports_decode_failure() {
    let temp = TempDir::new().unwrap();
    write(&temp, "broken.json", r#"{"a": }"#);

    let output = infrascope(temp.path())
        .args(["analyze", "broken.json", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["preview"], r#"{"a": }"#);
    assert!(report.get("parsed").is_none());
    let error = report["parseError"].as_str().unwrap();
    assert!(error.contains("JSON error"));
    assert!(error.contains("YAML error"));
}

#[test]
fn analyze_text_output() {
    let temp = TempDir::new().unwrap();
    write(
        &temp,
        "docker-compose.yml",
        "services:\n  web:\n    image: nginx\n  db:\n    image: postgres\n",
    );

    infrascope(temp.path())
        .args(["analyze", "docker-compose.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Docker Compose"))
        .stdout(predicate::str::contains("web (service)"));
}

#[test]
fn analyze_rejects_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    write(&temp, "logo.png", "binary");

    infrascope(temp.path())
        .args(["analyze", "logo.png"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unsupported file type 'png'"));
}

#[test]
fn analyze_respects_settings_file() {
    let temp = TempDir::new().unwrap();
    write(&temp, ".infrascope.yaml", "max_file_size: 8\n");
    write(&temp, "infra.json", r#"{"services": []}"#);

    infrascope(temp.path())
        .args(["analyze", "infra.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("above the 8 byte limit"));
}

#[test]
fn analyze_requires_files() {
    let temp = TempDir::new().unwrap();
    infrascope(temp.path())
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files specified"));
}

#[test]
fn graph_mermaid() {
    let temp = TempDir::new().unwrap();
    write(
        &temp,
        "infra.yaml",
        "services:\n  - name: api\ndatabases:\n  - name: main\n    type: postgres\n",
    );

    infrascope(temp.path())
        .args(["graph", "infra.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph TD"))
        .stdout(predicate::str::contains(r#"D0[("postgres: main")]"#))
        .stdout(predicate::str::contains("S0 --> D0"));
}

#[test]
fn graph_dot() {
    let temp = TempDir::new().unwrap();
    write(&temp, "infra.yaml", "region: eu\n");

    infrascope(temp.path())
        .args(["graph", "infra.yaml", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph infrastructure"))
        .stdout(predicate::str::contains("region: string"));
}

#[test]
fn export_summary_to_file() {
    let temp = TempDir::new().unwrap();
    write(&temp, "list.json", r#"[{"name": "a"}, {"name": "b"}]"#);

    infrascope(temp.path())
        .args(["export", "list.json", "--kind", "summary", "-o", "summary.json"])
        .assert()
        .success();

    let written = std::fs::read_to_string(temp.path().join("summary.json")).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(summary["services"], 2);
    assert_eq!(summary["serviceTypes"]["service"], 2);
}

#[test]
fn export_raw_to_stdout() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.yaml", "zeta: 1\nalpha: 2\n");

    let output = infrascope(temp.path())
        .args(["export", "a.yaml", "--kind", "raw"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
}

#[test]
fn validate_fails_for_scalar_content() {
    let temp = TempDir::new().unwrap();
    write(&temp, "notes.yaml", "just a sentence\n");

    infrascope(temp.path())
        .args(["validate", "notes.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not recognized"));
}

#[test]
fn validate_accepts_unknown_object_with_low_confidence() {
    let temp = TempDir::new().unwrap();
    write(&temp, "data.json", r#"{"foo": "bar"}"#);

    infrascope(temp.path())
        .args(["validate", "data.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Format"))
        .stdout(predicate::str::contains("confidence: low"));
}

#[test]
fn validate_fails_for_undecodable_content() {
    let temp = TempDir::new().unwrap();
    write(&temp, "broken.json", r#"{"a": }"#);

    infrascope(temp.path())
        .args(["validate", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn validate_passes_for_kubernetes() {
    let temp = TempDir::new().unwrap();
    write(
        &temp,
        "deploy.yaml",
        "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n",
    );

    infrascope(temp.path())
        .args(["validate", "deploy.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kubernetes"));
}
