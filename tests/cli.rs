//! End-to-end tests for the `srstats` binary.
//!
//! Every invocation runs with an isolated home directory and no registry
//! environment, so only the flags and config file given by a test apply.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A `srstats` command isolated from the caller's environment.
fn srstats(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("srstats").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("xdg"))
        .env_remove("SRSTATS_CONFIG")
        .env_remove("SCHEMA_REGISTRY_URL")
        .env_remove("SCHEMA_REGISTRY_BASIC_AUTH_USER_INFO")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a config file and return its path.
fn write_config(home: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = home.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// A registry with one active AVRO subject, one soft-deleted JSON subject
/// and one internal subject.
async fn registry_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(query_param("deleted", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "orders-value",
            "legacy-value",
            "_confluent-ksql-default_query_1"
        ])))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "orders-value",
            "_confluent-ksql-default_query_1"
        ])))
        .mount(&server)
        .await;

    for (subject, id, schema_type, schema) in [
        ("orders-value", 1, "AVRO", "\"string\""),
        ("legacy-value", 2, "JSON", "{\"type\":\"object\"}"),
        ("_confluent-ksql-default_query_1", 3, "AVRO", "\"long\""),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/subjects/{}/versions", subject)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/subjects/{}/versions/1", subject)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "subject": subject,
                "version": 1,
                "id": id,
                "schemaType": schema_type,
                "schema": schema,
            })))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mode": "READWRITE"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"compatibilityLevel": "BACKWARD"})),
        )
        .mount(&server)
        .await;

    server
}

/// Run a command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

// =============================================================================
// Basics
// =============================================================================

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    srstats(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("srstats"));
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    srstats(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn completion_script_names_binary() {
    let home = TempDir::new().unwrap();
    srstats(home.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("srstats"));
}

// =============================================================================
// Connection resolution
// =============================================================================

#[test]
fn missing_url_is_reported() {
    let home = TempDir::new().unwrap();
    srstats(home.path())
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no schema registry URL configured"));
}

#[test]
fn unknown_registry_is_reported() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        r#"
[[registries]]
name = "dev"
url = "http://localhost:8081"
"#,
    );

    srstats(home.path())
        .env("SRSTATS_CONFIG", &config)
        .args(["stats", "--registry", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("registry 'prod' not found in config"));
}

#[test]
fn invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, "registries = \"not a list\"\n");

    srstats(home.path())
        .env("SRSTATS_CONFIG", &config)
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn unreachable_registry_fails_enumeration() {
    let home = TempDir::new().unwrap();
    srstats(home.path())
        .args(["stats", "--url", "http://127.0.0.1:1", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to list active subjects"));
}

// =============================================================================
// Against a registry
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn stats_json_output() {
    let server = registry_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = srstats(home.path());
    cmd.args(["stats", "--url", &server.uri(), "-o", "json", "--detailed"]);

    let assert = run(cmd).await.success();
    let stats: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(stats["totalSubjects"], 2);
    assert_eq!(stats["activeSubjects"], 1);
    assert_eq!(stats["deletedSubjects"], 1);
    assert_eq!(stats["internalSubjects"], 1);
    assert_eq!(stats["internalVersions"], 1);
    assert_eq!(stats["avroSchemas"], 1);
    assert_eq!(stats["jsonSchemas"], 1);
    assert_eq!(stats["uniqueSchemaIds"], 2);
    assert_eq!(stats["topByVersions"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_table_output() {
    let server = registry_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = srstats(home.path());
    cmd.args(["stats", "--url", &server.uri(), "--workers", "2"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Schema Registry Statistics"))
        .stdout(predicate::str::contains(
            "Found 2 subjects (1 active, 1 deleted), excluding 1 internal subjects",
        ))
        .stdout(predicate::str::contains("Schema Type Distribution"))
        .stdout(predicate::str::contains("Top 10").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_uses_config_default_registry() {
    let server = registry_server().await;
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        &format!(
            r#"
default_output = "json"

[[registries]]
name = "local"
url = "{}"
default = true
"#,
            server.uri()
        ),
    );
    let mut cmd = srstats(home.path());
    cmd.env("SRSTATS_CONFIG", &config).arg("stats");

    let assert = run(cmd).await.success();
    let stats: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(stats["totalVersions"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_settings() {
    let server = registry_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = srstats(home.path());
    cmd.env("SCHEMA_REGISTRY_URL", server.uri()).arg("health");

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Connection successful"))
        .stdout(predicate::str::contains("Subjects found: 2"))
        .stdout(predicate::str::contains("Mode: READWRITE"))
        .stdout(predicate::str::contains("Compatibility: BACKWARD"))
        .stdout(predicate::str::contains("Contexts").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn health_json_output() {
    let server = registry_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = srstats(home.path());
    cmd.args(["health", "--url", &server.uri(), "-o", "json"]);

    let assert = run(cmd).await.success();
    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["subjects"], 2);
    assert_eq!(report["mode"], "READWRITE");
    assert_eq!(report["contexts"], Value::Null);
}
