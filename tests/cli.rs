//! Binary-level tests for command validation, config persistence, and output
//!
//! These exercise the CLI end to end without touching the network: every
//! scenario here fails validation or completes against the local filesystem
//! before the first request would be issued.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with the `XRAY_*` environment stripped so tests are hermetic.
fn xrayctl() -> Command {
    let mut cmd = Command::cargo_bin("xrayctl").unwrap();
    for var in [
        "XRAY_URL",
        "XRAY_TOKEN",
        "XRAY_PROJECT",
        "XRAY_TIMEOUT",
        "XRAY_FORMAT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn config_arg(dir: &TempDir) -> String {
    dir.path().join("config.yaml").display().to_string()
}

#[test]
fn ping_without_url_fails_with_descriptive_error() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args(["--config", &config_arg(&dir), "ping"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"ok\": false"))
        .stdout(predicate::str::contains("missing required setting: url"));
}

#[test]
fn config_init_writes_default_file() {
    let dir = TempDir::new().unwrap();
    let config = config_arg(&dir);

    xrayctl()
        .args(["--config", &config, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"))
        .stdout(predicate::str::contains("config.yaml"));

    let contents = std::fs::read_to_string(&config).unwrap();
    assert!(contents.contains("timeout: 30"));
    assert!(contents.contains("format: json"));
}

#[test]
fn config_set_persists_value() {
    let dir = TempDir::new().unwrap();
    let config = config_arg(&dir);

    xrayctl()
        .args(["--config", &config, "config", "set", "timeout", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"timeout\": 45"));

    let contents = std::fs::read_to_string(&config).unwrap();
    assert!(contents.contains("timeout: 45"));
}

#[test]
fn config_set_rejects_non_numeric_timeout() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args(["--config", &config_arg(&dir), "config", "set", "timeout", "soon"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("timeout must be an integer"));
}

#[test]
fn config_set_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args(["--config", &config_arg(&dir), "config", "set", "format", "xml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unsupported output format"));
}

#[test]
fn config_save_redacts_token_but_persists_it() {
    let dir = TempDir::new().unwrap();
    let config = config_arg(&dir);

    xrayctl()
        .args([
            "--config",
            &config,
            "--token",
            "super-secret-token",
            "config",
            "save",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"token\": \"***\""))
        .stdout(predicate::str::contains("super-secret-token").not());

    let contents = std::fs::read_to_string(&config).unwrap();
    assert!(contents.contains("super-secret-token"));
}

#[test]
fn config_save_without_flags_fails() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args(["--config", &config_arg(&dir), "config", "save"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no flags provided to save"));
}

#[test]
fn config_save_merges_with_existing_file() {
    let dir = TempDir::new().unwrap();
    let config = config_arg(&dir);

    xrayctl()
        .args([
            "--config",
            &config,
            "--url",
            "https://xray.example.com",
            "config",
            "save",
        ])
        .assert()
        .success();

    xrayctl()
        .args(["--config", &config, "--timeout", "90", "config", "save"])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&config).unwrap();
    assert!(contents.contains("url: https://xray.example.com"));
    assert!(contents.contains("timeout: 90"));
}

#[test]
fn config_view_shows_merged_settings_with_redacted_token() {
    let dir = TempDir::new().unwrap();
    let config = config_arg(&dir);

    xrayctl()
        .args([
            "--config",
            &config,
            "--url",
            "https://xray.example.com",
            "--token",
            "tok-abc",
            "config",
            "save",
        ])
        .assert()
        .success();

    xrayctl()
        .args(["--config", &config, "config", "view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://xray.example.com"))
        .stdout(predicate::str::contains("\"token\": \"***\""))
        .stdout(predicate::str::contains("tok-abc").not());
}

#[test]
fn config_view_renders_yaml_when_requested() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args(["--config", &config_arg(&dir), "--format", "yaml", "config", "view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: true"))
        .stdout(predicate::str::contains("format: json"));
}

#[test]
fn ignore_rule_create_requires_a_filter() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "ignore-rules",
            "create",
            "--note",
            "accepted risk",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("at least one filter"));
}

#[test]
fn ignore_rule_create_dry_run_prints_request_only() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "ignore-rules",
            "create",
            "--note",
            "accepted risk",
            "--cve",
            "CVE-2024-1234",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CVE-2024-1234"))
        .stdout(predicate::str::contains("\"ok\": true"));
}

#[test]
fn ignore_rule_list_rejects_zero_rows() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "--url",
            "http://localhost:1",
            "--token",
            "t",
            "ignore-rules",
            "list",
            "--rows",
            "0",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--rows must be >= 1"));
}

#[test]
fn scan_wait_requires_repo_and_path() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "--url",
            "http://localhost:1",
            "--token",
            "t",
            "scan",
            "artifact",
            "--component-id",
            "gav://org:lib:1.0",
            "--wait",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--wait requires --repo and --path"));
}

#[test]
fn scan_rejects_non_positive_poll_interval() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "scan",
            "artifact",
            "--component-id",
            "gav://org:lib:1.0",
            "--poll-seconds",
            "0",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--poll-seconds must be >= 1"));
}

#[test]
fn artifact_inventory_rejects_non_csv_out() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("inventory.parquet").display().to_string();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "artifact",
            "inventory",
            "--out",
            &out,
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--out must end with .csv"));
}

#[test]
fn artifact_inventory_rejects_invalid_repo_regex() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("inventory.csv").display().to_string();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "artifact",
            "inventory",
            "--out",
            &out,
            "--repo-regex",
            "(",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--repo-regex is not a valid regex"));
}

#[test]
fn artifact_inventory_rejects_zero_repo_page_size() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("inventory.csv").display().to_string();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "artifact",
            "inventory",
            "--out",
            &out,
            "--repo-page-size",
            "0",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--repo-page-size must be >= 1"));
}

#[test]
fn repo_list_rejects_zero_page_size() {
    let dir = TempDir::new().unwrap();
    xrayctl()
        .args([
            "--config",
            &config_arg(&dir),
            "--url",
            "http://localhost:1",
            "--token",
            "t",
            "repo",
            "list",
            "--page-size",
            "0",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--page-size must be >= 1"));
}
