//! End-to-end tests of the chronicle binary

use super::common::fixtures::{abyss_item, uiaf_item, uigf_item, FixtureDir};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

/// A chronicle command rooted in `data_dir`
#[allow(deprecated)]
fn chronicle_cmd(data_dir: &FixtureDir) -> Command {
    let mut cmd = Command::cargo_bin("chronicle").unwrap();
    cmd.env("CHRONICLE_DATA_DIR", data_dir.file("data"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_status_on_fresh_data_dir() {
    let data = FixtureDir::new();

    chronicle_cmd(&data)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 tracked"))
        .stdout(predicate::str::contains("Gacha:          none"));

    assert!(data.file("data/chronicle.db").exists());
    assert!(data.file("data/config.toml").exists());
    assert!(data.file("data/logs/chronicle.log").exists());
}

#[test]
fn test_restore_then_backup() {
    let data = FixtureDir::new();
    let backup = FixtureDir::new();
    backup.write_uiaf("v1.1", json!([uiaf_item(80001, 3, 1, 1_690_000_000)]));
    backup.write_abyss(json!([abyss_item("100000001", 71, 36)]));

    chronicle_cmd(&data)
        .arg("restore")
        .arg(&backup.path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 restored, 2 not found, 0 failed"));

    let out = FixtureDir::new();
    chronicle_cmd(&data)
        .arg("backup")
        .arg(&out.path)
        .assert()
        .success()
        .stdout(predicate::str::contains("UIAF.json"));

    assert!(out.file("UIAF.json").exists());
    assert!(out.file("cookie.json").exists());
    assert!(out.file("abyss.json").exists());
}

#[test]
fn test_restore_with_failure_exits_nonzero() {
    let data = FixtureDir::new();
    let backup = FixtureDir::new();
    backup.write_uigf(
        "100000001",
        "v9.9",
        json!([uigf_item("1", "301", "2023-01-02 03:04:05")]),
    );

    chronicle_cmd(&data)
        .arg("restore")
        .arg(&backup.path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("1 failed categories"));
}

#[test]
fn test_restore_missing_directory_fails() {
    let data = FixtureDir::new();

    chronicle_cmd(&data)
        .arg("restore")
        .arg(data.file("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_import_and_status_json() {
    let data = FixtureDir::new();
    let files = FixtureDir::new();
    let uigf = files.write_uigf(
        "100000001",
        "v2.3",
        json!([
            uigf_item("1", "301", "2023-01-02 03:04:05"),
            uigf_item("2", "301", "2023-01-02 03:04:06")
        ]),
    );

    chronicle_cmd(&data)
        .args(["import", "gacha"])
        .arg(&uigf)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 inserted, 0 skipped"));

    let output = chronicle_cmd(&data)
        .args(["--json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let status: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["gacha"], json!([["100000001", 2]]));

    chronicle_cmd(&data)
        .args(["clear-gacha", "100000001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2"));
}

#[test]
fn test_export_unknown_uid_fails() {
    let data = FixtureDir::new();

    chronicle_cmd(&data)
        .args(["export", "gacha", "100000009"])
        .arg(data.file("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("100000009"));
}

#[test]
fn test_inspect_reports_version() {
    let data = FixtureDir::new();
    let files = FixtureDir::new();
    let uiaf = files.write_uiaf("v1.0", json!([{ "id": 1, "current": 1, "timestamp": 0 }]));

    chronicle_cmd(&data)
        .arg("inspect")
        .arg(&uiaf)
        .assert()
        .success()
        .stdout(predicate::str::contains("UIAF v1.0"))
        .stdout(predicate::str::contains("Records:  1"));
}

#[test]
fn test_invalid_config_is_reported() {
    let data = FixtureDir::new();
    std::fs::create_dir_all(data.file("data")).unwrap();
    std::fs::write(data.file("data/config.toml"), "not = [valid").unwrap();

    chronicle_cmd(&data)
        .arg("status")
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring"));

    let log = std::fs::read_to_string(data.file("data/logs/chronicle.log")).unwrap();
    assert!(log.contains("Ignoring config file"), "log: {log}");
}

#[test]
fn test_json_output_for_export_and_clear() {
    let data = FixtureDir::new();
    let files = FixtureDir::new();
    let uigf = files.write_uigf(
        "100000001",
        "v2.3",
        json!([uigf_item("1", "301", "2023-01-02 03:04:05")]),
    );
    chronicle_cmd(&data)
        .args(["import", "gacha"])
        .arg(&uigf)
        .assert()
        .success();

    let output = chronicle_cmd(&data)
        .args(["--json", "export", "gacha", "100000001"])
        .arg(files.file("out.json"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let exported: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(exported["uid"], "100000001");
    assert_eq!(exported["records"], 1);

    let output = chronicle_cmd(&data)
        .args(["--json", "clear-gacha", "100000001"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let cleared: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cleared["removed"], 1);
}
