//! Integration tests for single-file import, export and inspection

use super::common::fixtures::{uiaf_item, uigf_item, FixtureDir, TestApp};
use chronicle::Format;
use serde_json::{json, Value};

#[tokio::test]
async fn test_import_export_import_is_stable() {
    let app = TestApp::new();
    let files = FixtureDir::new();
    let input = files.write_uiaf(
        "v1.1",
        json!([
            uiaf_item(80001, 3, 1, 1_690_000_000),
            uiaf_item(80002, 1, 4, 0),
            uiaf_item(80003, 0, 0, 0)
        ]),
    );

    let orchestrator = app.ctx.orchestrator();
    let report = orchestrator.import_achievements(&input).await.unwrap();
    assert_eq!(report.inserted, 3);

    let output = files.file("exported.json");
    // Locked records without progress are not exported
    assert_eq!(orchestrator.export_achievements(&output).await.unwrap(), 2);

    let again = orchestrator.import_achievements(&output).await.unwrap();
    assert_eq!((again.inserted, again.updated, again.unchanged), (0, 0, 2));
}

#[tokio::test]
async fn test_exported_uigf_header() {
    let app = TestApp::new();
    let files = FixtureDir::new();
    let input = files.write_uigf(
        "100000001",
        "v2.2",
        json!([
            uigf_item("1", "400", "2023-01-02 03:04:05"),
            uigf_item("2", "301", "2023-01-02 03:04:06")
        ]),
    );

    let orchestrator = app.ctx.orchestrator();
    let (uid, report) = orchestrator.import_gacha(&input).await.unwrap();
    assert_eq!(uid, "100000001");
    assert_eq!(report.inserted, 2);

    let output = files.file("out/UIGF.json");
    assert_eq!(orchestrator.export_gacha("100000001", &output).await.unwrap(), 2);

    let doc: Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(doc["info"]["version"], "v2.3");
    assert_eq!(doc["info"]["uid"], "100000001");
    assert_eq!(doc["info"]["exportApp"], "Chronicle");
    let list = doc["list"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["uigf_gacha_type"], "301");
    assert_eq!(list[0]["count"], "1");
    assert_eq!(list[0]["uid"], "100000001");
}

#[tokio::test]
async fn test_rejected_file_leaves_store_untouched() {
    let app = TestApp::new();
    let files = FixtureDir::new();
    let bad_version = files.write_uiaf("v0.9", json!([uiaf_item(1, 3, 1, 5)]));
    let malformed = files.write_raw("broken.json", "{ \"info\": ");
    let mismatched_uid = files.write_uigf(
        "100000001",
        "v2.3",
        json!([{
            "id": "1", "uid": "100000002", "gacha_type": "301",
            "time": "2023-01-02 03:04:05", "name": "Amber",
            "item_type": "Character", "rank_type": "4"
        }]),
    );

    let orchestrator = app.ctx.orchestrator();
    let err = orchestrator.import_achievements(&bad_version).await.unwrap_err();
    assert!(err.is_schema());
    let err = orchestrator.import_achievements(&malformed).await.unwrap_err();
    assert!(err.is_format());
    let err = orchestrator.import_gacha(&mismatched_uid).await.unwrap_err();
    assert!(err.is_schema());

    let status = app.ctx.status().unwrap();
    assert_eq!(status.achievements.total, 0);
    assert!(status.gacha.is_empty());
}

#[tokio::test]
async fn test_inspect_either_format() {
    let app = TestApp::new();
    let files = FixtureDir::new();
    let uigf = files.write_uigf(
        "100000001",
        "v2.3",
        json!([uigf_item("1", "301", "2023-01-02 03:04:05")]),
    );

    let summary = app.ctx.orchestrator().inspect(&uigf).await.unwrap();
    assert_eq!(summary.format, Format::Uigf);
    assert_eq!(summary.uid.as_deref(), Some("100000001"));
    assert_eq!(summary.records, 1);
    assert_eq!(app.ctx.status().unwrap().gacha.len(), 0);
}
