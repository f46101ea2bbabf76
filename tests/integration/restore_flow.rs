//! Integration tests for restoring backup directories
//!
//! Each test restores a directory of fixture files into a fresh data
//! directory and checks the per-category report and the resulting store.

use super::common::fixtures::{abyss_item, uiaf_item, uigf_item, FixtureDir, TestApp};
use chronicle::backup::RestoreStatus;
use chronicle::data::{AchievementRecord, AchievementStatus};
use serde_json::json;

#[tokio::test]
async fn test_restore_only_abyss_file() {
    let app = TestApp::new();
    let backup = FixtureDir::new();
    backup.write_abyss(json!([abyss_item("100000001", 71, 36), abyss_item("100000001", 72, 30)]));

    let report = app.ctx.orchestrator().restore(&backup.path).await.unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.not_found(), 3);
    assert_eq!(report.failed(), 0);
    assert!(report.is_success());

    let status = app.ctx.status().unwrap();
    assert_eq!(status.abyss_records, 2);
    assert_eq!(status.achievements.total, 0);
    assert!(status.gacha.is_empty());
    assert_eq!(status.cookie_keys, 0);
}

#[tokio::test]
async fn test_unrecognized_uigf_version_fails_only_gacha() {
    let app = TestApp::new();
    let backup = FixtureDir::new();
    backup.write_uigf(
        "100000001",
        "v9.9",
        json!([uigf_item("1", "301", "2023-01-02 03:04:05")]),
    );
    backup.write_uiaf("v1.1", json!([uiaf_item(80001, 3, 1, 1_690_000_000)]));

    let report = app.ctx.orchestrator().restore(&backup.path).await.unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.not_found(), 2);
    assert!(!report.is_success());

    let gacha = report
        .outcomes
        .iter()
        .find(|o| o.category == "gacha")
        .expect("gacha outcome");
    assert_eq!(gacha.file.as_deref(), Some("UIGF_100000001.json"));
    match &gacha.status {
        RestoreStatus::Failed { reason } => assert!(reason.contains("v9.9"), "reason: {reason}"),
        other => panic!("expected failure, got {other:?}"),
    }

    let stored = app.ctx.stores.achievements.get(80001).unwrap().unwrap();
    assert_eq!(stored.status, AchievementStatus::Completed);
    assert!(app.ctx.stores.gacha.uid_list().unwrap().is_empty());
}

#[tokio::test]
async fn test_restore_twice_changes_nothing() {
    let app = TestApp::new();
    let backup = FixtureDir::new();
    backup.write_uiaf(
        "v1.1",
        json!([uiaf_item(80001, 3, 1, 1_690_000_000), uiaf_item(80002, 1, 4, 0)]),
    );
    backup.write_uigf(
        "100000001",
        "v2.3",
        json!([
            uigf_item("1", "301", "2023-01-02 03:04:05"),
            uigf_item("2", "400", "2023-01-02 03:04:06")
        ]),
    );
    backup.write_abyss(json!([abyss_item("100000001", 71, 36)]));
    backup.write_cookie(json!({ "ltuid": "42", "ltoken": "abc" }));

    let orchestrator = app.ctx.orchestrator();
    let first = orchestrator.restore(&backup.path).await.unwrap();
    assert_eq!(first.succeeded(), 4);

    let second = orchestrator.restore(&backup.path).await.unwrap();
    for outcome in &second.outcomes {
        let RestoreStatus::Merged { summary } = &outcome.status else {
            panic!("{} did not merge", outcome.category);
        };
        match summary {
            chronicle::backup::MergeSummary::Achievements(r) => {
                assert_eq!((r.inserted, r.updated, r.unchanged), (0, 0, 2))
            }
            chronicle::backup::MergeSummary::Gacha { report, .. } => {
                assert_eq!((report.inserted, report.skipped), (0, 2))
            }
            chronicle::backup::MergeSummary::Abyss(r) => {
                assert_eq!((r.inserted, r.updated, r.unchanged), (0, 0, 1))
            }
            chronicle::backup::MergeSummary::Cookie { keys } => assert_eq!(*keys, 2),
        }
    }
}

#[tokio::test]
async fn test_restore_never_regresses_achievements() {
    let app = TestApp::new();
    app.ctx
        .stores
        .achievements
        .insert(&AchievementRecord::completed(1, 10, 1_690_000_000))
        .unwrap();

    let backup = FixtureDir::new();
    backup.write_uiaf("v1.1", json!([uiaf_item(1, 1, 3, 0)]));
    let report = app.ctx.orchestrator().restore(&backup.path).await.unwrap();
    assert!(report.is_success());

    let stored = app.ctx.stores.achievements.get(1).unwrap().unwrap();
    assert_eq!(stored, AchievementRecord::completed(1, 10, 1_690_000_000));
}

#[tokio::test]
async fn test_backup_directory_round_trip() {
    let source = TestApp::new();
    let seed = FixtureDir::new();
    seed.write_uiaf("v1.0", json!([{ "id": 80001, "current": 2, "timestamp": 0 }]));
    seed.write_uigf(
        "100000001",
        "v2.2",
        json!([uigf_item("1", "200", "2023-01-02 03:04:05")]),
    );
    source.ctx.orchestrator().restore(&seed.path).await.unwrap();

    let backup_dir = source.data_dir().join("my-backup");
    let written = source.ctx.orchestrator().backup(&backup_dir).await.unwrap();
    assert_eq!(written.files.len(), 4);

    let target = TestApp::new();
    let report = target.ctx.orchestrator().restore(&backup_dir).await.unwrap();
    assert_eq!(report.succeeded(), 4);
    assert_eq!(
        target.ctx.stores.achievements.list_progressed().unwrap(),
        source.ctx.stores.achievements.list_progressed().unwrap()
    );
    assert_eq!(
        target.ctx.stores.gacha.list_by_uid("100000001").unwrap(),
        source.ctx.stores.gacha.list_by_uid("100000001").unwrap()
    );
}
