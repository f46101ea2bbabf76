//! Backup directory and data directory fixtures

use std::path::{Path, PathBuf};

use chronicle::{AppContext, DataPaths};
use serde_json::{json, Value};
use tempfile::TempDir;

/// A temporary directory that fixture files are written into.
///
/// Removed when dropped.
pub struct FixtureDir {
    _dir: TempDir,
    pub path: PathBuf,
}

impl FixtureDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().to_path_buf();
        Self { _dir: dir, path }
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.file(name);
        std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap())
            .expect("Failed to write fixture");
        path
    }

    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// UIAF.json with the given version and items
    pub fn write_uiaf(&self, version: &str, list: Value) -> PathBuf {
        self.write_json(
            "UIAF.json",
            &json!({
                "info": {
                    "version": version,
                    "exportTimestamp": 1_700_000_000,
                    "exportApp": "Fixture"
                },
                "list": list
            }),
        )
    }

    /// UIGF_<uid>.json with the given version and items
    pub fn write_uigf(&self, uid: &str, version: &str, list: Value) -> PathBuf {
        self.write_json(
            &format!("UIGF_{uid}.json"),
            &json!({
                "info": {
                    "uid": uid,
                    "version": version,
                    "exportTimestamp": 1_700_000_000,
                    "exportApp": "Fixture"
                },
                "list": list
            }),
        )
    }

    pub fn write_abyss(&self, list: Value) -> PathBuf {
        self.write_json("abyss.json", &list)
    }

    pub fn write_cookie(&self, cookie: Value) -> PathBuf {
        self.write_json("cookie.json", &cookie)
    }
}

/// A UIAF v1.1 item
pub fn uiaf_item(id: i64, status: i64, current: i64, timestamp: i64) -> Value {
    json!({ "id": id, "status": status, "current": current, "timestamp": timestamp })
}

/// A UIGF item without optional fields
pub fn uigf_item(id: &str, gacha_type: &str, time: &str) -> Value {
    json!({
        "id": id,
        "gacha_type": gacha_type,
        "time": time,
        "name": "Amber",
        "item_type": "Character",
        "rank_type": "4"
    })
}

pub fn abyss_item(uid: &str, id: i64, total_star: i64) -> Value {
    json!({
        "uid": uid,
        "id": id,
        "startTime": "2023-11-16 04:00:00",
        "endTime": "2023-12-16 03:59:59",
        "totalBattleTimes": 12,
        "totalWinTimes": 9,
        "maxFloor": "12-3",
        "totalStar": total_star,
        "isUnlock": true
    })
}

/// A data directory with an opened application context
pub struct TestApp {
    _dir: TempDir,
    pub ctx: AppContext,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let paths = DataPaths::new(Some(dir.path().join("data")));
        let ctx = AppContext::open(paths).expect("Failed to open context");
        Self { _dir: dir, ctx }
    }

    pub fn data_dir(&self) -> &Path {
        self.ctx.paths.data_dir()
    }
}
