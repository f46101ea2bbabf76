//! The fixed set of backup categories.
//!
//! Each category knows which file names belong to it, how to serialize its
//! slice of the store, and how to decode and merge one of its files. Adding a
//! category means adding an entry to [`CATEGORIES`].

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::data::{AbyssRecord, Cookie, Stores};
use crate::error::{ChronicleError, Result};
use crate::interchange::{uiaf, uigf, ExportMeta};
use crate::merge::{
    merge_abyss, merge_achievements, merge_gacha, AbyssMergeReport, AchievementMergeReport,
    GachaMergeReport,
};

pub const ACHIEVEMENTS_FILE: &str = "UIAF.json";
pub const COOKIE_FILE: &str = "cookie.json";
pub const ABYSS_FILE: &str = "abyss.json";
pub const GACHA_FILE_PATTERN: &str = r"^UIGF_(\d+)\.json$";

/// File name of the gacha backup of one user
pub fn gacha_file_name(uid: &str) -> String {
    format!("UIGF_{uid}.json")
}

/// Which directory entries belong to a category
#[derive(Debug, Clone, Copy)]
pub enum FileMatcher {
    /// Singleton category stored under a fixed name
    Exact(&'static str),
    /// One file per user, matched by regex
    Pattern(&'static str),
}

impl FileMatcher {
    /// Pick the matching names, keeping their order
    pub fn select(&self, names: &[String]) -> Vec<String> {
        match self {
            FileMatcher::Exact(expected) => names
                .iter()
                .filter(|name| name.as_str() == *expected)
                .cloned()
                .collect(),
            FileMatcher::Pattern(pattern) => match Regex::new(pattern) {
                Ok(re) => names.iter().filter(|name| re.is_match(name)).cloned().collect(),
                Err(e) => {
                    tracing::error!(pattern, error = %e, "Invalid backup file pattern");
                    Vec::new()
                }
            },
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            FileMatcher::Exact(name) => name,
            FileMatcher::Pattern(_) => "UIGF_<uid>.json",
        }
    }
}

/// One serialized backup file
#[derive(Debug, Clone)]
pub struct BackupFile {
    pub name: String,
    pub records: usize,
    pub bytes: Vec<u8>,
}

/// What restoring one file changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeSummary {
    Achievements(AchievementMergeReport),
    Cookie { keys: usize },
    Abyss(AbyssMergeReport),
    Gacha { uid: String, report: GachaMergeReport },
}

impl MergeSummary {
    /// Records whose store write failed
    pub fn failed_records(&self) -> usize {
        match self {
            MergeSummary::Achievements(r) => r.failed,
            MergeSummary::Cookie { .. } => 0,
            MergeSummary::Abyss(r) => r.failed,
            MergeSummary::Gacha { report, .. } => report.failed,
        }
    }
}

impl std::fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeSummary::Achievements(r) => write!(f, "{r}"),
            MergeSummary::Cookie { keys } => write!(f, "{keys} cookie entries restored"),
            MergeSummary::Abyss(r) => write!(f, "{r}"),
            MergeSummary::Gacha { uid, report } => write!(f, "uid {uid}: {report}"),
        }
    }
}

type BackupFn = fn(&Stores, &ExportMeta) -> Result<Vec<BackupFile>>;
type RestoreFn = fn(&Stores, &str, &[u8]) -> Result<MergeSummary>;

/// A category of backed-up data
pub struct Category {
    pub name: &'static str,
    pub matcher: FileMatcher,
    pub backup: BackupFn,
    pub restore: RestoreFn,
}

impl std::fmt::Debug for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// All categories, in backup and restore order
pub static CATEGORIES: &[Category] = &[
    Category {
        name: "achievements",
        matcher: FileMatcher::Exact(ACHIEVEMENTS_FILE),
        backup: backup_achievements,
        restore: restore_achievements,
    },
    Category {
        name: "cookie",
        matcher: FileMatcher::Exact(COOKIE_FILE),
        backup: backup_cookie,
        restore: restore_cookie,
    },
    Category {
        name: "abyss",
        matcher: FileMatcher::Exact(ABYSS_FILE),
        backup: backup_abyss,
        restore: restore_abyss,
    },
    Category {
        name: "gacha",
        matcher: FileMatcher::Pattern(GACHA_FILE_PATTERN),
        backup: backup_gacha,
        restore: restore_gacha,
    },
];

fn to_json<T: Serialize + ?Sized>(value: &T, name: &str) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| ChronicleError::format(name, e))
}

/// Parse plain JSON backup files: syntax errors are format errors, shape errors schema errors
fn from_json<T: DeserializeOwned>(bytes: &[u8], name: &str) -> Result<T> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ChronicleError::format(name, e))?;
    serde_json::from_value(value).map_err(|e| ChronicleError::schema(format!("{name}: {e}")))
}

fn backup_achievements(stores: &Stores, meta: &ExportMeta) -> Result<Vec<BackupFile>> {
    let records = stores.achievements.list_progressed()?;
    let file = uiaf::encode(&records, meta);
    Ok(vec![BackupFile {
        name: ACHIEVEMENTS_FILE.to_string(),
        records: records.len(),
        bytes: uiaf::to_bytes(&file)?,
    }])
}

fn restore_achievements(stores: &Stores, _name: &str, bytes: &[u8]) -> Result<MergeSummary> {
    let file = uiaf::decode(bytes)?;
    Ok(MergeSummary::Achievements(merge_achievements(
        &stores.achievements,
        &file.list,
    )))
}

fn backup_cookie(stores: &Stores, _meta: &ExportMeta) -> Result<Vec<BackupFile>> {
    let cookie = stores.app_data.cookie()?;
    Ok(vec![BackupFile {
        name: COOKIE_FILE.to_string(),
        records: cookie.len(),
        bytes: to_json(&cookie, COOKIE_FILE)?,
    }])
}

fn restore_cookie(stores: &Stores, name: &str, bytes: &[u8]) -> Result<MergeSummary> {
    let cookie: Cookie = from_json(bytes, name)?;
    stores.app_data.set_cookie(&cookie)?;
    Ok(MergeSummary::Cookie { keys: cookie.len() })
}

fn backup_abyss(stores: &Stores, _meta: &ExportMeta) -> Result<Vec<BackupFile>> {
    let records = stores.abyss.list()?;
    Ok(vec![BackupFile {
        name: ABYSS_FILE.to_string(),
        records: records.len(),
        bytes: to_json(&records, ABYSS_FILE)?,
    }])
}

fn restore_abyss(stores: &Stores, name: &str, bytes: &[u8]) -> Result<MergeSummary> {
    let records: Vec<AbyssRecord> = from_json(bytes, name)?;
    Ok(MergeSummary::Abyss(merge_abyss(&stores.abyss, &records)))
}

fn backup_gacha(stores: &Stores, meta: &ExportMeta) -> Result<Vec<BackupFile>> {
    let mut files = Vec::new();
    for uid in stores.gacha.uid_list()? {
        let records = stores.gacha.list_by_uid(&uid)?;
        let file = uigf::encode(&uid, &records, meta);
        files.push(BackupFile {
            name: gacha_file_name(&uid),
            records: records.len(),
            bytes: uigf::to_bytes(&file)?,
        });
    }
    Ok(files)
}

fn restore_gacha(stores: &Stores, name: &str, bytes: &[u8]) -> Result<MergeSummary> {
    let file = uigf::decode(bytes)?;
    let named_uid = name
        .strip_prefix("UIGF_")
        .and_then(|rest| rest.strip_suffix(".json"));
    // Decoding guarantees info.uid for UIGF; the file name is only a fallback
    let uid = match (file.info.uid.clone(), named_uid) {
        (Some(uid), Some(named)) if uid != named => {
            tracing::warn!(file = name, uid = %uid, "File name does not match the uid inside, using the uid inside");
            uid
        }
        (Some(uid), _) => uid,
        (None, Some(named)) => named.to_string(),
        (None, None) => return Err(ChronicleError::schema(format!("{name}: no uid"))),
    };
    let report = merge_gacha(&stores.gacha, &uid, &file.list);
    Ok(MergeSummary::Gacha { uid, report })
}
