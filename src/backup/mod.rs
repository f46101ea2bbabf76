//! Backup and restore orchestration
//!
//! A backup writes one file per category (one per user for gacha) into a
//! directory. A restore walks the same categories in order, merging every file
//! it finds. Categories are isolated: a missing or broken file is recorded in
//! the report and the next category still runs.

mod category;
mod transfer;

pub use category::{
    gacha_file_name, BackupFile, Category, FileMatcher, MergeSummary, ABYSS_FILE,
    ACHIEVEMENTS_FILE, CATEGORIES, COOKIE_FILE, GACHA_FILE_PATTERN,
};

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::data::Stores;
use crate::error::{ChronicleError, Result};
use crate::interchange::ExportMeta;

/// A file written by a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub category: &'static str,
    pub name: String,
    pub records: usize,
}

/// Result of a backup run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    pub dir: PathBuf,
    pub files: Vec<WrittenFile>,
}

/// How restoring one category (or one gacha file) went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreStatus {
    Merged { summary: MergeSummary },
    NotFound,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOutcome {
    pub category: &'static str,
    pub file: Option<String>,
    #[serde(flatten)]
    pub status: RestoreStatus,
}

/// Per-category outcomes of a restore run, in category order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub outcomes: Vec<CategoryOutcome>,
}

impl RestoreReport {
    fn count(&self, pred: impl Fn(&RestoreStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, RestoreStatus::Merged { .. }))
    }

    pub fn not_found(&self) -> usize {
        self.count(|s| matches!(s, RestoreStatus::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RestoreStatus::Failed { .. }))
    }

    /// No category failed; missing categories are not failures
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Runs backups, restores and single-file transfers against one set of stores
pub struct Orchestrator<'a> {
    stores: &'a Stores,
    meta: ExportMeta,
}

impl<'a> Orchestrator<'a> {
    pub fn new(stores: &'a Stores, meta: ExportMeta) -> Self {
        Self { stores, meta }
    }

    /// Write every category into `target`, creating it if needed
    pub async fn backup(&self, target: &Path) -> Result<BackupReport> {
        tokio::fs::create_dir_all(target).await?;
        info!(dir = %target.display(), "Starting backup");

        let mut files = Vec::new();
        for category in CATEGORIES {
            let produced = (category.backup)(self.stores, &self.meta).map_err(|e| {
                error!(category = category.name, error = %e, "Failed to serialize category");
                e
            })?;
            for file in produced {
                tokio::fs::write(target.join(&file.name), &file.bytes).await?;
                debug!(
                    category = category.name,
                    file = %file.name,
                    records = file.records,
                    "Wrote backup file"
                );
                files.push(WrittenFile {
                    category: category.name,
                    name: file.name,
                    records: file.records,
                });
            }
        }

        info!(dir = %target.display(), files = files.len(), "Backup complete");
        Ok(BackupReport {
            dir: target.to_path_buf(),
            files,
        })
    }

    /// Merge every category found in `source` into the stores
    pub async fn restore(&self, source: &Path) -> Result<RestoreReport> {
        if !tokio::fs::try_exists(source).await? {
            return Err(ChronicleError::not_found(
                "Backup directory",
                source.display().to_string(),
            ));
        }
        let names = list_json_files(source).await?;
        info!(dir = %source.display(), files = names.len(), "Starting restore");

        let mut report = RestoreReport::default();
        for category in CATEGORIES {
            let matched = category.matcher.select(&names);
            if matched.is_empty() {
                warn!(
                    category = category.name,
                    expected = category.matcher.describe(),
                    "No backup file for category"
                );
                report.outcomes.push(CategoryOutcome {
                    category: category.name,
                    file: None,
                    status: RestoreStatus::NotFound,
                });
                continue;
            }
            for name in matched {
                let status = self.restore_file(category, source, &name).await;
                report.outcomes.push(CategoryOutcome {
                    category: category.name,
                    file: Some(name),
                    status,
                });
            }
        }

        if report.is_success() {
            info!(
                succeeded = report.succeeded(),
                not_found = report.not_found(),
                "Restore complete"
            );
        } else {
            error!(
                succeeded = report.succeeded(),
                not_found = report.not_found(),
                failed = report.failed(),
                "Restore finished with failures"
            );
        }
        Ok(report)
    }

    async fn restore_file(&self, category: &Category, source: &Path, name: &str) -> RestoreStatus {
        let merged = match tokio::fs::read(source.join(name)).await {
            Ok(bytes) => (category.restore)(self.stores, name, &bytes),
            Err(e) => Err(e.into()),
        };

        match merged {
            Ok(summary) if summary.failed_records() == 0 => {
                info!(category = category.name, file = name, %summary, "Restored backup file");
                RestoreStatus::Merged { summary }
            }
            Ok(summary) => {
                error!(
                    category = category.name,
                    file = name,
                    failed = summary.failed_records(),
                    "Some records could not be stored"
                );
                RestoreStatus::Failed {
                    reason: format!("{} records could not be stored ({summary})", summary.failed_records()),
                }
            }
            Err(e) => {
                error!(category = category.name, file = name, error = %e, "Failed to restore backup file");
                RestoreStatus::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Names of the regular `.json` files in `dir`, sorted
async fn list_json_files(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".json") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
