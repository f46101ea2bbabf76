//! Single-file import and export of interchange files

use std::path::Path;

use tracing::info;

use super::Orchestrator;
use crate::error::{ChronicleError, Result};
use crate::interchange::{self, uiaf, uigf, InterchangeSummary};
use crate::merge::{merge_achievements, merge_gacha, AchievementMergeReport, GachaMergeReport};

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ChronicleError::not_found("File", path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

impl Orchestrator<'_> {
    /// Merge a UIAF file into the achievement store
    pub async fn import_achievements(&self, path: &Path) -> Result<AchievementMergeReport> {
        let file = uiaf::decode(&read_file(path).await?)?;
        let report = merge_achievements(&self.stores.achievements, &file.list);
        info!(path = %path.display(), version = %file.info.version, %report, "Imported achievements");
        Ok(report)
    }

    /// Merge a UIGF file into the gacha store under the uid it declares
    pub async fn import_gacha(&self, path: &Path) -> Result<(String, GachaMergeReport)> {
        let file = uigf::decode(&read_file(path).await?)?;
        let uid = file
            .info
            .uid
            .clone()
            .ok_or_else(|| ChronicleError::schema("info.uid is required"))?;
        let report = merge_gacha(&self.stores.gacha, &uid, &file.list);
        info!(path = %path.display(), uid = %uid, %report, "Imported gacha records");
        Ok((uid, report))
    }

    /// Write every progressed achievement as UIAF, returning the record count
    pub async fn export_achievements(&self, path: &Path) -> Result<usize> {
        let records = self.stores.achievements.list_progressed()?;
        let file = uiaf::encode(&records, &self.meta);
        write_file(path, &uiaf::to_bytes(&file)?).await?;
        info!(path = %path.display(), records = records.len(), "Exported achievements");
        Ok(records.len())
    }

    /// Write the gacha history of `uid` as UIGF, returning the record count
    pub async fn export_gacha(&self, uid: &str, path: &Path) -> Result<usize> {
        let records = self.stores.gacha.list_by_uid(uid)?;
        if records.is_empty() {
            return Err(ChronicleError::not_found("Gacha records for uid", uid));
        }
        let file = uigf::encode(uid, &records, &self.meta);
        write_file(path, &uigf::to_bytes(&file)?).await?;
        info!(path = %path.display(), uid, records = records.len(), "Exported gacha records");
        Ok(records.len())
    }

    /// Identify and validate a file without touching the store
    pub async fn inspect(&self, path: &Path) -> Result<InterchangeSummary> {
        interchange::inspect(&read_file(path).await?)
    }
}
