//! UIAF: achievement completion sets
//!
//! Wire status codes are `0` invalid/locked, `1` unfinished, `2` finished and
//! `3` finished with the reward claimed. `timestamp` is `0` when an
//! achievement has no completion time.

use serde::{Deserialize, Serialize};

use super::{parse, schema, ExportMeta, Format, InterchangeFile};
use crate::data::{AchievementRecord, AchievementStatus};
use crate::error::{ChronicleError, Result};

const STATUS_LOCKED: i64 = 0;
const STATUS_UNFINISHED: i64 = 1;
const STATUS_FINISHED: i64 = 2;
const STATUS_REWARD_TAKEN: i64 = 3;

/// One achievement as it appears in a UIAF list
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UiafItem {
    id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<i64>,
    #[serde(default)]
    current: i64,
    timestamp: i64,
}

impl UiafItem {
    fn from_record(record: &AchievementRecord) -> Self {
        let status = match record.status {
            AchievementStatus::Locked => STATUS_LOCKED,
            AchievementStatus::InProgress => STATUS_UNFINISHED,
            AchievementStatus::Completed => STATUS_REWARD_TAKEN,
        };
        Self {
            id: record.id,
            status: Some(status),
            current: record.progress,
            timestamp: record.completed_at.unwrap_or(0),
        }
    }

    fn into_record(self, version: &str) -> Result<AchievementRecord> {
        let status = match self.status {
            Some(STATUS_LOCKED) => AchievementStatus::Locked,
            Some(STATUS_UNFINISHED) => AchievementStatus::InProgress,
            Some(STATUS_FINISHED) | Some(STATUS_REWARD_TAKEN) => AchievementStatus::Completed,
            Some(other) => {
                return Err(ChronicleError::schema(format!(
                    "achievement {}: unknown status {}",
                    self.id, other
                )))
            }
            // v1.0 lists carry no status
            None if self.timestamp > 0 => AchievementStatus::Completed,
            None if self.current > 0 => AchievementStatus::InProgress,
            None => AchievementStatus::Locked,
        };
        tracing::trace!(id = self.id, version, status = status.label(), "Decoded achievement");

        let record = AchievementRecord {
            id: self.id,
            status,
            progress: self.current,
            // 0 stays the "finished, time unknown" marker; merging prefers any real time
            completed_at: (status == AchievementStatus::Completed).then_some(self.timestamp.max(0)),
        };
        record.validate().map_err(ChronicleError::Schema)?;
        Ok(record)
    }
}

/// Build a UIAF file of the current version
pub fn encode(records: &[AchievementRecord], meta: &ExportMeta) -> InterchangeFile<AchievementRecord> {
    InterchangeFile {
        info: meta.info(Format::Uiaf, None),
        list: records.to_vec(),
    }
}

/// Serialize a UIAF file to JSON bytes in wire form
pub fn to_bytes(file: &InterchangeFile<AchievementRecord>) -> Result<Vec<u8>> {
    super::to_bytes(&InterchangeFile {
        info: file.info.clone(),
        list: file.list.iter().map(UiafItem::from_record).collect(),
    })
}

/// Parse and validate UIAF bytes
pub fn decode(bytes: &[u8]) -> Result<InterchangeFile<AchievementRecord>> {
    let doc = parse(bytes, Format::Uiaf)?;
    let schema = schema::resolve(&doc, Some(Format::Uiaf))?;
    schema.validate(&doc)?;

    let raw: InterchangeFile<UiafItem> = serde_json::from_value(doc)
        .map_err(|e| ChronicleError::schema(format!("UIAF {}: {e}", schema.version)))?;
    let list = raw
        .list
        .into_iter()
        .map(|item| item.into_record(schema.version))
        .collect::<Result<Vec<_>>>()?;

    Ok(InterchangeFile {
        info: raw.info,
        list,
    })
}
