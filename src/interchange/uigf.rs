//! UIGF: gacha history of one user

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{parse, schema, ExportMeta, Format, InterchangeFile};
use crate::data::{GachaRecord, GACHA_TIME_FORMAT};
use crate::error::{ChronicleError, Result};

/// One pull as it appears in a UIGF list. UIGF carries every value as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UigfItem {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
    gacha_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uigf_gacha_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_id: Option<String>,
    name: String,
    item_type: String,
    rank_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<String>,
    time: String,
}

/// Normalized pool type for a game pool type; the second character banner shares 301
pub fn uigf_gacha_type(gacha_type: &str) -> &str {
    match gacha_type {
        "400" => "301",
        other => other,
    }
}

impl UigfItem {
    fn from_record(record: &GachaRecord) -> Self {
        Self {
            id: record.id.clone(),
            uid: Some(record.uid.clone()),
            gacha_type: record.gacha_type.clone(),
            uigf_gacha_type: Some(record.uigf_gacha_type.clone()),
            item_id: record.item_id.clone(),
            name: record.name.clone(),
            item_type: record.item_type.clone(),
            rank_type: record.rank_type.clone(),
            count: Some(record.count.to_string()),
            time: record.time_string(),
        }
    }

    fn into_record(self, owner: &str) -> Result<GachaRecord> {
        let uid = match self.uid {
            Some(uid) if uid != owner => {
                return Err(ChronicleError::schema(format!(
                    "record {} belongs to uid {} but the file is for uid {}",
                    self.id, uid, owner
                )))
            }
            _ => owner.to_string(),
        };
        let count = match self.count.as_deref() {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|count| *count >= 1)
                .ok_or_else(|| {
                    ChronicleError::schema(format!("record {}: invalid count {:?}", self.id, raw))
                })?,
        };
        let time = NaiveDateTime::parse_from_str(&self.time, GACHA_TIME_FORMAT).map_err(|_| {
            ChronicleError::schema(format!("record {}: invalid time {:?}", self.id, self.time))
        })?;
        let uigf_gacha_type = self
            .uigf_gacha_type
            .unwrap_or_else(|| uigf_gacha_type(&self.gacha_type).to_string());

        Ok(GachaRecord {
            uid,
            id: self.id,
            gacha_type: self.gacha_type,
            uigf_gacha_type,
            item_id: self.item_id.filter(|id| !id.is_empty()),
            name: self.name,
            item_type: self.item_type,
            rank_type: self.rank_type,
            count,
            time,
        })
    }
}

/// Build a UIGF file of the current version for `uid`
pub fn encode(uid: &str, records: &[GachaRecord], meta: &ExportMeta) -> InterchangeFile<GachaRecord> {
    InterchangeFile {
        info: meta.info(Format::Uigf, Some(uid.to_string())),
        list: records.to_vec(),
    }
}

/// Serialize a UIGF file to JSON bytes in wire form
pub fn to_bytes(file: &InterchangeFile<GachaRecord>) -> Result<Vec<u8>> {
    super::to_bytes(&InterchangeFile {
        info: file.info.clone(),
        list: file.list.iter().map(UigfItem::from_record).collect(),
    })
}

/// Parse and validate UIGF bytes
pub fn decode(bytes: &[u8]) -> Result<InterchangeFile<GachaRecord>> {
    let doc = parse(bytes, Format::Uigf)?;
    let schema = schema::resolve(&doc, Some(Format::Uigf))?;
    schema.validate(&doc)?;

    let raw: InterchangeFile<UigfItem> = serde_json::from_value(doc)
        .map_err(|e| ChronicleError::schema(format!("UIGF {}: {e}", schema.version)))?;
    let owner = raw
        .info
        .uid
        .clone()
        .ok_or_else(|| ChronicleError::schema("missing field info.uid"))?;
    let list = raw
        .list
        .into_iter()
        .map(|item| item.into_record(&owner))
        .collect::<Result<Vec<_>>>()?;

    Ok(InterchangeFile {
        info: raw.info,
        list,
    })
}
