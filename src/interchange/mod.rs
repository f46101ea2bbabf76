//! Interchange codec for portable achievement (UIAF) and gacha (UIGF) files
//!
//! Decoding is two-staged: the bytes must parse as JSON (`Format` error), then
//! the document must match the static schema of its declared version
//! (`Schema` error). Encoding always writes the current version.

pub mod schema;
pub mod uiaf;
pub mod uigf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChronicleError, Result};

/// Interchange format family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    /// Achievement completion sets
    Uiaf,
    /// Gacha history of one user
    Uigf,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Uiaf => "UIAF",
            Format::Uigf => "UIGF",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Header of an interchange file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterchangeInfo {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub export_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_time_zone: Option<i64>,
}

/// A versioned container of records, alive for one import or export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeFile<R> {
    pub info: InterchangeInfo,
    pub list: Vec<R>,
}

/// Who produced an export and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMeta {
    pub app: String,
    pub app_version: String,
    /// Unix seconds
    pub timestamp: i64,
}

impl ExportMeta {
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    fn info(&self, format: Format, uid: Option<String>) -> InterchangeInfo {
        InterchangeInfo {
            version: schema::current_version(format).to_string(),
            uid,
            export_timestamp: self.timestamp,
            export_app: Some(self.app.clone()),
            export_app_version: Some(self.app_version.clone()),
            region_time_zone: None,
        }
    }
}

/// What an interchange file contains, read without touching the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterchangeSummary {
    pub format: Format,
    pub version: String,
    pub uid: Option<String>,
    pub export_app: Option<String>,
    pub export_timestamp: i64,
    pub records: usize,
}

/// Serialize an interchange file as pretty JSON
pub fn to_bytes<R: Serialize>(file: &InterchangeFile<R>) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(file).map_err(|e| ChronicleError::format("interchange export", e))
}

/// Parse bytes as a JSON document
pub(crate) fn parse(bytes: &[u8], format: Format) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| ChronicleError::format(format.name(), e))
}

/// Identify and validate an interchange document of either format
pub fn inspect(bytes: &[u8]) -> Result<InterchangeSummary> {
    let doc: Value =
        serde_json::from_slice(bytes).map_err(|e| ChronicleError::format("interchange file", e))?;
    let schema = schema::resolve(&doc, None)?;
    schema.validate(&doc)?;

    let info: InterchangeInfo = serde_json::from_value(doc["info"].clone())
        .map_err(|e| ChronicleError::schema(format!("info: {e}")))?;
    let records = doc["list"].as_array().map_or(0, Vec::len);

    Ok(InterchangeSummary {
        format: schema.format,
        version: info.version,
        uid: info.uid,
        export_app: info.export_app,
        export_timestamp: info.export_timestamp,
        records,
    })
}
