//! Static schemas for every recognized interchange version
//!
//! A schema lists the fields of `info` and of each `list` item with their JSON
//! type and whether they are required. Unknown fields are allowed.
//!
//! The published UIAF/UIGF JSON Schema documents are not loaded at runtime;
//! their required fields and types are mirrored here as static tables, with
//! typed serde decoding catching the rest. Supporting a new version means
//! adding a table entry to [`SCHEMAS`].

use serde_json::Value;

use super::Format;
use crate::error::{ChronicleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Integer,
}

impl JsonType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            JsonType::String => value.is_string(),
            JsonType::Integer => value.is_i64() || value.is_u64(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub ty: JsonType,
    pub required: bool,
}

const fn required(name: &'static str, ty: JsonType) -> Field {
    Field {
        name,
        ty,
        required: true,
    }
}

const fn optional(name: &'static str, ty: JsonType) -> Field {
    Field {
        name,
        ty,
        required: false,
    }
}

/// Schema of one format version
#[derive(Debug)]
pub struct Schema {
    pub format: Format,
    pub version: &'static str,
    pub info: &'static [Field],
    pub item: &'static [Field],
}

const UIAF_INFO: &[Field] = &[
    required("version", JsonType::String),
    required("exportTimestamp", JsonType::Integer),
    optional("exportApp", JsonType::String),
    optional("exportAppVersion", JsonType::String),
];

const UIGF_V2_2_INFO: &[Field] = &[
    required("version", JsonType::String),
    required("uid", JsonType::String),
    required("exportTimestamp", JsonType::Integer),
    optional("exportApp", JsonType::String),
    optional("exportAppVersion", JsonType::String),
];

const UIGF_V2_3_INFO: &[Field] = &[
    required("version", JsonType::String),
    required("uid", JsonType::String),
    required("exportTimestamp", JsonType::Integer),
    optional("exportApp", JsonType::String),
    optional("exportAppVersion", JsonType::String),
    optional("regionTimeZone", JsonType::Integer),
];

const UIGF_ITEM: &[Field] = &[
    required("id", JsonType::String),
    optional("uid", JsonType::String),
    required("gacha_type", JsonType::String),
    optional("uigf_gacha_type", JsonType::String),
    optional("item_id", JsonType::String),
    required("name", JsonType::String),
    required("item_type", JsonType::String),
    required("rank_type", JsonType::String),
    optional("count", JsonType::String),
    required("time", JsonType::String),
];

/// Every recognized version. The first entry of each format is the one written on export.
pub static SCHEMAS: &[Schema] = &[
    Schema {
        format: Format::Uiaf,
        version: "v1.1",
        info: UIAF_INFO,
        item: &[
            required("id", JsonType::Integer),
            required("status", JsonType::Integer),
            required("current", JsonType::Integer),
            required("timestamp", JsonType::Integer),
        ],
    },
    Schema {
        format: Format::Uiaf,
        version: "v1.0",
        info: UIAF_INFO,
        item: &[
            required("id", JsonType::Integer),
            optional("current", JsonType::Integer),
            required("timestamp", JsonType::Integer),
        ],
    },
    Schema {
        format: Format::Uigf,
        version: "v2.3",
        info: UIGF_V2_3_INFO,
        item: UIGF_ITEM,
    },
    Schema {
        format: Format::Uigf,
        version: "v2.2",
        info: UIGF_V2_2_INFO,
        item: UIGF_ITEM,
    },
];

/// Version written by exports of `format`
pub fn current_version(format: Format) -> &'static str {
    SCHEMAS
        .iter()
        .find(|s| s.format == format)
        .map(|s| s.version)
        .unwrap_or_default()
}

/// Versions of `format` accepted on import
pub fn recognized_versions(format: Format) -> Vec<&'static str> {
    SCHEMAS
        .iter()
        .filter(|s| s.format == format)
        .map(|s| s.version)
        .collect()
}

/// Read `info.version` from a parsed document
pub fn declared_version(doc: &Value) -> Result<&str> {
    doc.get("info")
        .and_then(|info| info.get("version"))
        .and_then(Value::as_str)
        .ok_or_else(|| ChronicleError::schema("missing string field info.version"))
}

/// Pick the schema for a document. `format` restricts the search; `None` accepts any format.
pub fn resolve(doc: &Value, format: Option<Format>) -> Result<&'static Schema> {
    let version = declared_version(doc)?;
    SCHEMAS
        .iter()
        .filter(|s| format.map_or(true, |f| s.format == f))
        .find(|s| s.version == version)
        .ok_or_else(|| match format {
            Some(f) => ChronicleError::schema(format!(
                "unsupported {} version {:?} (recognized: {})",
                f.name(),
                version,
                recognized_versions(f).join(", ")
            )),
            None => ChronicleError::schema(format!("unsupported version {:?}", version)),
        })
}

impl Schema {
    /// Check the document structure against this schema
    pub fn validate(&self, doc: &Value) -> Result<()> {
        let root = doc
            .as_object()
            .ok_or_else(|| ChronicleError::schema("document is not an object"))?;

        let info = root
            .get("info")
            .ok_or_else(|| ChronicleError::schema("missing field info"))?;
        check_object(info, self.info, "info")?;

        let list = root
            .get("list")
            .ok_or_else(|| ChronicleError::schema("missing field list"))?
            .as_array()
            .ok_or_else(|| ChronicleError::schema("field list is not an array"))?;
        for (index, item) in list.iter().enumerate() {
            check_object(item, self.item, &format!("list[{index}]"))?;
        }

        Ok(())
    }
}

fn check_object(value: &Value, fields: &[Field], path: &str) -> Result<()> {
    let object = value
        .as_object()
        .ok_or_else(|| ChronicleError::schema(format!("{path} is not an object")))?;

    for field in fields {
        match object.get(field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(ChronicleError::schema(format!(
                    "missing field {path}.{}",
                    field.name
                )));
            }
            None | Some(Value::Null) => {}
            Some(v) if !field.ty.matches(v) => {
                return Err(ChronicleError::schema(format!(
                    "field {path}.{} must be {}",
                    field.name,
                    field.ty.name()
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}
