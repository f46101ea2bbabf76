//! Error types shared by the codec, merge engine and backup orchestrator.

use thiserror::Error;

use crate::data::DatabaseError;

/// Error type for Chronicle operations.
#[derive(Debug, Error)]
pub enum ChronicleError {
    /// Payload is not parseable as JSON.
    #[error("Malformed data in {source_name}: {message}")]
    Format {
        source_name: String,
        message: String,
    },

    /// Payload parses but violates the versioned schema or a record invariant.
    #[error("Schema violation: {0}")]
    Schema(String),

    /// A store statement failed.
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),

    /// An expected file, directory or user was not found.
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be used.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChronicleError {
    pub fn format(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Format {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

impl From<rusqlite::Error> for ChronicleError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(DatabaseError::Sqlite(err))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ChronicleError>;
