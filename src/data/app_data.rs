//! App data access object (key-value store)

use super::database::{lock, DatabaseError};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Key under which the session cookie is stored
pub const COOKIE_KEY: &str = "cookie";

/// Session cookie: flat map of cookie name to value
pub type Cookie = BTreeMap<String, String>;

/// Data access object for app data (key-value store)
#[derive(Clone)]
pub struct AppDataStore {
    conn: Arc<Mutex<Connection>>,
}

impl AppDataStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Set a value (insert or update)
    pub fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO app_data (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT value FROM app_data WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;

        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Delete a key
    pub fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let conn = lock(&self.conn)?;
        conn.execute("DELETE FROM app_data WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Stored session cookie. A missing or unreadable value yields an empty map.
    pub fn cookie(&self) -> Result<Cookie, DatabaseError> {
        let Some(raw) = self.get(COOKIE_KEY)? else {
            return Ok(Cookie::new());
        };
        match serde_json::from_str(&raw) {
            Ok(cookie) => Ok(cookie),
            Err(e) => {
                tracing::warn!(error = %e, "Stored cookie is not a string map, ignoring it");
                Ok(Cookie::new())
            }
        }
    }

    /// Replace the stored session cookie
    pub fn set_cookie(&self, cookie: &Cookie) -> Result<(), DatabaseError> {
        // A string map always serializes
        let raw = serde_json::to_string(cookie).unwrap_or_else(|_| "{}".to_string());
        self.set(COOKIE_KEY, &raw)
    }
}
