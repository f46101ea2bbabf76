//! Spiral abyss data access object

use super::database::{lock, DatabaseError};
use super::models::AbyssRecord;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// Result of writing one abyss row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Data access object for abyss schedules, keyed by (uid, id)
#[derive(Clone)]
pub struct AbyssStore {
    conn: Arc<Mutex<Connection>>,
}

impl AbyssStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub fn get(&self, uid: &str, id: i64) -> Result<Option<AbyssRecord>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT uid, id, start_time, end_time, total_battle_times, total_win_times, max_floor, total_star, is_unlock, detail
             FROM spiral_abyss WHERE uid = ?1 AND id = ?2",
        )?;
        let mut rows = stmt.query(params![uid, id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    /// Insert a schedule or replace the stored one with the same key
    pub fn upsert(&self, record: &AbyssRecord) -> Result<Upsert, DatabaseError> {
        let conn = lock(&self.conn)?;
        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM spiral_abyss WHERE uid = ?1 AND id = ?2",
            params![record.uid, record.id],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO spiral_abyss (uid, id, start_time, end_time, total_battle_times, total_win_times, max_floor, total_star, is_unlock, detail, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(uid, id) DO UPDATE SET
                start_time = ?3, end_time = ?4, total_battle_times = ?5, total_win_times = ?6,
                max_floor = ?7, total_star = ?8, is_unlock = ?9, detail = ?10, updated_at = ?11",
            params![
                record.uid,
                record.id,
                record.start_time,
                record.end_time,
                record.total_battle_times,
                record.total_win_times,
                record.max_floor,
                record.total_star,
                record.is_unlock,
                record.detail.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(if existing > 0 {
            Upsert::Updated
        } else {
            Upsert::Inserted
        })
    }

    /// All schedules grouped by user, newest schedule first
    pub fn list(&self) -> Result<Vec<AbyssRecord>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT uid, id, start_time, end_time, total_battle_times, total_win_times, max_floor, total_star, is_unlock, detail
             FROM spiral_abyss ORDER BY uid, id DESC",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn count(&self) -> Result<i64, DatabaseError> {
        let conn = lock(&self.conn)?;
        let count = conn.query_row("SELECT COUNT(*) FROM spiral_abyss", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<AbyssRecord> {
        let detail: String = row.get(9)?;
        let detail = serde_json::from_str(&detail)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;
        Ok(AbyssRecord {
            uid: row.get(0)?,
            id: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
            total_battle_times: row.get(4)?,
            total_win_times: row.get(5)?,
            max_floor: row.get(6)?,
            total_star: row.get(7)?,
            is_unlock: row.get(8)?,
            detail,
        })
    }
}
