//! Gacha record data access object

use super::database::{lock, DatabaseError};
use super::models::{GachaRecord, GACHA_TIME_FORMAT};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = "SELECT uid, id, gacha_type, uigf_gacha_type, item_id, name, item_type, rank_type, count, time
     FROM gacha_records";

/// Data access object for gacha history, keyed by (uid, id)
#[derive(Clone)]
pub struct GachaStore {
    conn: Arc<Mutex<Connection>>,
}

impl GachaStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Get a record by its natural key
    pub fn get(&self, uid: &str, id: &str) -> Result<Option<GachaRecord>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE uid = ?1 AND id = ?2"))?;
        let mut rows = stmt.query(params![uid, id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    /// Check whether a record exists without loading it
    pub fn exists(&self, uid: &str, id: &str) -> Result<bool, DatabaseError> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM gacha_records WHERE uid = ?1 AND id = ?2",
            params![uid, id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a record. Fails on a duplicate (uid, id).
    pub fn insert(&self, record: &GachaRecord) -> Result<(), DatabaseError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO gacha_records (uid, id, gacha_type, uigf_gacha_type, item_id, name, item_type, rank_type, count, time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.uid,
                record.id,
                record.gacha_type,
                record.uigf_gacha_type,
                record.item_id,
                record.name,
                record.item_type,
                record.rank_type,
                record.count,
                record.time_string(),
            ],
        )?;
        Ok(())
    }

    /// All records of one user in pull order
    pub fn list_by_uid(&self, uid: &str) -> Result<Vec<GachaRecord>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE uid = ?1 ORDER BY time, id"
        ))?;
        let records = stmt
            .query_map(params![uid], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Distinct user ids that own at least one record
    pub fn uid_list(&self) -> Result<Vec<String>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT DISTINCT uid FROM gacha_records ORDER BY uid")?;
        let uids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(uids)
    }

    /// Number of records per user
    pub fn count_by_uid(&self) -> Result<Vec<(String, i64)>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt =
            conn.prepare("SELECT uid, COUNT(*) FROM gacha_records GROUP BY uid ORDER BY uid")?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    /// Delete every record of one user, returning how many were removed
    pub fn delete_by_uid(&self, uid: &str) -> Result<usize, DatabaseError> {
        let conn = lock(&self.conn)?;
        let removed = conn.execute("DELETE FROM gacha_records WHERE uid = ?1", params![uid])?;
        Ok(removed)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<GachaRecord> {
        let time_str: String = row.get(9)?;
        let time = NaiveDateTime::parse_from_str(&time_str, GACHA_TIME_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

        Ok(GachaRecord {
            uid: row.get(0)?,
            id: row.get(1)?,
            gacha_type: row.get(2)?,
            uigf_gacha_type: row.get(3)?,
            item_id: row.get(4)?,
            name: row.get(5)?,
            item_type: row.get(6)?,
            rank_type: row.get(7)?,
            count: row.get(8)?,
            time,
        })
    }
}
