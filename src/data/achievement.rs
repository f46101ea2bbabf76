//! Achievement data access object

use super::database::{lock, DatabaseError};
use super::models::{AchievementOverview, AchievementRecord, AchievementStatus};
use chrono::Utc;
use rusqlite::types::{FromSqlError, Type};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// Data access object for achievement progress
#[derive(Clone)]
pub struct AchievementStore {
    conn: Arc<Mutex<Connection>>,
}

impl AchievementStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Get an achievement by id
    pub fn get(&self, id: i64) -> Result<Option<AchievementRecord>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, status, progress, completed_at FROM achievements WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    /// Insert a new achievement row
    pub fn insert(&self, record: &AchievementRecord) -> Result<(), DatabaseError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO achievements (id, status, progress, completed_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.status.as_i64(),
                record.progress,
                record.completed_at,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Overwrite the progress of an existing achievement
    pub fn update(&self, record: &AchievementRecord) -> Result<(), DatabaseError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "UPDATE achievements SET status = ?2, progress = ?3, completed_at = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                record.id,
                record.status.as_i64(),
                record.progress,
                record.completed_at,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All achievements that are completed or have any progress, by id
    pub fn list_progressed(&self) -> Result<Vec<AchievementRecord>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, status, progress, completed_at FROM achievements
             WHERE status > ?1 OR progress > 0
             ORDER BY id",
        )?;
        let records = stmt
            .query_map(params![AchievementStatus::Locked.as_i64()], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Count achievements by state
    pub fn overview(&self) -> Result<AchievementOverview, DatabaseError> {
        let conn = lock(&self.conn)?;
        let overview = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN status = ?1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN status = ?2 THEN 1 ELSE 0 END), 0)
             FROM achievements",
            params![
                AchievementStatus::InProgress.as_i64(),
                AchievementStatus::Completed.as_i64()
            ],
            |row| {
                Ok(AchievementOverview {
                    total: row.get(0)?,
                    in_progress: row.get(1)?,
                    completed: row.get(2)?,
                })
            },
        )?;
        Ok(overview)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<AchievementRecord> {
        let raw_status: i64 = row.get(1)?;
        let status = AchievementStatus::from_i64(raw_status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Integer,
                Box::new(FromSqlError::OutOfRange(raw_status)),
            )
        })?;
        Ok(AchievementRecord {
            id: row.get(0)?,
            status,
            progress: row.get(2)?,
            completed_at: row.get(3)?,
        })
    }
}
