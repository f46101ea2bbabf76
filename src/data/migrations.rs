//! Database migrations using a versioned migration pattern.
//!
//! Each migration runs exactly once and is tracked in the `schema_migrations` table.
//! Migrations are applied in order by version number.

use rusqlite::{params, Connection};

/// A database migration with a version number, name, and SQL to execute.
pub struct Migration {
    /// Unique version number (migrations run in order)
    pub version: i64,
    /// Human-readable name for the migration
    pub name: &'static str,
    /// SQL to execute (can be multiple statements)
    pub sql: &'static str,
}

/// All migrations in order. New migrations should be added at the end.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_achievements_table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS achievements (
                id INTEGER PRIMARY KEY,
                status INTEGER NOT NULL DEFAULT 0,
                progress INTEGER NOT NULL DEFAULT 0,
                completed_at INTEGER,
                updated_at TEXT NOT NULL
            );
        "#,
    },
    Migration {
        version: 2,
        name: "create_gacha_records_table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS gacha_records (
                uid TEXT NOT NULL,
                id TEXT NOT NULL,
                gacha_type TEXT NOT NULL,
                uigf_gacha_type TEXT NOT NULL,
                item_id TEXT,
                name TEXT NOT NULL,
                item_type TEXT NOT NULL,
                rank_type TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 1,
                time TEXT NOT NULL,
                PRIMARY KEY (uid, id)
            );
        "#,
    },
    Migration {
        version: 3,
        name: "create_spiral_abyss_table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS spiral_abyss (
                uid TEXT NOT NULL,
                id INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                total_battle_times INTEGER NOT NULL DEFAULT 0,
                total_win_times INTEGER NOT NULL DEFAULT 0,
                max_floor TEXT NOT NULL DEFAULT '',
                total_star INTEGER NOT NULL DEFAULT 0,
                is_unlock INTEGER NOT NULL DEFAULT 0,
                detail TEXT NOT NULL DEFAULT '{}',
                updated_at TEXT NOT NULL,
                PRIMARY KEY (uid, id)
            );
        "#,
    },
    Migration {
        version: 4,
        name: "create_app_data_table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS app_data (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#,
    },
    Migration {
        version: 5,
        name: "create_gacha_records_time_index",
        sql: "CREATE INDEX IF NOT EXISTS idx_gacha_records_uid_time ON gacha_records(uid, time);",
    },
];

/// Create the schema_migrations table if it doesn't exist.
fn ensure_migrations_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the set of already-applied migration versions.
fn get_applied_versions(conn: &Connection) -> rusqlite::Result<std::collections::HashSet<i64>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<std::collections::HashSet<i64>>>()?;
    Ok(versions)
}

/// Run all pending migrations.
pub fn run_migrations(conn: &mut Connection) -> rusqlite::Result<()> {
    ensure_migrations_table(conn)?;

    let applied = get_applied_versions(conn)?;

    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }

        tracing::info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        // Migration SQL and its bookkeeping row commit together
        let now = chrono::Utc::now().to_rfc3339();
        let tx = conn.transaction()?;
        let result = tx.execute_batch(migration.sql).and_then(|_| {
            tx.execute(
                "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
                params![migration.version, migration.name, now],
            )
        });
        if let Err(e) = result.and_then(|_| tx.commit()) {
            tracing::error!(
                version = migration.version,
                name = migration.name,
                error = %e,
                "Migration failed"
            );
            return Err(e);
        }

        tracing::info!(
            version = migration.version,
            name = migration.name,
            "Migration applied successfully"
        );
    }

    Ok(())
}
