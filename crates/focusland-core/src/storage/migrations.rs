//! Database schema migrations for the session store.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: the session log.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS focus_sessions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            completed_at     TEXT NOT NULL
        );",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: completion flag and range index.
///
/// Rows written before v2 only ever recorded natural completions, so they
/// are backfilled as completed.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "ALTER TABLE focus_sessions ADD COLUMN is_completed INTEGER NOT NULL DEFAULT 1;
         CREATE INDEX IF NOT EXISTS idx_focus_sessions_completed_at
             ON focus_sessions(completed_at);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: nanosecond timestamps.
///
/// Older rows were written as `YYYY-MM-DDTHH:MM:SS.mmmZ`. They are padded to
/// nine fractional digits so every row has the same width and text order
/// stays time order.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE focus_sessions
         SET completed_at = substr(completed_at, 1, 23) || '000000Z'
         WHERE length(completed_at) = 24 AND substr(completed_at, 20, 1) = '.'",
        [],
    )?;
    set_schema_version(&tx, 3)?;
    tx.commit()
}
