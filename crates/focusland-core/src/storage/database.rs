//! SQLite-based session storage.
//!
//! Sessions live in the `focus_sessions` table. Timestamps are stored as
//! fixed-width RFC 3339 UTC text (nanosecond precision, `Z` suffix) so that
//! lexical order equals chronological order and range queries can use the
//! `completed_at` index.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};

use super::{data_dir, migrations, SessionStore};
use crate::error::StoreError;
use crate::session::FocusSession;

/// SQLite database for session storage.
///
/// The connection sits behind a mutex, so every store call is serialized and
/// atomic with respect to other threads sharing the same handle.
pub struct SessionDatabase {
    conn: Mutex<Connection>,
}

impl SessionDatabase {
    /// Open the database at `<data dir>/focusland.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Self::open(dir.join("focusland.db"))
    }

    /// Open (or create) a database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM focus_sessions", [], |row| {
            row.get::<_, u64>(0)
        })?;
        Ok(n)
    }

    fn collect(
        conn: &Connection,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<FocusSession>, StoreError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, read_row)?;
        let mut sessions = Vec::new();
        for row in rows {
            let (duration_minutes, completed_at, is_completed) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| StoreError::Corrupt(format!("{completed_at}: {e}")))?
                .with_timezone(&Utc);
            sessions.push(FocusSession {
                duration_minutes,
                completed_at,
                is_completed,
            });
        }
        Ok(sessions)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(u32, String, bool)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl SessionStore for SessionDatabase {
    fn append(&self, session: &FocusSession) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO focus_sessions (duration_minutes, completed_at, is_completed)
             VALUES (?1, ?2, ?3)",
            params![
                session.duration_minutes,
                encode_timestamp(session.completed_at),
                session.is_completed,
            ],
        )?;
        tracing::info!(
            duration_minutes = session.duration_minutes,
            completed_at = %session.completed_at,
            "focus session recorded"
        );
        Ok(())
    }

    fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, StoreError> {
        let conn = self.conn()?;
        Self::collect(
            &conn,
            "SELECT duration_minutes, completed_at, is_completed
             FROM focus_sessions
             WHERE completed_at >= ?1 AND completed_at < ?2
             ORDER BY completed_at, id",
            &[&encode_timestamp(start), &encode_timestamp(end)],
        )
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM focus_sessions", [])?;
        tracing::info!(removed, "focus session log cleared");
        Ok(removed)
    }

    fn all(&self) -> Result<Vec<FocusSession>, StoreError> {
        let conn = self.conn()?;
        Self::collect(
            &conn,
            "SELECT duration_minutes, completed_at, is_completed
             FROM focus_sessions
             ORDER BY completed_at, id",
            &[],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn record_and_query() {
        let db = SessionDatabase::open_memory().unwrap();
        db.append(&FocusSession::completed(25, at(2, 9))).unwrap();
        db.append(&FocusSession::completed(50, at(3, 9))).unwrap();

        let day_two = db.query_range(at(2, 0), at(3, 0)).unwrap();
        assert_eq!(day_two, vec![FocusSession::completed(25, at(2, 9))]);
        assert_eq!(db.count().unwrap(), 2);
    }

    #[test]
    fn range_ordering_survives_subsecond_timestamps() {
        let db = SessionDatabase::open_memory().unwrap();
        let base = at(2, 9);
        db.append(&FocusSession::completed(25, base + Duration::milliseconds(1500)))
            .unwrap();
        db.append(&FocusSession::completed(25, base)).unwrap();

        let hits = db.query_range(base, base + Duration::seconds(1)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].completed_at, base);
        assert_eq!(db.all().unwrap()[1].completed_at, base + Duration::milliseconds(1500));
    }

    #[test]
    fn subsecond_precision_is_kept_exactly() {
        let db = SessionDatabase::open_memory().unwrap();
        let written = FocusSession::completed(25, at(2, 9) + Duration::nanoseconds(123_456_789));
        db.append(&written).unwrap();

        assert_eq!(db.all().unwrap(), vec![written.clone()]);

        // Boundaries inside the same millisecond as the row still honour [start, end).
        let after = written.completed_at + Duration::microseconds(500);
        assert!(db.query_range(after, at(2, 10)).unwrap().is_empty());
        assert!(db
            .query_range(at(2, 9), written.completed_at)
            .unwrap()
            .is_empty());
        assert_eq!(
            db.query_range(written.completed_at, after).unwrap(),
            vec![written]
        );
    }

    #[test]
    fn abandoned_flag_roundtrips() {
        let db = SessionDatabase::open_memory().unwrap();
        let session = FocusSession {
            duration_minutes: 25,
            completed_at: at(2, 9),
            is_completed: false,
        };
        db.append(&session).unwrap();
        assert_eq!(db.all().unwrap(), vec![session]);
    }

    #[test]
    fn delete_all_empties_the_log() {
        let db = SessionDatabase::open_memory().unwrap();
        db.append(&FocusSession::completed(25, at(2, 9))).unwrap();
        db.append(&FocusSession::completed(25, at(2, 10))).unwrap();
        assert_eq!(db.delete_all().unwrap(), 2);
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn zero_duration_is_rejected_by_schema() {
        let db = SessionDatabase::open_memory().unwrap();
        let result = db.append(&FocusSession::completed(0, at(2, 9)));
        assert!(matches!(result, Err(StoreError::QueryFailed(_))));
    }

    #[test]
    fn reopening_a_file_keeps_sessions() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sessions.db");
        {
            let db = SessionDatabase::open(&path).unwrap();
            db.append(&FocusSession::completed(25, at(2, 9))).unwrap();
        }
        let db = SessionDatabase::open(&path).unwrap();
        assert_eq!(db.count().unwrap(), 1);
    }
}
