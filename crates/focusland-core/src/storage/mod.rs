mod config;
pub mod database;
mod memory;
pub mod migrations;

pub use config::Config;
pub use database::SessionDatabase;
pub use memory::MemorySessionStore;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::session::FocusSession;

/// Append-only log of completed focus sessions.
///
/// Every call is atomic: a concurrent query never observes a partially
/// written session. Ranges are half-open, `[start, end)`, and results are
/// ordered by `completed_at`.
pub trait SessionStore: Send + Sync {
    /// Persist one session. Returns once the write is durable.
    fn append(&self, session: &FocusSession) -> Result<(), StoreError>;

    fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, StoreError>;

    /// Remove every session. Returns how many were deleted.
    fn delete_all(&self) -> Result<usize, StoreError>;

    fn all(&self) -> Result<Vec<FocusSession>, StoreError> {
        self.query_range(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn append(&self, session: &FocusSession) -> Result<(), StoreError> {
        (**self).append(session)
    }

    fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, StoreError> {
        (**self).query_range(start, end)
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        (**self).delete_all()
    }

    fn all(&self) -> Result<Vec<FocusSession>, StoreError> {
        (**self).all()
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn append(&self, session: &FocusSession) -> Result<(), StoreError> {
        (**self).append(session)
    }

    fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, StoreError> {
        (**self).query_range(start, end)
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        (**self).delete_all()
    }

    fn all(&self) -> Result<Vec<FocusSession>, StoreError> {
        (**self).all()
    }
}

/// Returns the Focusland data directory, creating it if needed.
///
/// `FOCUSLAND_HOME` overrides the location outright. Otherwise this is
/// `~/.config/focusland`, or `~/.config/focusland-dev` when
/// `FOCUSLAND_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FOCUSLAND_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSLAND_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusland-dev")
            } else {
                base_dir.join("focusland")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
