//! In-process session store.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use super::SessionStore;
use crate::error::StoreError;
use crate::session::FocusSession;

/// Session store backed by a `RwLock<Vec<_>>`, kept sorted by completion time.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<Vec<FocusSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing history.
    pub fn with_sessions(mut sessions: Vec<FocusSession>) -> Self {
        sessions.sort_by_key(|s| s.completed_at);
        Self {
            sessions: RwLock::new(sessions),
        }
    }

    /// Number of stored sessions, read through a poisoned lock if need be.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn append(&self, session: &FocusSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        let at = sessions.partition_point(|s| s.completed_at <= session.completed_at);
        sessions.insert(at, session.clone());
        Ok(())
    }

    fn query_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusSession>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions
            .iter()
            .filter(|s| s.completed_at >= start && s.completed_at < end)
            .cloned()
            .collect())
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        let removed = sessions.len();
        sessions.clear();
        Ok(removed)
    }

    fn all(&self) -> Result<Vec<FocusSession>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions.clone())
    }
}
