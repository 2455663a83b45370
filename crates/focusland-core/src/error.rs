//! Core error types for focusland-core.
//!
//! Three families, matching how callers are expected to react:
//! - [`ConfigError`]: bad or unreadable configuration. Loading never fails on
//!   an out-of-range value (fields fall back to defaults); only `set` rejects.
//! - [`StoreError`]: session persistence failures, always recoverable.
//! - [`UnsavedSession`]: a Work phase completed but its session could not be
//!   appended. The timer has already moved on; the caller owns the retry.

use std::path::PathBuf;
use thiserror::Error;

use crate::events::Event;
use crate::session::FocusSession;

/// Core error type for focusland-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open session store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked by another writer
    #[error("Session store is locked")]
    Locked,

    /// A thread panicked while holding the store lock
    #[error("Session store lock poisoned")]
    Poisoned,

    /// A stored row could not be decoded
    #[error("Corrupt session row: {0}")]
    Corrupt(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// A completed Work phase whose session was not persisted.
///
/// Returned by [`crate::TimerEngine::tick`]. The phase transition has already
/// been applied; `event` is what the tick would have returned on success.
#[derive(Error, Debug)]
#[error("focus session completed at {} was not saved: {source}", .session.completed_at)]
pub struct UnsavedSession {
    pub event: Event,
    pub session: FocusSession,
    #[source]
    pub source: StoreError,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg)
                if matches!(
                    code.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                StoreError::Locked
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
