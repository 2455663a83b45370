//! # FocusLand Core Library
//!
//! This library provides the core logic for the FocusLand focus timer. The
//! CLI binary is a thin layer that wires a clock, a config file and an
//! on-disk store to the types defined here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-counting state machine over Work, ShortBreak and
//!   LongBreak phases. The caller delivers ticks; the engine never reads the
//!   wall clock except to timestamp completed sessions.
//! - **Storage**: the [`SessionStore`] trait with in-memory and SQLite
//!   implementations, plus TOML-based configuration.
//! - **Stats**: daily goals, streaks and achievements, computed on demand
//!   from the session log.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionDatabase`]: Session persistence
//! - [`GoalAnalyzer`]: Goal and streak queries
//! - [`AchievementTracker`]: Milestone evaluation
//! - [`Config`]: Application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use config::{DailyGoal, RestDayPolicy, TimerConfiguration};
pub use error::{ConfigError, CoreError, StoreError, UnsavedSession};
pub use events::Event;
pub use session::FocusSession;
pub use stats::{
    Achievement, AchievementCategory, AchievementStatus, AchievementTracker, AggregateStats,
    Goal, GoalAnalyzer, GoalStatus,
};
pub use storage::{Config, MemorySessionStore, SessionDatabase, SessionStore};
pub use timer::{Phase, TimerEngine, TimerState};
