//! Completed focus sessions.
//!
//! A [`FocusSession`] is an immutable historical fact: one per Work phase
//! that ran to natural completion. Sessions are only ever deleted in bulk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    /// Configured Work duration at the moment of completion, in minutes.
    pub duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
    /// Distinguishes full completion from abandonment.
    #[serde(default = "default_true")]
    pub is_completed: bool,
}

fn default_true() -> bool {
    true
}

impl FocusSession {
    /// A fully completed session.
    pub fn completed(duration_minutes: u32, completed_at: DateTime<Utc>) -> Self {
        Self {
            duration_minutes,
            completed_at,
            is_completed: true,
        }
    }

    /// Minutes this session contributes to goals (0 unless completed).
    pub fn credited_minutes(&self) -> u32 {
        if self.is_completed {
            self.duration_minutes
        } else {
            0
        }
    }
}
