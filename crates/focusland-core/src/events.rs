use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::FocusSession;
use crate::timer::Phase;

/// Every engine command produces an Event.
/// Front ends render from these instead of observing engine fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerToggled {
        is_running: bool,
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    BreakSkipped {
        from: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    /// A phase counted down to zero. `session` is set when a Work phase ended.
    PhaseCompleted {
        ended: Phase,
        next: Phase,
        session: Option<FocusSession>,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        seconds_remaining: u32,
        total_seconds: u32,
        is_running: bool,
        consecutive_work_periods: u32,
        pomodoro_number: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The phase that just ended, for completion events.
    pub fn completed_phase(&self) -> Option<Phase> {
        match self {
            Event::PhaseCompleted { ended, .. } => Some(*ended),
            _ => None,
        }
    }
}
