use serde::{Deserialize, Serialize};

use crate::config::TimerConfiguration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Phase length in minutes, re-derived from `config` on every call.
    pub fn duration_min(self, config: &TimerConfiguration) -> u32 {
        match self {
            Phase::Work => config.effective_work_minutes(),
            Phase::ShortBreak => config.short_break_duration,
            Phase::LongBreak => config.long_break_duration,
        }
    }

    /// Phase length in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(self, config: &TimerConfiguration) -> u32 {
        self.duration_min(config).saturating_mul(60)
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}
