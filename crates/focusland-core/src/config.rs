//! Timer configuration snapshot.
//!
//! [`TimerConfiguration`] is read fresh by the engine at every transition and
//! by the analyzers on every query. It is validated here, before it ever
//! reaches the engine: the engine assumes positive minute values.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MAX_DURATION_MIN: u32 = 240;
pub const MAX_POMODOROS_BEFORE_LONG_BREAK: u32 = 12;
pub const MAX_DAILY_GOAL_HOURS: f64 = 24.0;
pub const MAX_DAILY_GOAL_POMODOROS: u32 = 48;

/// Daily focus target, either in hours or in completed pomodoros.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "lowercase")]
pub enum DailyGoal {
    Hours(f64),
    Pomodoros(u32),
}

impl DailyGoal {
    /// Target minutes for an active day.
    pub fn target_minutes(&self, work_minutes: u32) -> u32 {
        match *self {
            DailyGoal::Hours(h) => (h * 60.0).round().max(0.0) as u32,
            DailyGoal::Pomodoros(n) => n.saturating_mul(work_minutes),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match *self {
            // Must round to at least one minute, or an active day would look like a rest day.
            DailyGoal::Hours(h) if !((h * 60.0).round() >= 1.0 && h <= MAX_DAILY_GOAL_HOURS) => {
                Err(format!(
                    "hours must be at least one minute and at most {MAX_DAILY_GOAL_HOURS}, got {h}"
                ))
            }
            DailyGoal::Pomodoros(n) if !(1..=MAX_DAILY_GOAL_POMODOROS).contains(&n) => Err(
                format!("pomodoros must be in 1..={MAX_DAILY_GOAL_POMODOROS}, got {n}"),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for DailyGoal {
    fn default() -> Self {
        DailyGoal::Hours(4.0)
    }
}

/// How inactive (rest) days interact with streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestDayPolicy {
    /// Rest days are transparent: they neither extend nor break a streak.
    #[default]
    Bridge,
    /// Only calendar-consecutive qualifying days count.
    Break,
}

/// Read-only settings snapshot consumed by the engine and the analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfiguration {
    /// Minutes.
    pub work_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    pub pomodoros_before_long_break: u32,
    pub daily_goal: DailyGoal,
    /// Weekday indices, 0 = Sunday.
    pub active_days: BTreeSet<u8>,
    pub auto_start_next_session: bool,
    /// Use `short_work_duration` in place of `work_duration`.
    pub short_work_mode: bool,
    pub short_work_duration: u32,
    pub can_skip_breaks: bool,
    pub rest_day_policy: RestDayPolicy,
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            pomodoros_before_long_break: 4,
            daily_goal: DailyGoal::default(),
            active_days: (1..=5).collect(),
            auto_start_next_session: false,
            short_work_mode: false,
            short_work_duration: 5,
            can_skip_breaks: true,
            rest_day_policy: RestDayPolicy::default(),
        }
    }
}

impl TimerConfiguration {
    /// Work phase length in minutes, honoring short-work mode.
    pub fn effective_work_minutes(&self) -> u32 {
        if self.short_work_mode {
            self.short_work_duration
        } else {
            self.work_duration
        }
    }

    pub fn is_active_day(&self, date: NaiveDate) -> bool {
        self.active_days.contains(&weekday_index(date))
    }

    /// Goal target for `date`; 0 on inactive days.
    pub fn target_minutes_for(&self, date: NaiveDate) -> u32 {
        if self.is_active_day(date) {
            self.daily_goal.target_minutes(self.effective_work_minutes())
        } else {
            0
        }
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.violations().into_iter().next() {
            Some((key, message)) => Err(ConfigError::InvalidValue {
                key: format!("timer.{key}"),
                message,
            }),
            None => Ok(()),
        }
    }

    /// Replace every invalid field with its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (key, message) in self.violations() {
            tracing::warn!(key, %message, "invalid timer setting, using default");
            match key {
                "work_duration" => self.work_duration = defaults.work_duration,
                "short_break_duration" => self.short_break_duration = defaults.short_break_duration,
                "long_break_duration" => self.long_break_duration = defaults.long_break_duration,
                "pomodoros_before_long_break" => {
                    self.pomodoros_before_long_break = defaults.pomodoros_before_long_break
                }
                "short_work_duration" => self.short_work_duration = defaults.short_work_duration,
                "daily_goal" => self.daily_goal = defaults.daily_goal,
                "active_days" => self.active_days.retain(|d| *d <= 6),
                _ => {}
            }
        }
        self
    }

    fn violations(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let durations = [
            ("work_duration", self.work_duration),
            ("short_break_duration", self.short_break_duration),
            ("long_break_duration", self.long_break_duration),
            ("short_work_duration", self.short_work_duration),
        ];
        for (key, value) in durations {
            if !(1..=MAX_DURATION_MIN).contains(&value) {
                out.push((key, format!("must be in 1..={MAX_DURATION_MIN} minutes, got {value}")));
            }
        }
        if !(1..=MAX_POMODOROS_BEFORE_LONG_BREAK).contains(&self.pomodoros_before_long_break) {
            out.push((
                "pomodoros_before_long_break",
                format!(
                    "must be in 1..={MAX_POMODOROS_BEFORE_LONG_BREAK}, got {}",
                    self.pomodoros_before_long_break
                ),
            ));
        }
        if let Err(message) = self.daily_goal.validate() {
            out.push(("daily_goal", message));
        }
        if let Some(bad) = self.active_days.iter().find(|d| **d > 6) {
            out.push(("active_days", format!("weekday index must be 0..=6, got {bad}")));
        }
        out
    }
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}
