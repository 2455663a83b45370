//! Daily goal progress.
//!
//! A [`Goal`] is derived, never stored: for one calendar day it pairs the
//! configured target with the minutes of completed sessions that fell on
//! that day. Inactive days have a zero target and count as rest days.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TimerConfiguration;
use crate::session::FocusSession;

/// Progress at which an active day counts toward a streak.
pub const STREAK_THRESHOLD: f64 = 0.8;
/// Progress at which an active day's goal is met.
pub const GOAL_MET_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Inactive day, no target.
    Rest,
    Met,
    /// Not met, but enough for the streak.
    Qualifying,
    Behind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub date: NaiveDate,
    pub target_minutes: u32,
    pub completed_minutes: u32,
}

impl Goal {
    pub fn is_rest_day(&self) -> bool {
        self.target_minutes == 0
    }

    /// `completed / target`, or 0 on rest days. Not clamped.
    pub fn progress(&self) -> f64 {
        if self.is_rest_day() {
            return 0.0;
        }
        self.completed_minutes as f64 / self.target_minutes as f64
    }

    pub fn completed_hours(&self) -> f64 {
        self.completed_minutes as f64 / 60.0
    }

    pub fn target_hours(&self) -> f64 {
        self.target_minutes as f64 / 60.0
    }

    pub fn status(&self) -> GoalStatus {
        if self.is_rest_day() {
            return GoalStatus::Rest;
        }
        let progress = self.progress();
        if progress >= GOAL_MET_THRESHOLD {
            GoalStatus::Met
        } else if progress >= STREAK_THRESHOLD {
            GoalStatus::Qualifying
        } else {
            GoalStatus::Behind
        }
    }

    pub fn is_met(&self) -> bool {
        self.status() == GoalStatus::Met
    }

    /// Active day with progress at or above [`STREAK_THRESHOLD`].
    pub fn qualifies_for_streak(&self) -> bool {
        matches!(self.status(), GoalStatus::Met | GoalStatus::Qualifying)
    }
}

/// Pure goal computations over a session log.
///
/// Calendar days are taken in `Tz`; [`GoalAnalyzer::new`] uses the host's
/// local zone.
#[derive(Debug, Clone)]
pub struct GoalAnalyzer<'a, Tz: TimeZone = Local> {
    pub(crate) config: &'a TimerConfiguration,
    tz: Tz,
}

impl<'a> GoalAnalyzer<'a, Local> {
    pub fn new(config: &'a TimerConfiguration) -> Self {
        Self { config, tz: Local }
    }
}

impl<'a, Tz: TimeZone> GoalAnalyzer<'a, Tz> {
    pub fn with_timezone(config: &'a TimerConfiguration, tz: Tz) -> Self {
        Self { config, tz }
    }

    pub fn config(&self) -> &TimerConfiguration {
        self.config
    }

    /// Calendar day of `at` in the analyzer's zone.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.tz).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    /// UTC range `[start, end)` covering `date`, for `SessionStore::query_range`.
    pub fn day_bounds(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.start_of_day(date),
            self.start_of_day(date + Duration::days(1)),
        )
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        self.tz
            .from_local_datetime(&midnight)
            .earliest()
            // Midnight skipped by a DST jump: the day starts an hour later.
            .or_else(|| {
                self.tz
                    .from_local_datetime(&(midnight + Duration::hours(1)))
                    .earliest()
            })
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    }

    /// Goal for `date`, counting only completed sessions on that day.
    pub fn goal_for(&self, date: NaiveDate, sessions: &[FocusSession]) -> Goal {
        let completed_minutes = sessions
            .iter()
            .filter(|s| s.is_completed && self.local_date(s.completed_at) == date)
            .map(|s| s.duration_minutes)
            .sum();
        self.goal_from_minutes(date, completed_minutes)
    }

    /// The 7 days ending at `end`, oldest first.
    pub fn week(&self, end: NaiveDate, sessions: &[FocusSession]) -> Vec<Goal> {
        let daily = self.daily_minutes(sessions);
        (0..7)
            .rev()
            .map(|back| {
                let date = end - Duration::days(back);
                self.goal_from_minutes(date, daily.get(&date).copied().unwrap_or(0))
            })
            .collect()
    }

    /// Completed minutes per local day, for days that have any.
    pub fn daily_minutes(&self, sessions: &[FocusSession]) -> BTreeMap<NaiveDate, u32> {
        let mut daily = BTreeMap::new();
        for session in sessions.iter().filter(|s| s.is_completed) {
            *daily.entry(self.local_date(session.completed_at)).or_insert(0) +=
                session.duration_minutes;
        }
        daily
    }

    /// Number of active days whose goal was met.
    pub fn goals_met_count(&self, sessions: &[FocusSession]) -> u32 {
        self.daily_minutes(sessions)
            .into_iter()
            .filter(|(date, minutes)| self.goal_from_minutes(*date, *minutes).is_met())
            .count() as u32
    }

    pub(crate) fn goal_from_minutes(&self, date: NaiveDate, completed_minutes: u32) -> Goal {
        Goal {
            date,
            target_minutes: self.config.target_minutes_for(date),
            completed_minutes,
        }
    }
}
