//! Multi-day goal streaks.
//!
//! A streak is a run of qualifying days (active, progress >= 0.8) ending at
//! the most recent one. It is only alive while that day is today or the
//! latest day that could have extended it.
//!
//! How inactive days sit between qualifying days depends on
//! [`RestDayPolicy`]: `Bridge` treats them as transparent, `Break` requires
//! strict calendar adjacency. With every weekday active the two agree.

use chrono::{Duration, NaiveDate, TimeZone};

use super::goal::GoalAnalyzer;
use crate::config::RestDayPolicy;
use crate::session::FocusSession;

impl<Tz: TimeZone> GoalAnalyzer<'_, Tz> {
    /// Qualifying days, oldest first.
    pub fn qualifying_days(&self, sessions: &[FocusSession]) -> Vec<NaiveDate> {
        self.daily_minutes(sessions)
            .into_iter()
            .filter(|(date, minutes)| self.goal_from_minutes(*date, *minutes).qualifies_for_streak())
            .map(|(date, _)| date)
            .collect()
    }

    /// Streak length as seen on `today`.
    ///
    /// A day with no sessions yet does not end the streak: three qualifying
    /// days ending yesterday still read 3 this morning.
    pub fn current_streak(&self, today: NaiveDate, sessions: &[FocusSession]) -> u32 {
        let mut days = self.qualifying_days(sessions);
        days.retain(|d| *d <= today);

        let Some(&latest) = days.last() else {
            return 0;
        };
        if latest != today && !self.continues(latest, today) {
            return 0;
        }

        let mut streak = 1;
        for pair in days.windows(2).rev() {
            if !self.continues(pair[0], pair[1]) {
                break;
            }
            streak += 1;
        }
        streak
    }

    /// Longest run of qualifying days anywhere in the log.
    pub fn longest_streak(&self, sessions: &[FocusSession]) -> u32 {
        let days = self.qualifying_days(sessions);
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for day in days {
            run = match previous {
                Some(prev) if self.continues(prev, day) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(day);
        }
        longest
    }

    /// Whether `later` extends a streak that reached `earlier`.
    fn continues(&self, earlier: NaiveDate, later: NaiveDate) -> bool {
        let gap = (later - earlier).num_days();
        if gap <= 0 {
            return false;
        }
        if gap == 1 {
            return true;
        }
        match self.config.rest_day_policy {
            RestDayPolicy::Break => false,
            // A gap spanning a full week must contain an active day.
            RestDayPolicy::Bridge if gap > 7 => false,
            RestDayPolicy::Bridge => {
                (1..gap).all(|i| !self.config.is_active_day(earlier + Duration::days(i)))
            }
        }
    }
}
