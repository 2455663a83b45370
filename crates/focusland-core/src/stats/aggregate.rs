//! Lifetime totals fed to the achievement tracker.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::achievements::AchievementCategory;
use super::goal::GoalAnalyzer;
use crate::session::FocusSession;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completed_hours: f64,
    pub total_completed_sessions: u32,
    pub goals_met_count: u32,
}

impl AggregateStats {
    /// Totals over `sessions` as of `today`. Abandoned sessions are skipped.
    pub fn collect<Tz: TimeZone>(
        analyzer: &GoalAnalyzer<'_, Tz>,
        today: NaiveDate,
        sessions: &[FocusSession],
    ) -> Self {
        let (minutes, count) = sessions
            .iter()
            .filter(|s| s.is_completed)
            .fold((0u64, 0u32), |(minutes, count), s| {
                (minutes + u64::from(s.duration_minutes), count + 1)
            });

        Self {
            current_streak: analyzer.current_streak(today, sessions),
            longest_streak: analyzer.longest_streak(sessions),
            total_completed_hours: minutes as f64 / 60.0,
            total_completed_sessions: count,
            goals_met_count: analyzer.goals_met_count(sessions),
        }
    }

    /// The statistic an achievement of `category` is measured against.
    pub fn value_for(&self, category: AchievementCategory) -> f64 {
        match category {
            AchievementCategory::Streak => f64::from(self.current_streak),
            AchievementCategory::Hours => self.total_completed_hours,
            AchievementCategory::SessionCount => f64::from(self.total_completed_sessions),
            AchievementCategory::GoalsCompleted => f64::from(self.goals_met_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DailyGoal, TimerConfiguration};
    use chrono::Utc;

    fn worked(d: u32, minutes: u32) -> FocusSession {
        FocusSession::completed(minutes, Utc.with_ymd_and_hms(2026, 3, d, 10, 0, 0).unwrap())
    }

    #[test]
    fn collect_sums_completed_sessions() {
        let cfg = TimerConfiguration {
            daily_goal: DailyGoal::Hours(1.0),
            ..Default::default()
        };
        let analyzer = GoalAnalyzer::with_timezone(&cfg, Utc);
        let mut abandoned = worked(4, 25);
        abandoned.is_completed = false;
        let sessions = vec![worked(2, 60), worked(3, 30), worked(3, 30), worked(4, 50), abandoned];

        let today = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let stats = AggregateStats::collect(&analyzer, today, &sessions);

        assert_eq!(stats.total_completed_sessions, 4);
        assert!((stats.total_completed_hours - 170.0 / 60.0).abs() < 1e-9);
        assert_eq!(stats.goals_met_count, 2);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn value_for_picks_matching_stat() {
        let stats = AggregateStats {
            current_streak: 2,
            longest_streak: 9,
            total_completed_hours: 1.5,
            total_completed_sessions: 4,
            goals_met_count: 1,
        };
        assert_eq!(stats.value_for(AchievementCategory::Streak), 2.0);
        assert_eq!(stats.value_for(AchievementCategory::Hours), 1.5);
        assert_eq!(stats.value_for(AchievementCategory::SessionCount), 4.0);
        assert_eq!(stats.value_for(AchievementCategory::GoalsCompleted), 1.0);
    }
}
