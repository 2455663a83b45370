//! Statistics module for FocusLand
//!
//! Everything here is a pure function of a session log and a
//! [`TimerConfiguration`](crate::config::TimerConfiguration) snapshot:
//! daily goals, streaks, lifetime totals and achievement milestones.
//! Nothing is cached or written back.

mod achievements;
mod aggregate;
mod goal;
mod streak;

pub use achievements::{
    Achievement, AchievementCategory, AchievementStatus, AchievementTracker, CATALOG,
};
pub use aggregate::AggregateStats;
pub use goal::{Goal, GoalAnalyzer, GoalStatus, GOAL_MET_THRESHOLD, STREAK_THRESHOLD};
