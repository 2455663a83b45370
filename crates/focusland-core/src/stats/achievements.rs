//! Achievement milestones.
//!
//! Unlock state is never stored. Every query joins the static catalog with
//! the current [`AggregateStats`], so an achievement is unlocked exactly when
//! today's history supports it.

use serde::Serialize;

use super::aggregate::AggregateStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    /// Current streak, in days.
    Streak,
    /// Total completed focus hours.
    Hours,
    SessionCount,
    GoalsCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub requirement: u32,
    pub category: AchievementCategory,
}

pub const CATALOG: &[Achievement] = &[
    Achievement {
        id: "streak3",
        title: "Getting Started",
        description: "Maintain a 3-day focus streak",
        requirement: 3,
        category: AchievementCategory::Streak,
    },
    Achievement {
        id: "streak7",
        title: "Focus Master",
        description: "Maintain a 7-day focus streak",
        requirement: 7,
        category: AchievementCategory::Streak,
    },
    Achievement {
        id: "hours10",
        title: "Time Warrior",
        description: "Complete 10 hours of focused work",
        requirement: 10,
        category: AchievementCategory::Hours,
    },
    Achievement {
        id: "hours50",
        title: "Focus Champion",
        description: "Complete 50 hours of focused work",
        requirement: 50,
        category: AchievementCategory::Hours,
    },
    Achievement {
        id: "sessions10",
        title: "Warming Up",
        description: "Complete 10 focus sessions",
        requirement: 10,
        category: AchievementCategory::SessionCount,
    },
    Achievement {
        id: "sessions100",
        title: "Centurion",
        description: "Complete 100 focus sessions",
        requirement: 100,
        category: AchievementCategory::SessionCount,
    },
    Achievement {
        id: "goals5",
        title: "Goal Getter",
        description: "Complete daily goals 5 times",
        requirement: 5,
        category: AchievementCategory::GoalsCompleted,
    },
    Achievement {
        id: "goals20",
        title: "Goal Master",
        description: "Complete daily goals 20 times",
        requirement: 20,
        category: AchievementCategory::GoalsCompleted,
    },
];

/// An achievement joined with current stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub achievement: Achievement,
    /// The stat measured against `requirement`.
    pub current: f64,
    /// In `[0, 1]`.
    pub progress: f64,
    pub is_unlocked: bool,
}

impl AchievementStatus {
    pub fn evaluate(achievement: Achievement, stats: &AggregateStats) -> Self {
        let current = stats.value_for(achievement.category);
        let requirement = f64::from(achievement.requirement);
        let progress = if achievement.requirement == 0 {
            1.0
        } else {
            (current / requirement).clamp(0.0, 1.0)
        };
        Self {
            achievement,
            current,
            progress,
            is_unlocked: current >= requirement,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AchievementTracker {
    catalog: Vec<Achievement>,
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementTracker {
    /// Tracker over the built-in [`CATALOG`].
    pub fn new() -> Self {
        Self::with_catalog(CATALOG.to_vec())
    }

    pub fn with_catalog(catalog: Vec<Achievement>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[Achievement] {
        &self.catalog
    }

    /// Every achievement, in catalog order.
    pub fn evaluate(&self, stats: &AggregateStats) -> Vec<AchievementStatus> {
        self.catalog
            .iter()
            .map(|a| AchievementStatus::evaluate(*a, stats))
            .collect()
    }

    pub fn unlocked(&self, stats: &AggregateStats) -> Vec<AchievementStatus> {
        self.evaluate(stats)
            .into_iter()
            .filter(|s| s.is_unlocked)
            .collect()
    }

    /// The locked achievement closest to unlocking. Ties go to catalog order.
    pub fn next_milestone(&self, stats: &AggregateStats) -> Option<AchievementStatus> {
        self.evaluate(stats)
            .into_iter()
            .filter(|s| !s.is_unlocked)
            .fold(None, |best: Option<AchievementStatus>, s| match best {
                Some(b) if b.progress >= s.progress => Some(b),
                _ => Some(s),
            })
    }
}
