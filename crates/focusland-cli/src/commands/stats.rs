use clap::Subcommand;
use focusland_core::{AggregateStats, Goal, GoalAnalyzer};
use serde_json::json;

use super::{load_history, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's goal progress
    Today,
    /// The last seven days, oldest first
    Week,
    /// Current and longest streak
    Streak,
    /// Lifetime totals
    Summary,
}

fn goal_json(goal: &Goal) -> serde_json::Value {
    json!({
        "date": goal.date,
        "target_minutes": goal.target_minutes,
        "completed_minutes": goal.completed_minutes,
        "target_hours": goal.target_hours(),
        "completed_hours": goal.completed_hours(),
        "progress": goal.progress(),
        "status": goal.status(),
    })
}

pub fn run(action: StatsAction) -> CmdResult {
    let (config, sessions) = load_history()?;
    let analyzer = GoalAnalyzer::new(&config.timer);
    let today = analyzer.today();

    match action {
        StatsAction::Today => {
            print_json(&goal_json(&analyzer.goal_for(today, &sessions)))?;
        }
        StatsAction::Week => {
            let week: Vec<_> = analyzer.week(today, &sessions).iter().map(goal_json).collect();
            print_json(&week)?;
        }
        StatsAction::Streak => {
            print_json(&json!({
                "current": analyzer.current_streak(today, &sessions),
                "longest": analyzer.longest_streak(&sessions),
                "rest_day_policy": config.timer.rest_day_policy,
            }))?;
        }
        StatsAction::Summary => {
            print_json(&AggregateStats::collect(&analyzer, today, &sessions))?;
        }
    }
    Ok(())
}
