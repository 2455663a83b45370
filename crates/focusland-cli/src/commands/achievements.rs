use clap::Args;
use focusland_core::{AchievementTracker, AggregateStats, GoalAnalyzer};

use super::{load_history, print_json, CmdResult};

#[derive(Args)]
pub struct AchievementsArgs {
    /// Only list unlocked achievements
    #[arg(long)]
    unlocked: bool,
    /// Only show the locked achievement closest to unlocking
    #[arg(long, conflicts_with = "unlocked")]
    next: bool,
}

pub fn run(args: AchievementsArgs) -> CmdResult {
    let (config, sessions) = load_history()?;
    let analyzer = GoalAnalyzer::new(&config.timer);
    let stats = AggregateStats::collect(&analyzer, analyzer.today(), &sessions);
    let tracker = AchievementTracker::new();

    if args.next {
        return print_json(&tracker.next_milestone(&stats));
    }
    if args.unlocked {
        return print_json(&tracker.unlocked(&stats));
    }
    print_json(&tracker.evaluate(&stats))
}
