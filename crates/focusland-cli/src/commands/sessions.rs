use chrono::Duration;
use clap::Subcommand;
use focusland_core::{Config, GoalAnalyzer, SessionDatabase, SessionStore};
use serde_json::json;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List sessions from the last N local days, today included
    List {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Delete every recorded session
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: SessionsAction) -> CmdResult {
    let db = SessionDatabase::open_default()?;

    match action {
        SessionsAction::List { days } => {
            let config = Config::load()?;
            let analyzer = GoalAnalyzer::new(&config.timer);
            let today = analyzer.today();
            let first = today
                .checked_sub_signed(Duration::days(i64::from(days.max(1)) - 1))
                .ok_or_else(|| format!("--days {days} reaches past the earliest supported date"))?;
            let (start, _) = analyzer.day_bounds(first);
            let (_, end) = analyzer.day_bounds(today);
            print_json(&db.query_range(start, end)?)?;
        }
        SessionsAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete sessions without --yes".into());
            }
            let deleted = db.delete_all()?;
            print_json(&json!({ "deleted": deleted }))?;
        }
    }
    Ok(())
}
