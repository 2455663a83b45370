use std::time::Duration;

use clap::Subcommand;
use focusland_core::{
    Config, Event, MemorySessionStore, SessionDatabase, SessionStore, TimerConfiguration,
    TimerEngine,
};
use tokio::time::MissedTickBehavior;

use super::{print_json_line, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in real time, printing events as JSON lines
    Run {
        /// Phases to complete before exiting; each one is started automatically
        #[arg(long, default_value_t = 1)]
        phases: u32,
        /// Tick period in milliseconds
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },
    /// Drive the timer at full speed against a throwaway in-memory store
    Simulate {
        /// Phases to complete
        #[arg(long, default_value_t = 8)]
        phases: u32,
    },
}

pub fn run(action: TimerAction) -> CmdResult {
    match action {
        TimerAction::Run { phases, tick_ms } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_realtime(phases, Duration::from_millis(tick_ms.max(1))))
        }
        TimerAction::Simulate { phases } => simulate(phases),
    }
}

async fn run_realtime(phases: u32, period: Duration) -> CmdResult {
    let mut config = Config::load()?.timer;
    let mut engine = TimerEngine::new(&config, SessionDatabase::open_default()?);
    print_json_line(&engine.toggle_run())?;

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut completed = 0;
    while completed < phases {
        tokio::select! {
            _ = interval.tick() => {
                // Settings edited mid-phase apply from the next transition on.
                if engine.seconds_remaining() == 1 {
                    config = Config::load_or_default().timer;
                }
                if let Some(event) = tick_and_persist(&mut engine, &config)? {
                    print_json_line(&event)?;
                    completed += 1;
                    if completed < phases && !engine.is_running() {
                        print_json_line(&engine.toggle_run())?;
                    }
                }
            }
            _ = &mut ctrl_c => {
                if engine.is_running() {
                    print_json_line(&engine.toggle_run())?;
                }
                tracing::info!(
                    phase = engine.phase().label(),
                    seconds_remaining = engine.seconds_remaining(),
                    "interrupted, timer paused"
                );
                break;
            }
        }
    }
    Ok(())
}

/// Tick once, retrying the session append a single time if it failed.
fn tick_and_persist<S: SessionStore>(
    engine: &mut TimerEngine<S>,
    config: &TimerConfiguration,
) -> Result<Option<Event>, Box<dyn std::error::Error>> {
    match engine.tick(config) {
        Ok(event) => Ok(event),
        Err(unsaved) => {
            tracing::warn!(error = %unsaved, "retrying session append");
            engine.store().append(&unsaved.session)?;
            Ok(Some(unsaved.event))
        }
    }
}

fn simulate(phases: u32) -> CmdResult {
    let config = Config::load()?.timer;
    let store = MemorySessionStore::new();
    let mut engine = TimerEngine::new(&config, &store);

    let mut completed = 0;
    while completed < phases {
        if !engine.is_running() {
            engine.toggle_run();
        }
        if let Some(event) = engine.tick(&config)? {
            print_json_line(&event)?;
            completed += 1;
        }
    }

    let sessions = store.all()?;
    let focused_minutes: u32 = sessions.iter().map(|s| s.credited_minutes()).sum();
    print_json_line(&serde_json::json!({
        "type": "simulation_summary",
        "phases": completed,
        "sessions": sessions.len(),
        "focused_minutes": focused_minutes,
        "state": engine.state(),
    }))
}
