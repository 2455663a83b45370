pub mod achievements;
pub mod config;
pub mod sessions;
pub mod stats;
pub mod timer;

use focusland_core::{Config, FocusSession, SessionDatabase, SessionStore};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One compact JSON object per line, for streaming output.
pub fn print_json_line<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Config file plus the full session history from the default store.
pub fn load_history() -> Result<(Config, Vec<FocusSession>), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let sessions = SessionDatabase::open_default()?.all()?;
    Ok((config, sessions))
}
