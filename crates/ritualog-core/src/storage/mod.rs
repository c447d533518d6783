mod config;
pub mod consumption;
pub mod creative;
pub mod daily;
pub mod database;
pub mod habits;
pub mod mastery;
pub mod migrations;
pub mod protocols;
pub mod reflections;
pub mod review;

pub use config::{Config, PromptConfig, StreakConfig, UserConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `RITUALOG_HOME` names the directory outright. Otherwise it is
/// `~/.config/ritualog`, or `~/.config/ritualog-dev` when `RITUALOG_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("RITUALOG_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("RITUALOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("ritualog-dev")
            } else {
                base_dir.join("ritualog")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
