pub mod config;
pub mod consumption;
pub mod creative;
pub mod day;
pub mod habit;
pub mod mastery;
pub mod prompt;
pub mod protocol;
pub mod reflect;
pub mod review;
pub mod streak;

use ritualog_core::{Config, Database, DateKey, UserId};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Options shared by every command.
pub struct Context {
    pub user: Option<String>,
}

/// An open journal for the resolved user.
pub struct Journal {
    pub db: Database,
    pub user: UserId,
    pub config: Config,
}

impl Context {
    /// Load the config file, falling back to defaults if it is unreadable.
    pub fn config(&self) -> Config {
        Config::load_or_default()
    }

    /// Resolve the user from `--user`, then `user.id`, and open the database.
    pub fn journal(&self) -> Result<Journal, Box<dyn std::error::Error>> {
        let config = self.config();
        let user = match &self.user {
            Some(id) => UserId::new(id.as_str())?,
            None => config.user_id()?,
        };
        let db = Database::open()?;
        tracing::debug!(%user, "journal opened");
        Ok(Journal { db, user, config })
    }
}

impl Journal {
    /// Log the views invalidated by this command's writes.
    pub fn finish(self) {
        for event in self.db.drain_events() {
            tracing::debug!(?event, views = ?event.invalidates(), "invalidate");
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `--date` when given, today otherwise.
pub fn day_or_today(date: Option<DateKey>) -> DateKey {
    date.unwrap_or_else(DateKey::today)
}
