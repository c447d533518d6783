//! # Ritualog Core Library
//!
//! This library provides the core logic for Ritualog, a personal journal for
//! daily rituals, habits, deliberate practice and reflection. Every operation
//! is available through the standalone `ritualog-cli` binary, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Streaks**: consecutive-day counting over completion dates, tolerant of
//!   the reference day still being open
//! - **Prompts**: deterministic day-of-year rotation over configurable prompt
//!   lists
//! - **Storage**: SQLite-backed journal records and TOML-based configuration
//! - **Events**: change notifications naming the views a write invalidates
//!
//! ## Key Components
//!
//! - [`StreakCalculator`]: streak counting with a configurable future-date policy
//! - [`PromptSelector`]: prompt-of-the-day selection
//! - [`Database`]: journal persistence, scoped per [`UserId`]
//! - [`Config`]: application configuration management

pub mod date;
pub mod error;
pub mod events;
pub mod prompts;
pub mod records;
pub mod storage;
pub mod streak;

pub use date::{minutes_to_hours, DateKey};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, View};
pub use prompts::{PromptCatalog, PromptSelector, ReflectionKind, ReflectionPrompt};
pub use records::UserId;
pub use storage::{Config, Database};
pub use streak::{compute_streak, FutureDatePolicy, StreakCalculator};
