//! Journal record types.
//!
//! Plain data carried between the storage layer and its callers. Inputs
//! for writes live next to the records they produce (`NewHabit` beside
//! `Habit` and so on) and validate themselves before any SQL runs.

pub mod consumption;
pub mod creative;
pub mod daily;
pub mod habits;
pub mod mastery;
pub mod protocols;
pub mod reflections;
pub mod review;

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};

pub use consumption::{ConsumptionLog, ConsumptionTrend};
pub use creative::{CreativeEntry, CreativeProject, NewCreativeEntry, ProjectStatus, ProjectSummary, QuickIdea};
pub use daily::{DailyEntry, EveningLog, MorningLog};
pub use habits::{Habit, HabitCompletion, HabitCount, HabitDayStatus, NewHabit};
pub use mastery::{
    IdentityStatement, LifeTask, MasterySession, NewMasterySession, NewSkill, Skill, SkillPhase,
    SkillSummary, SkillUpdate,
};
pub use protocols::{NewWorkout, ProtocolScore, SleepLog, TrainingAdaptation, Workout};
pub use reflections::{NewReflection, Reflection, WeeklyReview, WeeklyReviewInput};
pub use review::{DayCompletion, DaySession, DaySummary, ProgressStats, WeeklyOverview};

/// Identity of the journal owner, as handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Fails with [`CoreError::NotAuthenticated`] for a blank id.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CoreError::NotAuthenticated);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl rusqlite::ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

pub(crate) fn check_range(
    field: &'static str,
    value: Option<i64>,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < min || v > max => Err(ValidationError::OutOfRange {
            field,
            value: v,
            min,
            max,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn check_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

/// Clock times are entered as `HH:MM`.
pub(crate) fn check_clock(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if NaiveTime::parse_from_str(v, "%H:%M").is_err() => {
            Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("'{v}' is not an HH:MM time"),
            })
        }
        _ => Ok(()),
    }
}
