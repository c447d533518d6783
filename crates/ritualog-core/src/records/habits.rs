use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_not_blank, check_range};
use crate::date::DateKey;
use crate::error::ValidationError;

/// A habit to build or break, described by its cue/craving/response/reward loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub identity_statement: Option<String>,
    pub cue: Option<String>,
    pub craving: Option<String>,
    pub response: Option<String>,
    pub reward: Option<String>,
    pub two_minute_version: Option<String>,
    pub frequency: String,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub identity_statement: Option<String>,
    pub cue: Option<String>,
    pub craving: Option<String>,
    pub response: Option<String>,
    pub reward: Option<String>,
    pub two_minute_version: Option<String>,
    /// Defaults to `daily`.
    pub frequency: Option<String>,
}

impl NewHabit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("name", &self.name)
    }
}

/// Completion of one habit on one day. Unique per (habit, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub id: String,
    pub habit_id: String,
    pub date: DateKey,
    pub completed: bool,
    pub satisfaction: Option<u8>,
}

pub(crate) fn validate_satisfaction(satisfaction: Option<u8>) -> Result<(), ValidationError> {
    check_range("satisfaction", satisfaction.map(i64::from), 1, 5)
}

/// A habit together with its state on a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitDayStatus {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed: bool,
    pub satisfaction: Option<u8>,
    pub completion_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCount {
    pub total: u32,
    pub done: u32,
}

impl HabitCount {
    /// Rounded completion percentage, 0 when there are no habits.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (f64::from(self.done) / f64::from(self.total) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds() {
        assert_eq!(HabitCount { total: 3, done: 2 }.percent(), 67);
        assert_eq!(HabitCount { total: 0, done: 0 }.percent(), 0);
    }

    #[test]
    fn satisfaction_is_one_to_five() {
        assert!(validate_satisfaction(Some(5)).is_ok());
        assert!(validate_satisfaction(Some(6)).is_err());
        assert!(validate_satisfaction(None).is_ok());
    }
}
