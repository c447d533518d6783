use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::check_range;
use crate::date::DateKey;
use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub id: String,
    pub date: DateKey,
    pub prompt_type: Option<String>,
    pub content: Option<String>,
    pub law_ref: Option<String>,
    pub pattern_tag: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReflection {
    pub date: DateKey,
    pub prompt_type: Option<String>,
    pub content: Option<String>,
    pub law_ref: Option<String>,
    pub pattern_tag: Option<String>,
}

/// Stored weekly review, one per user per week start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReview {
    pub id: String,
    pub week_start: DateKey,
    #[serde(flatten)]
    pub fields: WeeklyReviewInput,
}

/// Weekly review fields. Unset fields keep their stored value on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReviewInput {
    pub wins: Option<String>,
    pub patterns: Option<String>,
    /// Percentage, 0..=100
    pub protocol_score: Option<u32>,
    /// Percentage, 0..=100
    pub habit_score: Option<u32>,
    pub mastery_hours: Option<f64>,
    pub creative_output: Option<String>,
    pub strategic_lesson: Option<String>,
    pub identity_evolution: Option<String>,
}

impl WeeklyReviewInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("protocol_score", self.protocol_score.map(i64::from), 0, 100)?;
        check_range("habit_score", self.habit_score.map(i64::from), 0, 100)?;
        match self.mastery_hours {
            Some(h) if !h.is_finite() || h < 0.0 => Err(ValidationError::InvalidValue {
                field: "mastery_hours".into(),
                message: format!("{h} is not a non-negative number of hours"),
            }),
            _ => Ok(()),
        }
    }
}
