use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::check_clock;
use crate::date::DateKey;
use crate::error::ValidationError;

/// One row per user per day; the anchor for morning and evening logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntry {
    pub id: String,
    pub date: DateKey,
    pub morning_completed: bool,
    pub evening_completed: bool,
    pub created_at: DateTime<Utc>,
    pub morning_log: Option<MorningLog>,
    pub evening_log: Option<EveningLog>,
}

/// Morning ritual. Unset fields keep their stored value on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MorningLog {
    pub wake_time: Option<String>,
    pub sunlight_minutes: Option<u32>,
    pub caffeine_delayed_90min: Option<bool>,
    pub cold_exposure: Option<bool>,
    pub meditation_minutes: Option<u32>,
    pub exercise_done: Option<bool>,
    pub intention: Option<String>,
    pub identity_affirmation: Option<String>,
    pub creative_observation: Option<String>,
    pub top3: Option<String>,
}

impl MorningLog {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_clock("wake_time", self.wake_time.as_deref())
    }
}

/// Evening review. Unset fields keep their stored value on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EveningLog {
    pub wins: Option<String>,
    pub owned_failure: Option<String>,
    pub emotional_pattern: Option<String>,
    pub shadow_insight: Option<String>,
    pub creative_capture: Option<String>,
    pub tomorrow_focus: Option<String>,
    pub sleep_target_time: Option<String>,
}

impl EveningLog {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_clock("sleep_target_time", self.sleep_target_time.as_deref())
    }
}
