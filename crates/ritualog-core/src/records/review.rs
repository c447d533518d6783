use serde::{Deserialize, Serialize};

use super::{
    CreativeEntry, DailyEntry, HabitCompletion, HabitCount, MasterySession, ProtocolScore,
    Reflection, SleepLog, WeeklyReview, WeeklyReviewInput, Workout,
};
use crate::date::DateKey;

/// A completion joined with the habit it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCompletion {
    #[serde(flatten)]
    pub completion: HabitCompletion,
    pub habit_name: String,
    pub identity_statement: Option<String>,
}

/// A mastery session joined with its skill name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySession {
    #[serde(flatten)]
    pub session: MasterySession,
    pub skill_name: String,
}

/// Everything logged on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: DateKey,
    pub entry: Option<DailyEntry>,
    pub completions: Vec<DayCompletion>,
    pub workouts: Vec<Workout>,
    pub sleep_log: Option<SleepLog>,
    pub reflections: Vec<Reflection>,
    pub creative_entries: Vec<CreativeEntry>,
    pub mastery_sessions: Vec<DaySession>,
}

/// Rolling progress over the last thirty days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub morning_streak: u32,
    pub evening_streak: u32,
    pub morning_total: u32,
    pub evening_total: u32,
    /// Distinct days with at least one completed habit.
    pub habit_days: u32,
    pub mastery_minutes: u32,
    /// Days with a daily entry.
    pub total_days: u32,
}

/// Inputs for the weekly review screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyOverview {
    pub week_start: DateKey,
    pub week_end: DateKey,
    pub mastery_hours: f64,
    pub protocol_score: ProtocolScore,
    /// Habit completion on the reference day.
    pub habit_count: HabitCount,
    pub existing_review: Option<WeeklyReview>,
}

impl WeeklyOverview {
    /// Review fields pre-filled with this week's computed scores.
    pub fn suggested_review(&self) -> WeeklyReviewInput {
        WeeklyReviewInput {
            protocol_score: Some(self.protocol_score.percent()),
            habit_score: Some(self.habit_count.percent()),
            mastery_hours: Some(self.mastery_hours),
            ..WeeklyReviewInput::default()
        }
    }
}
