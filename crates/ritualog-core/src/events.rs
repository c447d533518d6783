use serde::{Deserialize, Serialize};

use crate::date::DateKey;

/// Screens whose cached data a write can make stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Dashboard,
    Morning,
    Evening,
    Habits,
    Mastery,
    Protocols,
    Consumption,
    Creative,
    Reflections,
    Weekly,
}

/// Every write in the system produces an Event.
/// Front ends drain them and refresh the views they name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    MorningLogSaved { date: DateKey },
    EveningLogSaved { date: DateKey },
    HabitCreated { habit_id: String },
    HabitArchived { habit_id: String },
    HabitCompletionSet {
        habit_id: String,
        date: DateKey,
        completed: bool,
    },
    LifeTaskSet,
    SkillCreated { skill_id: String },
    SkillUpdated { skill_id: String },
    MasterySessionLogged {
        skill_id: String,
        date: DateKey,
        minutes: u32,
    },
    IdentityStatementAdded,
    SleepLogSaved { date: DateKey },
    WorkoutLogged { date: DateKey },
    ConsumptionLogSaved { date: DateKey },
    CreativeEntrySaved { date: DateKey },
    CreativeProjectCreated { project_id: String },
    QuickIdeaAdded,
    ReflectionSaved { date: DateKey },
    WeeklyReviewSaved { week_start: DateKey },
}

impl Event {
    /// Views to refresh after this event.
    pub fn invalidates(&self) -> &'static [View] {
        match self {
            Event::MorningLogSaved { .. } => &[View::Dashboard, View::Morning],
            Event::EveningLogSaved { .. } => &[View::Dashboard, View::Evening],
            Event::HabitCreated { .. } | Event::HabitArchived { .. } => &[View::Habits],
            Event::HabitCompletionSet { .. } => &[View::Habits, View::Dashboard],
            Event::LifeTaskSet
            | Event::SkillCreated { .. }
            | Event::SkillUpdated { .. } => &[View::Mastery],
            Event::MasterySessionLogged { .. } => &[View::Mastery, View::Dashboard],
            Event::IdentityStatementAdded => &[View::Reflections],
            Event::SleepLogSaved { .. } | Event::WorkoutLogged { .. } => &[View::Protocols],
            Event::ConsumptionLogSaved { .. } => &[View::Consumption],
            Event::CreativeEntrySaved { .. }
            | Event::CreativeProjectCreated { .. }
            | Event::QuickIdeaAdded => &[View::Creative],
            Event::ReflectionSaved { .. } => &[View::Reflections],
            Event::WeeklyReviewSaved { .. } => &[View::Weekly],
        }
    }
}
