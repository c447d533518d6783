use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_not_blank, check_range};
use crate::date::DateKey;
use crate::error::ValidationError;

/// The user's current statement of purpose. Newest wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeTask {
    pub id: String,
    pub statement: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkillPhase {
    #[default]
    #[serde(rename = "Apprentice")]
    Apprentice,
    #[serde(rename = "Active Mastery")]
    ActiveMastery,
    #[serde(rename = "True Mastery")]
    TrueMastery,
}

impl SkillPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillPhase::Apprentice => "Apprentice",
            SkillPhase::ActiveMastery => "Active Mastery",
            SkillPhase::TrueMastery => "True Mastery",
        }
    }

    /// Stored phases outside the known set read back as apprentice.
    pub(crate) fn from_db(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SkillPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillPhase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "apprentice" => Ok(SkillPhase::Apprentice),
            "active mastery" | "active" => Ok(SkillPhase::ActiveMastery),
            "true mastery" | "true" => Ok(SkillPhase::TrueMastery),
            _ => Err(ValidationError::InvalidValue {
                field: "phase".into(),
                message: format!("unknown skill phase '{s}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub life_task_connection: Option<String>,
    pub phase: SkillPhase,
    pub created_at: DateTime<Utc>,
}

/// A skill with its practice totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSummary {
    #[serde(flatten)]
    pub skill: Skill,
    pub total_minutes: u32,
    pub session_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSkill {
    pub name: String,
    pub life_task_connection: Option<String>,
    pub phase: Option<SkillPhase>,
}

impl NewSkill {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillUpdate {
    pub name: Option<String>,
    pub phase: Option<SkillPhase>,
}

impl SkillUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => check_not_blank("name", name),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterySession {
    pub id: String,
    pub skill_id: String,
    pub date: DateKey,
    pub minutes: u32,
    pub breakthrough: Option<String>,
    pub obstacle: Option<String>,
    pub mentor_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMasterySession {
    pub skill_id: String,
    pub date: DateKey,
    pub minutes: u32,
    pub breakthrough: Option<String>,
    pub obstacle: Option<String>,
    pub mentor_notes: Option<String>,
}

impl NewMasterySession {
    pub fn validate(&self) -> Result<(), ValidationError> {
        // one day at most
        check_range("minutes", Some(i64::from(self.minutes)), 1, 1440)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityStatement {
    pub id: String,
    pub content: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
