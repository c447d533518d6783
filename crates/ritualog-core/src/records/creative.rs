use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::DateKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeEntry {
    pub id: String,
    pub date: DateKey,
    pub prompt: Option<String>,
    pub content: Option<String>,
    pub medium: Option<String>,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCreativeEntry {
    pub date: DateKey,
    pub prompt: Option<String>,
    pub content: Option<String>,
    pub medium: Option<String>,
    pub observations: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
        }
    }

    pub(crate) fn from_db(raw: &str) -> Self {
        match raw {
            "archived" => ProjectStatus::Archived,
            _ => ProjectStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeProject {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: CreativeProject,
    pub idea_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickIdea {
    pub id: String,
    pub content: String,
    pub project_id: Option<String>,
    pub project_title: Option<String>,
    pub created_at: DateTime<Utc>,
}
