//! Creative practice: daily entries, projects and the quick-idea inbox.

use rusqlite::{params, Row};

use super::database::{new_id, now_rfc3339, parse_timestamp, Database};
use crate::date::DateKey;
use crate::error::Result;
use crate::events::Event;
use crate::records::{
    check_not_blank, CreativeEntry, CreativeProject, NewCreativeEntry, ProjectStatus,
    ProjectSummary, QuickIdea, UserId,
};

pub const RECENT_CREATIVE_LIMIT: u32 = 20;
pub const RECENT_IDEA_LIMIT: u32 = 30;

pub(crate) const CREATIVE_COLUMNS: &str =
    "id, date, prompt, content, medium, observations, created_at";

pub(crate) fn row_to_entry(row: &Row) -> rusqlite::Result<CreativeEntry> {
    let created_at: String = row.get(6)?;
    Ok(CreativeEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        prompt: row.get(2)?,
        content: row.get(3)?,
        medium: row.get(4)?,
        observations: row.get(5)?,
        created_at: parse_timestamp(&created_at),
    })
}

fn row_to_project(row: &Row) -> rusqlite::Result<CreativeProject> {
    let status: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(CreativeProject {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: ProjectStatus::from_db(&status),
        created_at: parse_timestamp(&created_at),
    })
}

impl Database {
    pub fn save_creative_entry(&self, user: &UserId, entry: &NewCreativeEntry) -> Result<CreativeEntry> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO creative_entries (
                id, user_id, date, prompt, content, medium, observations, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                user,
                entry.date,
                entry.prompt,
                entry.content,
                entry.medium,
                entry.observations,
                now_rfc3339(),
            ],
        )?;
        self.emit(Event::CreativeEntrySaved { date: entry.date });
        let stored = self.conn().query_row(
            &format!("SELECT {CREATIVE_COLUMNS} FROM creative_entries WHERE id = ?1"),
            params![id],
            row_to_entry,
        )?;
        Ok(stored)
    }

    /// Entries for one day, oldest first.
    pub fn creative_entries_for_date(&self, user: &UserId, date: DateKey) -> Result<Vec<CreativeEntry>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {CREATIVE_COLUMNS} FROM creative_entries
             WHERE user_id = ?1 AND date = ?2
             ORDER BY created_at ASC, rowid ASC"
        ))?;
        let entries = stmt
            .query_map(params![user, date], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn recent_creative_entries(&self, user: &UserId) -> Result<Vec<CreativeEntry>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {CREATIVE_COLUMNS} FROM creative_entries
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2"
        ))?;
        let entries = stmt
            .query_map(params![user, RECENT_CREATIVE_LIMIT], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Projects that are not archived, newest first, with their idea counts.
    pub fn list_creative_projects(&self, user: &UserId) -> Result<Vec<ProjectSummary>> {
        let mut stmt = self.conn().prepare(
            "SELECT p.id, p.title, p.description, p.status, p.created_at, COUNT(i.id)
             FROM creative_projects p
             LEFT JOIN quick_ideas i ON i.project_id = p.id
             WHERE p.user_id = ?1 AND p.status != 'archived'
             GROUP BY p.id
             ORDER BY p.created_at DESC, p.rowid DESC",
        )?;
        let projects = stmt
            .query_map(params![user], |row| {
                Ok(ProjectSummary {
                    project: row_to_project(row)?,
                    idea_count: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    pub fn create_creative_project(
        &self,
        user: &UserId,
        title: &str,
        description: Option<&str>,
    ) -> Result<CreativeProject> {
        check_not_blank("title", title)?;
        let id = new_id();
        self.conn().execute(
            "INSERT INTO creative_projects (id, user_id, title, description, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                user,
                title.trim(),
                description,
                ProjectStatus::Active.as_str(),
                now_rfc3339(),
            ],
        )?;
        self.emit(Event::CreativeProjectCreated {
            project_id: id.clone(),
        });
        let project = self.conn().query_row(
            "SELECT id, title, description, status, created_at FROM creative_projects WHERE id = ?1",
            params![id],
            row_to_project,
        )?;
        Ok(project)
    }

    /// Capture an idea, optionally filed under one of the user's projects.
    pub fn add_quick_idea(&self, user: &UserId, content: &str, project_id: Option<&str>) -> Result<()> {
        check_not_blank("content", content)?;
        if let Some(project_id) = project_id {
            self.ensure_owned("creative_projects", "creative project", user, project_id)?;
        }
        self.conn().execute(
            "INSERT INTO quick_ideas (id, user_id, content, project_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new_id(), user, content.trim(), project_id, now_rfc3339()],
        )?;
        self.emit(Event::QuickIdeaAdded);
        Ok(())
    }

    /// Newest ideas first, with the title of their project if any.
    pub fn recent_ideas(&self, user: &UserId) -> Result<Vec<QuickIdea>> {
        let mut stmt = self.conn().prepare(
            "SELECT i.id, i.content, i.project_id, p.title, i.created_at
             FROM quick_ideas i
             LEFT JOIN creative_projects p ON p.id = i.project_id
             WHERE i.user_id = ?1
             ORDER BY i.created_at DESC, i.rowid DESC
             LIMIT ?2",
        )?;
        let ideas = stmt
            .query_map(params![user, RECENT_IDEA_LIMIT], |row| {
                let created_at: String = row.get(4)?;
                Ok(QuickIdea {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    project_id: row.get(2)?,
                    project_title: row.get(3)?,
                    created_at: parse_timestamp(&created_at),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ideas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn setup() -> (Database, UserId) {
        (Database::open_memory().unwrap(), UserId::new("alice").unwrap())
    }

    fn entry(date: DateKey, content: &str) -> NewCreativeEntry {
        NewCreativeEntry {
            date,
            prompt: Some("Describe a sound you heard today in visual terms.".into()),
            content: Some(content.into()),
            medium: Some("writing".into()),
            observations: None,
        }
    }

    #[test]
    fn entries_by_date_are_oldest_first() {
        let (db, user) = setup();
        let day = DateKey::from_ymd(2024, 9, 1).unwrap();
        db.save_creative_entry(&user, &entry(day, "first")).unwrap();
        db.save_creative_entry(&user, &entry(day, "second")).unwrap();
        db.save_creative_entry(&user, &entry(day.add_days(1), "other")).unwrap();

        let contents: Vec<_> = db
            .creative_entries_for_date(&user, day)
            .unwrap()
            .into_iter()
            .filter_map(|e| e.content)
            .collect();
        assert_eq!(contents, vec!["first", "second"]);

        let recent = db.recent_creative_entries(&user).unwrap();
        assert_eq!(recent[0].content.as_deref(), Some("other"));
    }

    #[test]
    fn projects_count_their_ideas() {
        let (db, user) = setup();
        let novel = db.create_creative_project(&user, "Novel", Some("Draft one")).unwrap();
        db.create_creative_project(&user, "Album", None).unwrap();
        db.add_quick_idea(&user, "Open on a train", Some(&novel.id)).unwrap();
        db.add_quick_idea(&user, "Unreliable narrator", Some(&novel.id)).unwrap();
        db.add_quick_idea(&user, "Loose thought", None).unwrap();

        let projects = db.list_creative_projects(&user).unwrap();
        assert_eq!(projects.len(), 2);
        let novel_summary = projects.iter().find(|p| p.project.id == novel.id).unwrap();
        assert_eq!(novel_summary.idea_count, 2);
        assert_eq!(novel_summary.project.status, ProjectStatus::Active);

        let ideas = db.recent_ideas(&user).unwrap();
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].content, "Loose thought");
        assert!(ideas[0].project_title.is_none());
        assert_eq!(ideas[1].project_title.as_deref(), Some("Novel"));
    }

    #[test]
    fn archived_projects_are_hidden() {
        let (db, user) = setup();
        let project = db.create_creative_project(&user, "Old zine", None).unwrap();
        db.conn()
            .execute(
                "UPDATE creative_projects SET status = 'archived' WHERE id = ?1",
                params![project.id],
            )
            .unwrap();
        assert!(db.list_creative_projects(&user).unwrap().is_empty());
    }

    #[test]
    fn idea_for_foreign_project_is_rejected() {
        let (db, alice) = setup();
        let bob = UserId::new("bob").unwrap();
        let project = db.create_creative_project(&alice, "Film", None).unwrap();
        assert!(matches!(
            db.add_quick_idea(&bob, "Steal this", Some(&project.id)),
            Err(CoreError::NotFound { .. })
        ));
        assert!(db.recent_ideas(&bob).unwrap().is_empty());
    }
}
