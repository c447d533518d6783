//! Life task, skills, practice sessions and identity statements.

use rusqlite::{params, OptionalExtension, Row};

use super::database::{new_id, now_rfc3339, parse_timestamp, Database};
use crate::date::DateKey;
use crate::error::Result;
use crate::events::Event;
use crate::records::{
    IdentityStatement, LifeTask, MasterySession, NewMasterySession, NewSkill, Skill, SkillPhase,
    SkillSummary, SkillUpdate, UserId,
};

pub const SKILL_SESSION_LIMIT: u32 = 20;

pub(crate) const SESSION_COLUMNS: &str =
    "s.id, s.skill_id, s.date, s.minutes, s.breakthrough, s.obstacle, s.mentor_notes, s.created_at";

pub(crate) fn row_to_session(row: &Row) -> rusqlite::Result<MasterySession> {
    let created_at: String = row.get(7)?;
    Ok(MasterySession {
        id: row.get(0)?,
        skill_id: row.get(1)?,
        date: row.get(2)?,
        minutes: row.get(3)?,
        breakthrough: row.get(4)?,
        obstacle: row.get(5)?,
        mentor_notes: row.get(6)?,
        created_at: parse_timestamp(&created_at),
    })
}

fn row_to_skill(row: &Row) -> rusqlite::Result<Skill> {
    let phase: Option<String> = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        life_task_connection: row.get(2)?,
        phase: SkillPhase::from_db(phase.as_deref()),
        created_at: parse_timestamp(&created_at),
    })
}

impl Database {
    /// The most recently stated life task.
    pub fn get_life_task(&self, user: &UserId) -> Result<Option<LifeTask>> {
        let task = self
            .conn()
            .query_row(
                "SELECT id, statement, created_at FROM life_tasks
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT 1",
                params![user],
                |row| {
                    let created_at: String = row.get(2)?;
                    Ok(LifeTask {
                        id: row.get(0)?,
                        statement: row.get(1)?,
                        created_at: parse_timestamp(&created_at),
                    })
                },
            )
            .optional()?;
        Ok(task)
    }

    /// Record a new life task statement; earlier ones are kept as history.
    pub fn set_life_task(&self, user: &UserId, statement: &str) -> Result<()> {
        crate::records::check_not_blank("statement", statement)?;
        self.conn().execute(
            "INSERT INTO life_tasks (id, user_id, statement, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![new_id(), user, statement.trim(), now_rfc3339()],
        )?;
        self.emit(Event::LifeTaskSet);
        Ok(())
    }

    /// Skills in creation order with their practice totals.
    pub fn list_skills(&self, user: &UserId) -> Result<Vec<SkillSummary>> {
        let mut stmt = self.conn().prepare(
            "SELECT k.id, k.name, k.life_task_connection, k.phase, k.created_at,
                    COALESCE(SUM(s.minutes), 0), COUNT(s.id)
             FROM skills k
             LEFT JOIN mastery_sessions s ON s.skill_id = k.id
             WHERE k.user_id = ?1
             GROUP BY k.id
             ORDER BY k.created_at ASC, k.rowid ASC",
        )?;
        let skills = stmt
            .query_map(params![user], |row| {
                Ok(SkillSummary {
                    skill: row_to_skill(row)?,
                    total_minutes: row.get(5)?,
                    session_count: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(skills)
    }

    pub fn get_skill(&self, user: &UserId, skill_id: &str) -> Result<Skill> {
        self.ensure_owned("skills", "skill", user, skill_id)?;
        let skill = self.conn().query_row(
            "SELECT id, name, life_task_connection, phase, created_at FROM skills WHERE id = ?1",
            params![skill_id],
            row_to_skill,
        )?;
        Ok(skill)
    }

    pub fn create_skill(&self, user: &UserId, skill: &NewSkill) -> Result<Skill> {
        skill.validate()?;
        let id = new_id();
        self.conn().execute(
            "INSERT INTO skills (id, user_id, name, life_task_connection, phase, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                user,
                skill.name.trim(),
                skill.life_task_connection,
                skill.phase.unwrap_or_default().as_str(),
                now_rfc3339(),
            ],
        )?;
        self.emit(Event::SkillCreated {
            skill_id: id.clone(),
        });
        self.get_skill(user, &id)
    }

    /// Rename a skill or move it to another phase.
    pub fn update_skill(&self, user: &UserId, skill_id: &str, update: &SkillUpdate) -> Result<Skill> {
        update.validate()?;
        self.ensure_owned("skills", "skill", user, skill_id)?;
        self.conn().execute(
            "UPDATE skills SET
                name = COALESCE(?2, name),
                phase = COALESCE(?3, phase)
             WHERE id = ?1",
            params![
                skill_id,
                update.name.as_deref().map(str::trim),
                update.phase.map(|p| p.as_str()),
            ],
        )?;
        self.emit(Event::SkillUpdated {
            skill_id: skill_id.to_string(),
        });
        self.get_skill(user, skill_id)
    }

    pub fn log_mastery_session(
        &self,
        user: &UserId,
        session: &NewMasterySession,
    ) -> Result<MasterySession> {
        session.validate()?;
        self.ensure_owned("skills", "skill", user, &session.skill_id)?;
        let id = new_id();
        self.conn().execute(
            "INSERT INTO mastery_sessions (
                id, user_id, skill_id, date, minutes, breakthrough, obstacle, mentor_notes, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                user,
                session.skill_id,
                session.date,
                session.minutes,
                session.breakthrough,
                session.obstacle,
                session.mentor_notes,
                now_rfc3339(),
            ],
        )?;
        self.emit(Event::MasterySessionLogged {
            skill_id: session.skill_id.clone(),
            date: session.date,
            minutes: session.minutes,
        });
        let stored = self.conn().query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM mastery_sessions s WHERE s.id = ?1"),
            params![id],
            row_to_session,
        )?;
        Ok(stored)
    }

    /// Latest sessions for a skill, newest day first.
    pub fn sessions_for_skill(&self, user: &UserId, skill_id: &str) -> Result<Vec<MasterySession>> {
        self.ensure_owned("skills", "skill", user, skill_id)?;
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM mastery_sessions s
             WHERE s.skill_id = ?1
             ORDER BY s.date DESC, s.created_at DESC
             LIMIT ?2"
        ))?;
        let sessions = stmt
            .query_map(params![skill_id, SKILL_SESSION_LIMIT], row_to_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Total practice minutes between two days, inclusive.
    pub fn mastery_minutes_between(&self, user: &UserId, from: DateKey, to: DateKey) -> Result<u32> {
        let minutes = self.conn().query_row(
            "SELECT COALESCE(SUM(minutes), 0) FROM mastery_sessions
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3",
            params![user, from, to],
            |row| row.get(0),
        )?;
        Ok(minutes)
    }

    /// Total practice hours between two days, inclusive.
    pub fn mastery_hours_between(&self, user: &UserId, from: DateKey, to: DateKey) -> Result<f64> {
        Ok(f64::from(self.mastery_minutes_between(user, from, to)?) / 60.0)
    }

    /// Active identity statements, newest first.
    pub fn list_identity_statements(&self, user: &UserId) -> Result<Vec<IdentityStatement>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, content, is_active, created_at FROM identity_statements
             WHERE user_id = ?1 AND is_active = 1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let statements = stmt
            .query_map(params![user], |row| {
                let created_at: String = row.get(3)?;
                Ok(IdentityStatement {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    is_active: row.get(2)?,
                    created_at: parse_timestamp(&created_at),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(statements)
    }

    pub fn add_identity_statement(&self, user: &UserId, content: &str) -> Result<()> {
        crate::records::check_not_blank("content", content)?;
        self.conn().execute(
            "INSERT INTO identity_statements (id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![new_id(), user, content.trim(), now_rfc3339()],
        )?;
        self.emit(Event::IdentityStatementAdded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn setup() -> (Database, UserId) {
        (Database::open_memory().unwrap(), UserId::new("alice").unwrap())
    }

    fn day(n: i64) -> DateKey {
        DateKey::from_ymd(2024, 9, 2).unwrap().add_days(n)
    }

    fn session(skill_id: &str, date: DateKey, minutes: u32) -> NewMasterySession {
        NewMasterySession {
            skill_id: skill_id.to_string(),
            date,
            minutes,
            breakthrough: None,
            obstacle: None,
            mentor_notes: None,
        }
    }

    #[test]
    fn latest_life_task_wins() {
        let (db, user) = setup();
        assert!(db.get_life_task(&user).unwrap().is_none());
        db.set_life_task(&user, "Teach").unwrap();
        db.set_life_task(&user, "Build instruments").unwrap();
        assert_eq!(
            db.get_life_task(&user).unwrap().unwrap().statement,
            "Build instruments"
        );
    }

    #[test]
    fn skills_carry_session_totals() {
        let (db, user) = setup();
        let piano = db
            .create_skill(
                &user,
                &NewSkill {
                    name: "Piano".into(),
                    ..NewSkill::default()
                },
            )
            .unwrap();
        db.create_skill(
            &user,
            &NewSkill {
                name: "Rust".into(),
                phase: Some(SkillPhase::ActiveMastery),
                ..NewSkill::default()
            },
        )
        .unwrap();
        db.log_mastery_session(&user, &session(&piano.id, day(0), 30)).unwrap();
        db.log_mastery_session(&user, &session(&piano.id, day(1), 45)).unwrap();

        let skills = db.list_skills(&user).unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].skill.phase, SkillPhase::Apprentice);
        assert_eq!(skills[0].total_minutes, 75);
        assert_eq!(skills[0].session_count, 2);
        assert_eq!(skills[1].total_minutes, 0);
        assert_eq!(skills[1].skill.phase, SkillPhase::ActiveMastery);
    }

    #[test]
    fn update_skill_changes_only_given_fields() {
        let (db, user) = setup();
        let skill = db
            .create_skill(
                &user,
                &NewSkill {
                    name: "Chess".into(),
                    ..NewSkill::default()
                },
            )
            .unwrap();
        let updated = db
            .update_skill(
                &user,
                &skill.id,
                &SkillUpdate {
                    name: None,
                    phase: Some(SkillPhase::TrueMastery),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Chess");
        assert_eq!(updated.phase, SkillPhase::TrueMastery);
    }

    #[test]
    fn session_for_unknown_skill_is_not_found() {
        let (db, user) = setup();
        assert!(matches!(
            db.log_mastery_session(&user, &session("nope", day(0), 10)),
            Err(CoreError::NotFound { entity: "skill", .. })
        ));
    }

    #[test]
    fn sessions_newest_first_and_hours_in_range() {
        let (db, user) = setup();
        let skill = db
            .create_skill(
                &user,
                &NewSkill {
                    name: "Guitar".into(),
                    ..NewSkill::default()
                },
            )
            .unwrap();
        db.log_mastery_session(&user, &session(&skill.id, day(0), 60)).unwrap();
        db.log_mastery_session(&user, &session(&skill.id, day(3), 30)).unwrap();
        db.log_mastery_session(&user, &session(&skill.id, day(9), 90)).unwrap();

        let sessions = db.sessions_for_skill(&user, &skill.id).unwrap();
        assert_eq!(sessions[0].date, day(9));
        assert_eq!(db.mastery_hours_between(&user, day(0), day(6)).unwrap(), 1.5);
    }

    #[test]
    fn identity_statements_newest_first() {
        let (db, user) = setup();
        db.add_identity_statement(&user, "I am a writer").unwrap();
        db.add_identity_statement(&user, "I am an athlete").unwrap();
        let statements = db.list_identity_statements(&user).unwrap();
        assert_eq!(statements[0].content, "I am an athlete");
        assert!(statements.iter().all(|s| s.is_active));
    }
}
