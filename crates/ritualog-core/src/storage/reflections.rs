//! Shadow-work reflections and weekly reviews.

use rusqlite::{params, OptionalExtension, Row};

use super::database::{new_id, now_rfc3339, parse_timestamp, Database};
use crate::date::DateKey;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::records::{NewReflection, Reflection, UserId, WeeklyReview, WeeklyReviewInput};

pub const RECENT_REFLECTION_LIMIT: u32 = 20;
pub const REFLECTION_SEARCH_LIMIT: u32 = 50;

pub(crate) const REFLECTION_COLUMNS: &str =
    "id, date, prompt_type, content, law_ref, pattern_tag, created_at";

pub(crate) fn row_to_reflection(row: &Row) -> rusqlite::Result<Reflection> {
    let created_at: String = row.get(6)?;
    Ok(Reflection {
        id: row.get(0)?,
        date: row.get(1)?,
        prompt_type: row.get(2)?,
        content: row.get(3)?,
        law_ref: row.get(4)?,
        pattern_tag: row.get(5)?,
        created_at: parse_timestamp(&created_at),
    })
}

/// Escape LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Database {
    pub fn save_reflection(&self, user: &UserId, reflection: &NewReflection) -> Result<Reflection> {
        let id = new_id();
        self.conn().execute(
            "INSERT INTO reflections (
                id, user_id, date, prompt_type, content, law_ref, pattern_tag, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                user,
                reflection.date,
                reflection.prompt_type,
                reflection.content,
                reflection.law_ref,
                reflection.pattern_tag.as_deref().map(str::trim),
                now_rfc3339(),
            ],
        )?;
        self.emit(Event::ReflectionSaved {
            date: reflection.date,
        });
        let stored = self.conn().query_row(
            &format!("SELECT {REFLECTION_COLUMNS} FROM reflections WHERE id = ?1"),
            params![id],
            row_to_reflection,
        )?;
        Ok(stored)
    }

    pub fn reflections_for_date(&self, user: &UserId, date: DateKey) -> Result<Vec<Reflection>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {REFLECTION_COLUMNS} FROM reflections
             WHERE user_id = ?1 AND date = ?2
             ORDER BY created_at ASC, rowid ASC"
        ))?;
        let reflections = stmt
            .query_map(params![user, date], row_to_reflection)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reflections)
    }

    /// Reflections whose content, pattern tag or law reference contains
    /// `query`, ignoring ASCII case. Newest first.
    pub fn search_reflections(&self, user: &UserId, query: &str) -> Result<Vec<Reflection>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {REFLECTION_COLUMNS} FROM reflections
             WHERE user_id = ?1
               AND (content LIKE ?2 ESCAPE '\\'
                 OR pattern_tag LIKE ?2 ESCAPE '\\'
                 OR law_ref LIKE ?2 ESCAPE '\\')
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?3"
        ))?;
        let reflections = stmt
            .query_map(
                params![user, like_pattern(query.trim()), REFLECTION_SEARCH_LIMIT],
                row_to_reflection,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reflections)
    }

    pub fn recent_reflections(&self, user: &UserId) -> Result<Vec<Reflection>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {REFLECTION_COLUMNS} FROM reflections
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2"
        ))?;
        let reflections = stmt
            .query_map(params![user, RECENT_REFLECTION_LIMIT], row_to_reflection)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reflections)
    }

    /// Every pattern tag the user has used, alphabetically.
    pub fn pattern_tags(&self, user: &UserId) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            "SELECT DISTINCT pattern_tag FROM reflections
             WHERE user_id = ?1 AND pattern_tag IS NOT NULL AND pattern_tag != ''
             ORDER BY pattern_tag ASC",
        )?;
        let tags = stmt
            .query_map(params![user], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(tags)
    }

    /// The review for the week containing `date`.
    pub fn get_weekly_review(&self, user: &UserId, date: DateKey) -> Result<Option<WeeklyReview>> {
        let review = self
            .conn()
            .query_row(
                "SELECT id, week_start, wins, patterns, protocol_score, habit_score,
                        mastery_hours, creative_output, strategic_lesson, identity_evolution
                 FROM weekly_reviews
                 WHERE user_id = ?1 AND week_start = ?2",
                params![user, date.week_start()],
                |row| {
                    Ok(WeeklyReview {
                        id: row.get(0)?,
                        week_start: row.get(1)?,
                        fields: WeeklyReviewInput {
                            wins: row.get(2)?,
                            patterns: row.get(3)?,
                            protocol_score: row.get(4)?,
                            habit_score: row.get(5)?,
                            mastery_hours: row.get(6)?,
                            creative_output: row.get(7)?,
                            strategic_lesson: row.get(8)?,
                            identity_evolution: row.get(9)?,
                        },
                    })
                },
            )
            .optional()?;
        Ok(review)
    }

    /// Upsert the review for the week containing `date`; unset fields keep
    /// their stored value.
    pub fn save_weekly_review(
        &self,
        user: &UserId,
        date: DateKey,
        input: &WeeklyReviewInput,
    ) -> Result<WeeklyReview> {
        input.validate()?;
        let week_start = date.week_start();
        self.conn().execute(
            "INSERT INTO weekly_reviews (
                id, user_id, week_start, wins, patterns, protocol_score, habit_score,
                mastery_hours, creative_output, strategic_lesson, identity_evolution
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(user_id, week_start) DO UPDATE SET
                wins = COALESCE(excluded.wins, wins),
                patterns = COALESCE(excluded.patterns, patterns),
                protocol_score = COALESCE(excluded.protocol_score, protocol_score),
                habit_score = COALESCE(excluded.habit_score, habit_score),
                mastery_hours = COALESCE(excluded.mastery_hours, mastery_hours),
                creative_output = COALESCE(excluded.creative_output, creative_output),
                strategic_lesson = COALESCE(excluded.strategic_lesson, strategic_lesson),
                identity_evolution = COALESCE(excluded.identity_evolution, identity_evolution)",
            params![
                new_id(),
                user,
                week_start,
                input.wins,
                input.patterns,
                input.protocol_score,
                input.habit_score,
                input.mastery_hours,
                input.creative_output,
                input.strategic_lesson,
                input.identity_evolution,
            ],
        )?;
        self.emit(Event::WeeklyReviewSaved { week_start });
        let stored = self.get_weekly_review(user, week_start)?;
        stored.ok_or_else(|| CoreError::NotFound {
            entity: "weekly review",
            id: week_start.to_string(),
        })
    }
}
