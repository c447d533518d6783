//! Read-only aggregates: a day at a glance, rolling progress and the weekly
//! overview feeding the weekly review form.

use rusqlite::params;

use super::creative::{row_to_entry as row_to_creative, CREATIVE_COLUMNS};
use super::database::Database;
use super::mastery::{row_to_session, SESSION_COLUMNS};
use crate::date::DateKey;
use crate::error::Result;
use crate::records::{
    DayCompletion, DaySession, DaySummary, HabitCompletion, ProgressStats, UserId, WeeklyOverview,
};
use crate::streak::StreakCalculator;

/// Days before the reference date covered by [`Database::progress_stats`].
pub const PROGRESS_WINDOW_DAYS: i64 = 30;

impl Database {
    /// Everything recorded on one day.
    pub fn day_summary(&self, user: &UserId, date: DateKey) -> Result<DaySummary> {
        let entry = self.get_daily_entry(user, date)?;

        let mut stmt = self.conn().prepare(
            "SELECT c.id, c.habit_id, c.date, c.completed, c.satisfaction,
                    h.name, h.identity_statement
             FROM habit_completions c
             JOIN habits h ON h.id = c.habit_id
             WHERE c.user_id = ?1 AND c.date = ?2
             ORDER BY h.created_at ASC, h.rowid ASC",
        )?;
        let completions = stmt
            .query_map(params![user, date], |row| {
                Ok(DayCompletion {
                    completion: HabitCompletion {
                        id: row.get(0)?,
                        habit_id: row.get(1)?,
                        date: row.get(2)?,
                        completed: row.get(3)?,
                        satisfaction: row.get(4)?,
                    },
                    habit_name: row.get(5)?,
                    identity_statement: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn().prepare(&format!(
            "SELECT {SESSION_COLUMNS}, k.name
             FROM mastery_sessions s
             JOIN skills k ON k.id = s.skill_id
             WHERE s.user_id = ?1 AND s.date = ?2
             ORDER BY s.created_at ASC, s.rowid ASC"
        ))?;
        let mastery_sessions = stmt
            .query_map(params![user, date], |row| {
                Ok(DaySession {
                    session: row_to_session(row)?,
                    skill_name: row.get(8)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn().prepare(&format!(
            "SELECT {CREATIVE_COLUMNS} FROM creative_entries
             WHERE user_id = ?1 AND date = ?2
             ORDER BY created_at ASC, rowid ASC"
        ))?;
        let creative_entries = stmt
            .query_map(params![user, date], row_to_creative)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(DaySummary {
            date,
            entry,
            completions,
            workouts: self.workouts_for_date(user, date)?,
            sleep_log: self.get_sleep_log(user, date)?,
            reflections: self.reflections_for_date(user, date)?,
            creative_entries,
            mastery_sessions,
        })
    }

    /// Ritual streaks and totals over the thirty days up to `as_of`.
    pub fn progress_stats(
        &self,
        user: &UserId,
        as_of: DateKey,
        calculator: &StreakCalculator,
    ) -> Result<ProgressStats> {
        let since = as_of.add_days(-PROGRESS_WINDOW_DAYS);

        let mut stmt = self.conn().prepare(
            "SELECT date, morning_completed, evening_completed FROM daily_entries
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC",
        )?;
        let entries = stmt
            .query_map(params![user, since, as_of], |row| {
                Ok((
                    row.get::<_, DateKey>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, bool>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mornings: Vec<DateKey> = entries.iter().filter(|e| e.1).map(|e| e.0).collect();
        let evenings: Vec<DateKey> = entries.iter().filter(|e| e.2).map(|e| e.0).collect();

        let habit_days: u32 = self.conn().query_row(
            "SELECT COUNT(DISTINCT date) FROM habit_completions
             WHERE user_id = ?1 AND completed = 1 AND date >= ?2 AND date <= ?3",
            params![user, since, as_of],
            |row| row.get(0),
        )?;

        Ok(ProgressStats {
            morning_streak: calculator.compute(mornings.iter().copied(), as_of),
            evening_streak: calculator.compute(evenings.iter().copied(), as_of),
            morning_total: mornings.len() as u32,
            evening_total: evenings.len() as u32,
            habit_days,
            mastery_minutes: self.mastery_minutes_between(user, since, as_of)?,
            total_days: entries.len() as u32,
        })
    }

    /// Scores for the Monday-to-Sunday week containing `date`.
    pub fn weekly_overview(&self, user: &UserId, date: DateKey) -> Result<WeeklyOverview> {
        let week_start = date.week_start();
        let week_end = week_start.week_end();
        Ok(WeeklyOverview {
            week_start,
            week_end,
            mastery_hours: self.mastery_hours_between(user, week_start, week_end)?,
            protocol_score: self.protocol_score_between(user, week_start, week_end)?,
            habit_count: self.habit_count_for_date(user, date)?,
            existing_review: self.get_weekly_review(user, week_start)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{
        MorningLog, NewCreativeEntry, NewHabit, NewMasterySession, NewReflection, NewSkill,
        NewWorkout, SleepLog,
    };

    fn setup() -> (Database, UserId) {
        (Database::open_memory().unwrap(), UserId::new("alice").unwrap())
    }

    fn day(n: i64) -> DateKey {
        // a Monday
        DateKey::from_ymd(2024, 7, 1).unwrap().add_days(n)
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
    fn day_summary_collects_everything_for_the_date() {
        let (db, user) = setup();
        let habit = db
            .create_habit(
                &user,
                &NewHabit {
                    identity_statement: Some("I am a reader".into()),
                    ..NewHabit::named("Read")
                },
            )
            .unwrap();
        db.set_habit_completion(&user, &habit.id, day(0), true, Some(5)).unwrap();
        let skill = db
            .create_skill(
                &user,
                &NewSkill {
                    name: "Piano".into(),
                    ..NewSkill::default()
                },
            )
            .unwrap();
        db.log_mastery_session(&user, &session(&skill.id, day(0), 45)).unwrap();
        db.log_mastery_session(&user, &session(&skill.id, day(1), 30)).unwrap();
        db.save_sleep_log(&user, day(0), &SleepLog::default()).unwrap();
        db.log_workout(
            &user,
            &NewWorkout {
                date: day(0),
                workout_type: "Run".into(),
                adaptation: None,
                duration_min: None,
                intensity: None,
                notes: None,
            },
        )
        .unwrap();
        db.save_reflection(
            &user,
            &NewReflection {
                date: day(0),
                prompt_type: None,
                content: Some("noticed".into()),
                law_ref: None,
                pattern_tag: None,
            },
        )
        .unwrap();
        db.save_creative_entry(
            &user,
            &NewCreativeEntry {
                date: day(0),
                prompt: None,
                content: Some("sketch".into()),
                medium: None,
                observations: None,
            },
        )
        .unwrap();

        let summary = db.day_summary(&user, day(0)).unwrap();
        assert!(summary.entry.is_none());
        assert_eq!(summary.completions.len(), 1);
        assert_eq!(summary.completions[0].habit_name, "Read");
        assert_eq!(
            summary.completions[0].identity_statement.as_deref(),
            Some("I am a reader")
        );
        assert_eq!(summary.mastery_sessions.len(), 1);
        assert_eq!(summary.mastery_sessions[0].skill_name, "Piano");
        assert_eq!(summary.mastery_sessions[0].session.minutes, 45);
        assert!(summary.sleep_log.is_some());
        assert_eq!(summary.workouts.len(), 1);
        assert_eq!(summary.reflections.len(), 1);
        assert_eq!(summary.creative_entries.len(), 1);
    }

    #[test]
    fn progress_stats_over_window() {
        let (db, user) = setup();
        let as_of = day(40);
        for n in [36, 37, 38, 39] {
            db.save_morning_log(&user, day(n), &MorningLog::default()).unwrap();
        }
        db.save_evening_log(&user, day(39), &Default::default()).unwrap();
        // outside the window
        db.save_morning_log(&user, day(2), &MorningLog::default()).unwrap();

        let habit = db.create_habit(&user, &NewHabit::named("Walk")).unwrap();
        db.set_habit_completion(&user, &habit.id, day(38), true, None).unwrap();
        db.set_habit_completion(&user, &habit.id, day(39), false, None).unwrap();

        let stats = db
            .progress_stats(&user, as_of, &StreakCalculator::new())
            .unwrap();
        assert_eq!(
            stats,
            ProgressStats {
                morning_streak: 4,
                evening_streak: 1,
                morning_total: 4,
                evening_total: 1,
                habit_days: 1,
                mastery_minutes: 0,
                total_days: 4,
            }
        );
    }

    #[test]
    fn weekly_overview_suggests_scores() {
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
        db.log_mastery_session(&user, &session(&skill.id, day(1), 90)).unwrap();
        db.log_mastery_session(&user, &session(&skill.id, day(7), 60)).unwrap();
        for n in 0..7 {
            db.save_sleep_log(&user, day(n), &SleepLog::default()).unwrap();
        }
        let habit = db.create_habit(&user, &NewHabit::named("Stretch")).unwrap();
        db.create_habit(&user, &NewHabit::named("Floss")).unwrap();
        db.create_habit(&user, &NewHabit::named("Read")).unwrap();
        db.set_habit_completion(&user, &habit.id, day(3), true, None).unwrap();

        let overview = db.weekly_overview(&user, day(3)).unwrap();
        assert_eq!(overview.week_start, day(0));
        assert_eq!(overview.week_end, day(6));
        assert_eq!(overview.mastery_hours, 1.5);
        assert_eq!(overview.protocol_score.sleep_days, 7);
        assert!(overview.existing_review.is_none());

        let suggested = overview.suggested_review();
        assert_eq!(suggested.protocol_score, Some(33));
        assert_eq!(suggested.habit_score, Some(33));
        assert_eq!(suggested.mastery_hours, Some(1.5));

        db.save_weekly_review(&user, day(5), &suggested).unwrap();
        let again = db.weekly_overview(&user, day(3)).unwrap();
        assert_eq!(
            again.existing_review.map(|r| r.fields),
            Some(suggested)
        );
    }
}
