//! Habit definitions and per-day completions.

use rusqlite::{params, Row};

use super::database::{new_id, now_rfc3339, parse_optional_timestamp, parse_timestamp, Database};
use crate::date::DateKey;
use crate::error::Result;
use crate::events::Event;
use crate::records::habits::validate_satisfaction;
use crate::records::{Habit, HabitCount, HabitDayStatus, NewHabit, UserId};
use crate::streak::StreakCalculator;

const HABIT_COLUMNS: &str = "h.id, h.name, h.identity_statement, h.cue, h.craving, h.response, \
     h.reward, h.two_minute_version, h.frequency, h.created_at, h.archived_at";

/// Build a Habit from the first eleven columns of a row.
fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
    let created_at: String = row.get(9)?;
    let archived_at: Option<String> = row.get(10)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        identity_statement: row.get(2)?,
        cue: row.get(3)?,
        craving: row.get(4)?,
        response: row.get(5)?,
        reward: row.get(6)?,
        two_minute_version: row.get(7)?,
        frequency: row.get(8)?,
        created_at: parse_timestamp(&created_at),
        archived_at: parse_optional_timestamp(archived_at),
    })
}

impl Database {
    /// Active habits in creation order.
    pub fn list_habits(&self, user: &UserId) -> Result<Vec<Habit>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits h
             WHERE h.user_id = ?1 AND h.archived_at IS NULL
             ORDER BY h.created_at ASC, h.rowid ASC"
        ))?;
        let habits = stmt
            .query_map(params![user], row_to_habit)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(habits)
    }

    pub fn create_habit(&self, user: &UserId, habit: &NewHabit) -> Result<Habit> {
        habit.validate()?;
        let id = new_id();
        self.conn().execute(
            "INSERT INTO habits (
                id, user_id, name, identity_statement, cue, craving, response, reward,
                two_minute_version, frequency, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, COALESCE(?10, 'daily'), ?11)",
            params![
                id,
                user,
                habit.name.trim(),
                habit.identity_statement,
                habit.cue,
                habit.craving,
                habit.response,
                habit.reward,
                habit.two_minute_version,
                habit.frequency,
                now_rfc3339(),
            ],
        )?;
        self.emit(Event::HabitCreated {
            habit_id: id.clone(),
        });
        self.get_habit(user, &id)
    }

    pub fn get_habit(&self, user: &UserId, habit_id: &str) -> Result<Habit> {
        self.ensure_owned("habits", "habit", user, habit_id)?;
        let habit = self.conn().query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits h WHERE h.id = ?1"),
            params![habit_id],
            row_to_habit,
        )?;
        Ok(habit)
    }

    /// Hide a habit from the active list. Its completions are kept.
    pub fn archive_habit(&self, user: &UserId, habit_id: &str) -> Result<()> {
        self.ensure_owned("habits", "habit", user, habit_id)?;
        self.conn().execute(
            "UPDATE habits SET archived_at = COALESCE(archived_at, ?2) WHERE id = ?1",
            params![habit_id, now_rfc3339()],
        )?;
        self.emit(Event::HabitArchived {
            habit_id: habit_id.to_string(),
        });
        Ok(())
    }

    /// Every active habit with its state on `date`.
    pub fn completions_for_date(&self, user: &UserId, date: DateKey) -> Result<Vec<HabitDayStatus>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {HABIT_COLUMNS}, c.id, c.completed, c.satisfaction
             FROM habits h
             LEFT JOIN habit_completions c ON c.habit_id = h.id AND c.date = ?2
             WHERE h.user_id = ?1 AND h.archived_at IS NULL
             ORDER BY h.created_at ASC, h.rowid ASC"
        ))?;
        let rows = stmt
            .query_map(params![user, date], |row| {
                Ok(HabitDayStatus {
                    habit: row_to_habit(row)?,
                    completion_id: row.get(11)?,
                    completed: row.get::<_, Option<bool>>(12)?.unwrap_or(false),
                    satisfaction: row.get(13)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Upsert the completion of one habit on one day.
    pub fn set_habit_completion(
        &self,
        user: &UserId,
        habit_id: &str,
        date: DateKey,
        completed: bool,
        satisfaction: Option<u8>,
    ) -> Result<()> {
        validate_satisfaction(satisfaction)?;
        self.ensure_owned("habits", "habit", user, habit_id)?;
        self.conn().execute(
            "INSERT INTO habit_completions (id, habit_id, user_id, date, completed, satisfaction)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(habit_id, date) DO UPDATE SET
                completed = excluded.completed,
                satisfaction = excluded.satisfaction",
            params![new_id(), habit_id, user, date, completed, satisfaction],
        )?;
        self.emit(Event::HabitCompletionSet {
            habit_id: habit_id.to_string(),
            date,
            completed,
        });
        Ok(())
    }

    /// Days on which the habit was completed, newest first.
    pub fn habit_completion_dates(&self, user: &UserId, habit_id: &str) -> Result<Vec<DateKey>> {
        self.ensure_owned("habits", "habit", user, habit_id)?;
        let mut stmt = self.conn().prepare(
            "SELECT date FROM habit_completions
             WHERE habit_id = ?1 AND completed = 1
             ORDER BY date DESC",
        )?;
        let dates = stmt
            .query_map(params![habit_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<DateKey>>>()?;
        Ok(dates)
    }

    /// Current streak for a habit as of `as_of`.
    pub fn habit_streak(
        &self,
        user: &UserId,
        habit_id: &str,
        as_of: DateKey,
        calculator: &StreakCalculator,
    ) -> Result<u32> {
        let dates = self.habit_completion_dates(user, habit_id)?;
        Ok(calculator.compute(dates, as_of))
    }

    /// Active habits and how many were completed on `date`.
    pub fn habit_count_for_date(&self, user: &UserId, date: DateKey) -> Result<HabitCount> {
        let (total, done) = self.conn().query_row(
            "SELECT
                (SELECT COUNT(*) FROM habits WHERE user_id = ?1 AND archived_at IS NULL),
                (SELECT COUNT(*) FROM habit_completions WHERE user_id = ?1 AND date = ?2 AND completed = 1)",
            params![user, date],
            |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)),
        )?;
        Ok(HabitCount { total, done })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    fn setup() -> (Database, UserId) {
        (Database::open_memory().unwrap(), UserId::new("alice").unwrap())
    }

    fn day(n: i64) -> DateKey {
        DateKey::from_ymd(2024, 5, 20).unwrap().add_days(n)
    }

    #[test]
    fn create_defaults_frequency_and_lists_in_order() {
        let (db, user) = setup();
        let read = db
            .create_habit(
                &user,
                &NewHabit {
                    cue: Some("Coffee poured".into()),
                    ..NewHabit::named("Read")
                },
            )
            .unwrap();
        db.create_habit(&user, &NewHabit::named("Stretch")).unwrap();
        assert_eq!(read.frequency, "daily");

        let names: Vec<_> = db
            .list_habits(&user)
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["Read", "Stretch"]);
    }

    #[test]
    fn blank_name_is_rejected() {
        let (db, user) = setup();
        assert!(matches!(
            db.create_habit(&user, &NewHabit::named("  ")),
            Err(CoreError::Validation(ValidationError::EmptyField("name")))
        ));
    }

    #[test]
    fn archived_habits_leave_the_list() {
        let (db, user) = setup();
        let habit = db.create_habit(&user, &NewHabit::named("Floss")).unwrap();
        db.archive_habit(&user, &habit.id).unwrap();
        assert!(db.list_habits(&user).unwrap().is_empty());
        assert!(db.get_habit(&user, &habit.id).unwrap().archived_at.is_some());
    }

    #[test]
    fn completion_upserts_per_day() {
        let (db, user) = setup();
        let habit = db.create_habit(&user, &NewHabit::named("Walk")).unwrap();
        db.set_habit_completion(&user, &habit.id, day(0), true, Some(4)).unwrap();
        db.set_habit_completion(&user, &habit.id, day(0), false, None).unwrap();

        let status = db.completions_for_date(&user, day(0)).unwrap();
        assert_eq!(status.len(), 1);
        assert!(!status[0].completed);
        assert!(status[0].completion_id.is_some());

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM habit_completions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn untouched_habit_reads_as_incomplete() {
        let (db, user) = setup();
        db.create_habit(&user, &NewHabit::named("Journal")).unwrap();
        let status = db.completions_for_date(&user, day(0)).unwrap();
        assert!(!status[0].completed);
        assert!(status[0].completion_id.is_none());
    }

    #[test]
    fn streak_counts_completed_days_only() {
        let (db, user) = setup();
        let habit = db.create_habit(&user, &NewHabit::named("Run")).unwrap();
        for n in [-3, -2, -1] {
            db.set_habit_completion(&user, &habit.id, day(n), true, None).unwrap();
        }
        db.set_habit_completion(&user, &habit.id, day(-4), false, None).unwrap();
        db.set_habit_completion(&user, &habit.id, day(-5), true, None).unwrap();

        let calc = StreakCalculator::new();
        assert_eq!(db.habit_streak(&user, &habit.id, day(0), &calc).unwrap(), 3);
        assert_eq!(db.habit_streak(&user, &habit.id, day(1), &calc).unwrap(), 0);
    }

    #[test]
    fn other_users_habits_are_not_found() {
        let (db, alice) = setup();
        let bob = UserId::new("bob").unwrap();
        let habit = db.create_habit(&alice, &NewHabit::named("Piano")).unwrap();
        assert!(matches!(
            db.set_habit_completion(&bob, &habit.id, day(0), true, None),
            Err(CoreError::NotFound { entity: "habit", .. })
        ));
    }

    #[test]
    fn satisfaction_out_of_range() {
        let (db, user) = setup();
        let habit = db.create_habit(&user, &NewHabit::named("Tea")).unwrap();
        assert!(db
            .set_habit_completion(&user, &habit.id, day(0), true, Some(9))
            .is_err());
    }

    #[test]
    fn count_for_date() {
        let (db, user) = setup();
        let a = db.create_habit(&user, &NewHabit::named("A")).unwrap();
        db.create_habit(&user, &NewHabit::named("B")).unwrap();
        db.set_habit_completion(&user, &a.id, day(0), true, None).unwrap();
        assert_eq!(
            db.habit_count_for_date(&user, day(0)).unwrap(),
            HabitCount { total: 2, done: 1 }
        );
    }
}
