//! Sleep and training protocols.

use rusqlite::{params, OptionalExtension, Row};

use super::database::{new_id, now_rfc3339, parse_timestamp, Database};
use crate::date::DateKey;
use crate::error::Result;
use crate::events::Event;
use crate::records::{NewWorkout, ProtocolScore, SleepLog, TrainingAdaptation, UserId, Workout};

pub const RECENT_SLEEP_LIMIT: u32 = 14;

fn row_to_sleep(row: &Row) -> rusqlite::Result<SleepLog> {
    Ok(SleepLog {
        bedtime: row.get(0)?,
        wake_time: row.get(1)?,
        quality: row.get(2)?,
        notes: row.get(3)?,
    })
}

pub(crate) fn row_to_workout(row: &Row) -> rusqlite::Result<Workout> {
    let adaptation: Option<String> = row.get(3)?;
    let created_at: String = row.get(7)?;
    Ok(Workout {
        id: row.get(0)?,
        date: row.get(1)?,
        workout_type: row.get(2)?,
        // labels written by older builds that no longer parse are dropped
        adaptation: adaptation.and_then(|a| a.parse::<TrainingAdaptation>().ok()),
        duration_min: row.get(4)?,
        intensity: row.get(5)?,
        notes: row.get(6)?,
        created_at: parse_timestamp(&created_at),
    })
}

pub(crate) const WORKOUT_COLUMNS: &str =
    "id, date, workout_type, adaptation, duration_min, intensity, notes, created_at";

impl Database {
    pub fn get_sleep_log(&self, user: &UserId, date: DateKey) -> Result<Option<SleepLog>> {
        let log = self
            .conn()
            .query_row(
                "SELECT bedtime, wake_time, quality, notes FROM sleep_logs
                 WHERE user_id = ?1 AND date = ?2",
                params![user, date],
                row_to_sleep,
            )
            .optional()?;
        Ok(log)
    }

    /// Upsert the night's sleep; unset fields keep their stored value.
    pub fn save_sleep_log(&self, user: &UserId, date: DateKey, log: &SleepLog) -> Result<SleepLog> {
        log.validate()?;
        self.conn().execute(
            "INSERT INTO sleep_logs (id, user_id, date, bedtime, wake_time, quality, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, date) DO UPDATE SET
                bedtime = COALESCE(excluded.bedtime, bedtime),
                wake_time = COALESCE(excluded.wake_time, wake_time),
                quality = COALESCE(excluded.quality, quality),
                notes = COALESCE(excluded.notes, notes)",
            params![new_id(), user, date, log.bedtime, log.wake_time, log.quality, log.notes],
        )?;
        self.emit(Event::SleepLogSaved { date });
        Ok(self.get_sleep_log(user, date)?.unwrap_or_default())
    }

    /// The last two weeks of sleep logs, newest first.
    pub fn recent_sleep_logs(&self, user: &UserId) -> Result<Vec<(DateKey, SleepLog)>> {
        let mut stmt = self.conn().prepare(
            "SELECT bedtime, wake_time, quality, notes, date FROM sleep_logs
             WHERE user_id = ?1
             ORDER BY date DESC
             LIMIT ?2",
        )?;
        let logs = stmt
            .query_map(params![user, RECENT_SLEEP_LIMIT], |row| {
                Ok((row.get(4)?, row_to_sleep(row)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    pub fn log_workout(&self, user: &UserId, workout: &NewWorkout) -> Result<Workout> {
        workout.validate()?;
        let id = new_id();
        self.conn().execute(
            "INSERT INTO workouts (
                id, user_id, date, workout_type, adaptation, duration_min, intensity, notes, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                user,
                workout.date,
                workout.workout_type.trim(),
                workout.adaptation.map(|a| a.as_str()),
                workout.duration_min,
                workout.intensity,
                workout.notes,
                now_rfc3339(),
            ],
        )?;
        self.emit(Event::WorkoutLogged { date: workout.date });
        let stored = self.conn().query_row(
            &format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1"),
            params![id],
            row_to_workout,
        )?;
        Ok(stored)
    }

    pub fn workouts_for_date(&self, user: &UserId, date: DateKey) -> Result<Vec<Workout>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts
             WHERE user_id = ?1 AND date = ?2
             ORDER BY created_at ASC, rowid ASC"
        ))?;
        let workouts = stmt
            .query_map(params![user, date], row_to_workout)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(workouts)
    }

    /// Days between `from` and `to` (inclusive) with a sleep log, with at
    /// least one workout, and with a meditation in the morning ritual.
    pub fn protocol_score_between(
        &self,
        user: &UserId,
        from: DateKey,
        to: DateKey,
    ) -> Result<ProtocolScore> {
        let score = self.conn().query_row(
            "SELECT
                (SELECT COUNT(*) FROM sleep_logs
                  WHERE user_id = ?1 AND date >= ?2 AND date <= ?3),
                (SELECT COUNT(DISTINCT date) FROM workouts
                  WHERE user_id = ?1 AND date >= ?2 AND date <= ?3),
                (SELECT COUNT(*) FROM morning_logs m
                  JOIN daily_entries e ON e.id = m.entry_id
                  WHERE e.user_id = ?1 AND e.date >= ?2 AND e.date <= ?3
                    AND m.meditation_minutes > 0)",
            params![user, from, to],
            |row| {
                Ok(ProtocolScore {
                    sleep_days: row.get(0)?,
                    workout_days: row.get(1)?,
                    meditation_days: row.get(2)?,
                })
            },
        )?;
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MorningLog;

    fn setup() -> (Database, UserId) {
        (Database::open_memory().unwrap(), UserId::new("alice").unwrap())
    }

    fn day(n: i64) -> DateKey {
        DateKey::from_ymd(2024, 6, 10).unwrap().add_days(n)
    }

    fn workout(date: DateKey, kind: &str) -> NewWorkout {
        NewWorkout {
            date,
            workout_type: kind.to_string(),
            adaptation: Some(TrainingAdaptation::Vo2Max),
            duration_min: Some(40),
            intensity: Some(7),
            notes: None,
        }
    }

    #[test]
    fn sleep_log_partial_update() {
        let (db, user) = setup();
        db.save_sleep_log(
            &user,
            day(0),
            &SleepLog {
                bedtime: Some("22:30".into()),
                quality: Some(7),
                ..SleepLog::default()
            },
        )
        .unwrap();
        let merged = db
            .save_sleep_log(
                &user,
                day(0),
                &SleepLog {
                    wake_time: Some("06:00".into()),
                    ..SleepLog::default()
                },
            )
            .unwrap();
        assert_eq!(merged.bedtime.as_deref(), Some("22:30"));
        assert_eq!(merged.wake_time.as_deref(), Some("06:00"));
        assert_eq!(merged.quality, Some(7));
    }

    #[test]
    fn recent_sleep_is_capped_and_newest_first() {
        let (db, user) = setup();
        for n in 0..20 {
            db.save_sleep_log(&user, day(n), &SleepLog::default()).unwrap();
        }
        let recent = db.recent_sleep_logs(&user).unwrap();
        assert_eq!(recent.len(), 14);
        assert_eq!(recent[0].0, day(19));
    }

    #[test]
    fn workouts_round_trip_adaptation() {
        let (db, user) = setup();
        let stored = db.log_workout(&user, &workout(day(0), "Run")).unwrap();
        assert_eq!(stored.adaptation, Some(TrainingAdaptation::Vo2Max));
        assert_eq!(db.workouts_for_date(&user, day(0)).unwrap().len(), 1);
        assert!(db.workouts_for_date(&user, day(1)).unwrap().is_empty());
    }

    #[test]
    fn protocol_score_counts_distinct_days() {
        let (db, user) = setup();
        db.save_sleep_log(&user, day(0), &SleepLog::default()).unwrap();
        db.save_sleep_log(&user, day(1), &SleepLog::default()).unwrap();
        db.save_sleep_log(&user, day(8), &SleepLog::default()).unwrap();
        db.log_workout(&user, &workout(day(2), "Lift")).unwrap();
        db.log_workout(&user, &workout(day(2), "Swim")).unwrap();
        db.log_workout(&user, &workout(day(3), "Run")).unwrap();
        db.save_morning_log(
            &user,
            day(4),
            &MorningLog {
                meditation_minutes: Some(12),
                ..MorningLog::default()
            },
        )
        .unwrap();
        db.save_morning_log(
            &user,
            day(5),
            &MorningLog {
                meditation_minutes: Some(0),
                ..MorningLog::default()
            },
        )
        .unwrap();

        let score = db.protocol_score_between(&user, day(0), day(6)).unwrap();
        assert_eq!(
            score,
            ProtocolScore {
                sleep_days: 2,
                workout_days: 2,
                meditation_days: 1
            }
        );
    }
}
