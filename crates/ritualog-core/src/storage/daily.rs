//! Daily entries and the morning/evening rituals hanging off them.

use rusqlite::{params, OptionalExtension, Row};

use super::database::{new_id, now_rfc3339, parse_timestamp, Database};
use crate::date::DateKey;
use crate::error::Result;
use crate::events::Event;
use crate::records::{DailyEntry, EveningLog, MorningLog, UserId};

/// How many entries the journal list shows.
pub const DAILY_ENTRY_LIST_LIMIT: u32 = 90;

const ENTRY_COLUMNS: &str = "id, date, morning_completed, evening_completed, created_at";

fn row_to_entry(row: &Row) -> rusqlite::Result<DailyEntry> {
    let created_at: String = row.get(4)?;
    Ok(DailyEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        morning_completed: row.get(2)?,
        evening_completed: row.get(3)?,
        created_at: parse_timestamp(&created_at),
        morning_log: None,
        evening_log: None,
    })
}

impl Database {
    /// Fetch the day's entry, creating an empty one on first access.
    pub fn get_or_create_daily_entry(&self, user: &UserId, date: DateKey) -> Result<DailyEntry> {
        self.conn().execute(
            "INSERT INTO daily_entries (id, user_id, date, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, date) DO NOTHING",
            params![new_id(), user, date, now_rfc3339()],
        )?;
        let entry = self
            .conn()
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM daily_entries WHERE user_id = ?1 AND date = ?2"),
                params![user, date],
                row_to_entry,
            )?;
        self.with_logs(entry)
    }

    /// The day's entry with its logs, if one exists.
    pub fn get_daily_entry(&self, user: &UserId, date: DateKey) -> Result<Option<DailyEntry>> {
        let entry = self
            .conn()
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM daily_entries WHERE user_id = ?1 AND date = ?2"),
                params![user, date],
                row_to_entry,
            )
            .optional()?;
        entry.map(|e| self.with_logs(e)).transpose()
    }

    /// Most recent entries first, with their logs.
    pub fn list_daily_entries(&self, user: &UserId) -> Result<Vec<DailyEntry>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries
             WHERE user_id = ?1
             ORDER BY date DESC
             LIMIT ?2"
        ))?;
        let entries = stmt
            .query_map(params![user, DAILY_ENTRY_LIST_LIMIT], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        entries.into_iter().map(|e| self.with_logs(e)).collect()
    }

    /// Save the morning ritual and mark it complete for the day.
    pub fn save_morning_log(
        &self,
        user: &UserId,
        date: DateKey,
        log: &MorningLog,
    ) -> Result<DailyEntry> {
        log.validate()?;
        let entry = self.get_or_create_daily_entry(user, date)?;

        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "INSERT INTO morning_logs (
                entry_id, wake_time, sunlight_minutes, caffeine_delayed_90min, cold_exposure,
                meditation_minutes, exercise_done, intention, identity_affirmation,
                creative_observation, top3
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(entry_id) DO UPDATE SET
                wake_time = COALESCE(excluded.wake_time, wake_time),
                sunlight_minutes = COALESCE(excluded.sunlight_minutes, sunlight_minutes),
                caffeine_delayed_90min = COALESCE(excluded.caffeine_delayed_90min, caffeine_delayed_90min),
                cold_exposure = COALESCE(excluded.cold_exposure, cold_exposure),
                meditation_minutes = COALESCE(excluded.meditation_minutes, meditation_minutes),
                exercise_done = COALESCE(excluded.exercise_done, exercise_done),
                intention = COALESCE(excluded.intention, intention),
                identity_affirmation = COALESCE(excluded.identity_affirmation, identity_affirmation),
                creative_observation = COALESCE(excluded.creative_observation, creative_observation),
                top3 = COALESCE(excluded.top3, top3)",
            params![
                entry.id,
                log.wake_time,
                log.sunlight_minutes,
                log.caffeine_delayed_90min,
                log.cold_exposure,
                log.meditation_minutes,
                log.exercise_done,
                log.intention,
                log.identity_affirmation,
                log.creative_observation,
                log.top3,
            ],
        )?;
        tx.execute(
            "UPDATE daily_entries SET morning_completed = 1 WHERE id = ?1",
            params![entry.id],
        )?;
        tx.commit()?;

        self.emit(Event::MorningLogSaved { date });
        self.get_or_create_daily_entry(user, date)
    }

    /// Save the evening review and mark it complete for the day.
    pub fn save_evening_log(
        &self,
        user: &UserId,
        date: DateKey,
        log: &EveningLog,
    ) -> Result<DailyEntry> {
        log.validate()?;
        let entry = self.get_or_create_daily_entry(user, date)?;

        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "INSERT INTO evening_logs (
                entry_id, wins, owned_failure, emotional_pattern, shadow_insight,
                creative_capture, tomorrow_focus, sleep_target_time
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(entry_id) DO UPDATE SET
                wins = COALESCE(excluded.wins, wins),
                owned_failure = COALESCE(excluded.owned_failure, owned_failure),
                emotional_pattern = COALESCE(excluded.emotional_pattern, emotional_pattern),
                shadow_insight = COALESCE(excluded.shadow_insight, shadow_insight),
                creative_capture = COALESCE(excluded.creative_capture, creative_capture),
                tomorrow_focus = COALESCE(excluded.tomorrow_focus, tomorrow_focus),
                sleep_target_time = COALESCE(excluded.sleep_target_time, sleep_target_time)",
            params![
                entry.id,
                log.wins,
                log.owned_failure,
                log.emotional_pattern,
                log.shadow_insight,
                log.creative_capture,
                log.tomorrow_focus,
                log.sleep_target_time,
            ],
        )?;
        tx.execute(
            "UPDATE daily_entries SET evening_completed = 1 WHERE id = ?1",
            params![entry.id],
        )?;
        tx.commit()?;

        self.emit(Event::EveningLogSaved { date });
        self.get_or_create_daily_entry(user, date)
    }

    fn with_logs(&self, mut entry: DailyEntry) -> Result<DailyEntry> {
        entry.morning_log = self
            .conn()
            .query_row(
                "SELECT wake_time, sunlight_minutes, caffeine_delayed_90min, cold_exposure,
                        meditation_minutes, exercise_done, intention, identity_affirmation,
                        creative_observation, top3
                 FROM morning_logs WHERE entry_id = ?1",
                params![entry.id],
                |row| {
                    Ok(MorningLog {
                        wake_time: row.get(0)?,
                        sunlight_minutes: row.get(1)?,
                        caffeine_delayed_90min: row.get(2)?,
                        cold_exposure: row.get(3)?,
                        meditation_minutes: row.get(4)?,
                        exercise_done: row.get(5)?,
                        intention: row.get(6)?,
                        identity_affirmation: row.get(7)?,
                        creative_observation: row.get(8)?,
                        top3: row.get(9)?,
                    })
                },
            )
            .optional()?;
        entry.evening_log = self
            .conn()
            .query_row(
                "SELECT wins, owned_failure, emotional_pattern, shadow_insight,
                        creative_capture, tomorrow_focus, sleep_target_time
                 FROM evening_logs WHERE entry_id = ?1",
                params![entry.id],
                |row| {
                    Ok(EveningLog {
                        wins: row.get(0)?,
                        owned_failure: row.get(1)?,
                        emotional_pattern: row.get(2)?,
                        shadow_insight: row.get(3)?,
                        creative_capture: row.get(4)?,
                        tomorrow_focus: row.get(5)?,
                        sleep_target_time: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    fn setup() -> (Database, UserId, DateKey) {
        (
            Database::open_memory().unwrap(),
            UserId::new("alice").unwrap(),
            DateKey::from_ymd(2024, 4, 2).unwrap(),
        )
    }

    #[test]
    fn get_or_create_is_stable() {
        let (db, user, day) = setup();
        let first = db.get_or_create_daily_entry(&user, day).unwrap();
        let second = db.get_or_create_daily_entry(&user, day).unwrap();
        assert_eq!(first.id, second.id);
        assert!(!first.morning_completed);
        assert!(first.morning_log.is_none());
    }

    #[test]
    fn morning_log_marks_completion_and_merges_fields() {
        let (db, user, day) = setup();
        let log = MorningLog {
            wake_time: Some("06:10".into()),
            meditation_minutes: Some(10),
            intention: Some("Ship it".into()),
            ..MorningLog::default()
        };
        let entry = db.save_morning_log(&user, day, &log).unwrap();
        assert!(entry.morning_completed);
        assert!(!entry.evening_completed);

        let update = MorningLog {
            cold_exposure: Some(true),
            ..MorningLog::default()
        };
        let entry = db.save_morning_log(&user, day, &update).unwrap();
        let stored = entry.morning_log.unwrap();
        assert_eq!(stored.wake_time.as_deref(), Some("06:10"));
        assert_eq!(stored.meditation_minutes, Some(10));
        assert_eq!(stored.cold_exposure, Some(true));
        assert_eq!(
            db.drain_events(),
            vec![
                Event::MorningLogSaved { date: day },
                Event::MorningLogSaved { date: day }
            ]
        );
    }

    #[test]
    fn evening_log_round_trip() {
        let (db, user, day) = setup();
        let log = EveningLog {
            wins: Some("Finished chapter".into()),
            sleep_target_time: Some("22:45".into()),
            ..EveningLog::default()
        };
        db.save_evening_log(&user, day, &log).unwrap();
        let entry = db.get_daily_entry(&user, day).unwrap().unwrap();
        assert!(entry.evening_completed);
        assert_eq!(entry.evening_log.unwrap(), log);
    }

    #[test]
    fn invalid_wake_time_is_rejected_before_writing() {
        let (db, user, day) = setup();
        let log = MorningLog {
            wake_time: Some("early".into()),
            ..MorningLog::default()
        };
        assert!(matches!(
            db.save_morning_log(&user, day, &log),
            Err(CoreError::Validation(ValidationError::InvalidValue { .. }))
        ));
        assert!(db.get_daily_entry(&user, day).unwrap().is_none());
    }

    #[test]
    fn entries_are_per_user_and_newest_first() {
        let (db, alice, day) = setup();
        let bob = UserId::new("bob").unwrap();
        db.get_or_create_daily_entry(&alice, day).unwrap();
        db.get_or_create_daily_entry(&alice, day.add_days(1)).unwrap();
        db.get_or_create_daily_entry(&bob, day).unwrap();

        let entries = db.list_daily_entries(&alice).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, day.add_days(1));
        assert!(db.get_daily_entry(&bob, day.add_days(1)).unwrap().is_none());
    }
}
