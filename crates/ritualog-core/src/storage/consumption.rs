//! Screen-time and media-diet logs.

use rusqlite::{params, OptionalExtension, Row};

use super::database::{new_id, Database};
use crate::date::DateKey;
use crate::error::Result;
use crate::events::Event;
use crate::records::{ConsumptionLog, UserId};

pub const RECENT_CONSUMPTION_LIMIT: u32 = 30;

const CONSUMPTION_COLUMNS: &str = "date, phone_minutes, social_media_minutes, main_apps, \
     content_quality, mental_impact, what_triggered, intention";

fn row_to_log(row: &Row) -> rusqlite::Result<ConsumptionLog> {
    Ok(ConsumptionLog {
        date: Some(row.get(0)?),
        phone_minutes: row.get(1)?,
        social_media_minutes: row.get(2)?,
        main_apps: row.get(3)?,
        content_quality: row.get(4)?,
        mental_impact: row.get(5)?,
        what_triggered: row.get(6)?,
        intention: row.get(7)?,
    })
}

impl Database {
    pub fn get_consumption_log(&self, user: &UserId, date: DateKey) -> Result<Option<ConsumptionLog>> {
        let log = self
            .conn()
            .query_row(
                &format!(
                    "SELECT {CONSUMPTION_COLUMNS} FROM consumption_logs
                     WHERE user_id = ?1 AND date = ?2"
                ),
                params![user, date],
                row_to_log,
            )
            .optional()?;
        Ok(log)
    }

    /// Upsert the day's log; unset fields keep their stored value.
    ///
    /// `log.date` is ignored in favour of `date`.
    pub fn save_consumption_log(
        &self,
        user: &UserId,
        date: DateKey,
        log: &ConsumptionLog,
    ) -> Result<ConsumptionLog> {
        log.validate()?;
        self.conn().execute(
            "INSERT INTO consumption_logs (
                id, user_id, date, phone_minutes, social_media_minutes, main_apps,
                content_quality, mental_impact, what_triggered, intention
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(user_id, date) DO UPDATE SET
                phone_minutes = COALESCE(excluded.phone_minutes, phone_minutes),
                social_media_minutes = COALESCE(excluded.social_media_minutes, social_media_minutes),
                main_apps = COALESCE(excluded.main_apps, main_apps),
                content_quality = COALESCE(excluded.content_quality, content_quality),
                mental_impact = COALESCE(excluded.mental_impact, mental_impact),
                what_triggered = COALESCE(excluded.what_triggered, what_triggered),
                intention = COALESCE(excluded.intention, intention)",
            params![
                new_id(),
                user,
                date,
                log.phone_minutes,
                log.social_media_minutes,
                log.main_apps,
                log.content_quality,
                log.mental_impact,
                log.what_triggered,
                log.intention,
            ],
        )?;
        self.emit(Event::ConsumptionLogSaved { date });
        Ok(self.get_consumption_log(user, date)?.unwrap_or_default())
    }

    /// Newest first.
    pub fn recent_consumption_logs(&self, user: &UserId) -> Result<Vec<ConsumptionLog>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {CONSUMPTION_COLUMNS} FROM consumption_logs
             WHERE user_id = ?1
             ORDER BY date DESC
             LIMIT ?2"
        ))?;
        let logs = stmt
            .query_map(params![user, RECENT_CONSUMPTION_LIMIT], row_to_log)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ConsumptionTrend;

    #[test]
    fn save_merges_and_feeds_trend() {
        let db = Database::open_memory().unwrap();
        let user = UserId::new("alice").unwrap();
        let day = DateKey::from_ymd(2024, 2, 1).unwrap();

        db.save_consumption_log(
            &user,
            day,
            &ConsumptionLog {
                phone_minutes: Some(150),
                content_quality: Some(2),
                ..ConsumptionLog::default()
            },
        )
        .unwrap();
        let merged = db
            .save_consumption_log(
                &user,
                day,
                &ConsumptionLog {
                    what_triggered: Some("boredom".into()),
                    ..ConsumptionLog::default()
                },
            )
            .unwrap();
        assert_eq!(merged.date, Some(day));
        assert_eq!(merged.phone_minutes, Some(150));
        assert_eq!(merged.what_triggered.as_deref(), Some("boredom"));

        db.save_consumption_log(
            &user,
            day.add_days(1),
            &ConsumptionLog {
                phone_minutes: Some(100),
                content_quality: Some(4),
                ..ConsumptionLog::default()
            },
        )
        .unwrap();

        let recent = db.recent_consumption_logs(&user).unwrap();
        assert_eq!(recent[0].date, Some(day.add_days(1)));
        let trend = ConsumptionTrend::from_logs(&recent);
        assert_eq!(trend.phone_change, Some(-50));
        assert_eq!(trend.avg_content_quality, 3.0);
    }

    #[test]
    fn missing_log_is_none() {
        let db = Database::open_memory().unwrap();
        let user = UserId::new("alice").unwrap();
        let day = DateKey::from_ymd(2024, 2, 1).unwrap();
        assert!(db.get_consumption_log(&user, day).unwrap().is_none());
    }
}
