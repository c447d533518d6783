use serde::{Deserialize, Serialize};

use super::check_range;
use crate::date::DateKey;
use crate::error::ValidationError;

/// Screen-time and media-diet log, one per user per day.
///
/// Unset fields keep their stored value on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateKey>,
    pub phone_minutes: Option<u32>,
    pub social_media_minutes: Option<u32>,
    pub main_apps: Option<String>,
    /// 1..=5
    pub content_quality: Option<u8>,
    pub mental_impact: Option<String>,
    pub what_triggered: Option<String>,
    pub intention: Option<String>,
}

impl ConsumptionLog {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("content_quality", self.content_quality.map(i64::from), 1, 5)
    }
}

/// Averages over recent logs, newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionTrend {
    pub avg_content_quality: f64,
    pub avg_phone_minutes: f64,
    /// Phone minutes of the newest log minus the one before it.
    pub phone_change: Option<i64>,
}

impl ConsumptionTrend {
    /// Logs must be ordered newest first. Missing or zero values are left
    /// out of each average.
    pub fn from_logs(logs: &[ConsumptionLog]) -> Self {
        fn average(values: impl Iterator<Item = u32>) -> f64 {
            let (sum, count) = values
                .filter(|v| *v > 0)
                .fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
            sum as f64 / count.max(1) as f64
        }

        let phone_change = match logs {
            [latest, previous, ..] => match (latest.phone_minutes, previous.phone_minutes) {
                (Some(a), Some(b)) if a > 0 && b > 0 => Some(i64::from(a) - i64::from(b)),
                _ => None,
            },
            _ => None,
        };

        Self {
            avg_content_quality: average(
                logs.iter().filter_map(|l| l.content_quality.map(u32::from)),
            ),
            avg_phone_minutes: average(logs.iter().filter_map(|l| l.phone_minutes)),
            phone_change,
        }
    }
}
