use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_clock, check_not_blank, check_range};
use crate::date::DateKey;
use crate::error::ValidationError;

/// One sleep log per user per day. Unset fields keep their stored value on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepLog {
    pub bedtime: Option<String>,
    pub wake_time: Option<String>,
    /// 1..=10
    pub quality: Option<u8>,
    pub notes: Option<String>,
}

impl SleepLog {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_clock("bedtime", self.bedtime.as_deref())?;
        check_clock("wake_time", self.wake_time.as_deref())?;
        check_range("quality", self.quality.map(i64::from), 1, 10)
    }
}

/// The nine physiological adaptations a workout can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingAdaptation {
    Strength,
    Hypertrophy,
    Power,
    Speed,
    #[serde(rename = "VO2 Max")]
    Vo2Max,
    #[serde(rename = "Lactate Threshold")]
    LactateThreshold,
    #[serde(rename = "Muscular Endurance")]
    MuscularEndurance,
    #[serde(rename = "Long Slow Distance")]
    LongSlowDistance,
    Skill,
}

impl TrainingAdaptation {
    pub const ALL: [TrainingAdaptation; 9] = [
        TrainingAdaptation::Strength,
        TrainingAdaptation::Hypertrophy,
        TrainingAdaptation::Power,
        TrainingAdaptation::Speed,
        TrainingAdaptation::Vo2Max,
        TrainingAdaptation::LactateThreshold,
        TrainingAdaptation::MuscularEndurance,
        TrainingAdaptation::LongSlowDistance,
        TrainingAdaptation::Skill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingAdaptation::Strength => "Strength",
            TrainingAdaptation::Hypertrophy => "Hypertrophy",
            TrainingAdaptation::Power => "Power",
            TrainingAdaptation::Speed => "Speed",
            TrainingAdaptation::Vo2Max => "VO2 Max",
            TrainingAdaptation::LactateThreshold => "Lactate Threshold",
            TrainingAdaptation::MuscularEndurance => "Muscular Endurance",
            TrainingAdaptation::LongSlowDistance => "Long Slow Distance",
            TrainingAdaptation::Skill => "Skill",
        }
    }
}

impl fmt::Display for TrainingAdaptation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingAdaptation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "adaptation".into(),
                message: format!("unknown training adaptation '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub date: DateKey,
    pub workout_type: String,
    pub adaptation: Option<TrainingAdaptation>,
    pub duration_min: Option<u32>,
    pub intensity: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
    pub date: DateKey,
    pub workout_type: String,
    pub adaptation: Option<TrainingAdaptation>,
    pub duration_min: Option<u32>,
    pub intensity: Option<u8>,
    pub notes: Option<String>,
}

impl NewWorkout {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("workout_type", &self.workout_type)?;
        check_range("intensity", self.intensity.map(i64::from), 1, 10)
    }
}

/// Days in a range on which each protocol was kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolScore {
    pub sleep_days: u32,
    pub workout_days: u32,
    pub meditation_days: u32,
}

impl ProtocolScore {
    /// Days kept out of 21 possible (three protocols over seven days), as a
    /// rounded percentage.
    pub fn percent(&self) -> u32 {
        let kept = self.sleep_days + self.workout_days + self.meditation_days;
        (f64::from(kept) / 21.0 * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptation_round_trips_labels() {
        for a in TrainingAdaptation::ALL {
            assert_eq!(a.as_str().parse::<TrainingAdaptation>().unwrap(), a);
        }
        assert_eq!(
            "long-slow-distance".parse::<TrainingAdaptation>().unwrap(),
            TrainingAdaptation::LongSlowDistance
        );
        assert!("cardio".parse::<TrainingAdaptation>().is_err());
    }

    #[test]
    fn protocol_percent_over_21() {
        let score = ProtocolScore {
            sleep_days: 7,
            workout_days: 3,
            meditation_days: 5,
        };
        assert_eq!(score.percent(), 71);
        assert_eq!(ProtocolScore::default().percent(), 0);
    }

    #[test]
    fn sleep_validation() {
        let log = SleepLog {
            quality: Some(11),
            ..SleepLog::default()
        };
        assert!(log.validate().is_err());
        let log = SleepLog {
            bedtime: Some("23:15".into()),
            quality: Some(8),
            ..SleepLog::default()
        };
        assert!(log.validate().is_ok());
    }
}
