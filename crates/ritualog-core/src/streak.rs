//! Consecutive-day streaks.
//!
//! A streak counts calendar days with a completion, walking backward from a
//! reference day. The reference day itself may still be open: a run that
//! ends yesterday is alive. The count is always re-derived from the stored
//! completion dates, never kept as a counter.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::date::DateKey;
use crate::error::ValidationError;

/// What to do with completion dates after the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FutureDatePolicy {
    /// Skip them and keep counting from the reference day.
    #[default]
    Ignore,
    /// Stop counting as soon as one is met.
    Break,
}

/// Streak calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator {
    policy: FutureDatePolicy,
}

impl StreakCalculator {
    /// Create a calculator that ignores future dates.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FutureDatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FutureDatePolicy {
        self.policy
    }

    /// Length of the run of consecutive days ending at `as_of` or the day
    /// before it.
    ///
    /// Input order and duplicates do not matter.
    pub fn compute<I>(&self, dates: I, as_of: DateKey) -> u32
    where
        I: IntoIterator<Item = DateKey>,
    {
        let unique: BTreeSet<DateKey> = dates.into_iter().collect();

        let mut streak = 0;
        let mut cursor = as_of;
        for date in unique.into_iter().rev() {
            let gap = cursor.days_since(date);
            if gap < 0 {
                match self.policy {
                    FutureDatePolicy::Ignore => continue,
                    FutureDatePolicy::Break => break,
                }
            }
            if gap > 1 {
                break;
            }
            streak += 1;
            cursor = date;
        }
        streak
    }

    /// [`compute`](Self::compute) over ISO date strings.
    ///
    /// Every input is validated before counting, so a malformed date fails
    /// even when it would lie beyond a break.
    pub fn compute_str<S: AsRef<str>>(
        &self,
        dates: &[S],
        as_of: &str,
    ) -> Result<u32, ValidationError> {
        let as_of = DateKey::parse(as_of)?;
        let parsed = dates
            .iter()
            .map(|d| DateKey::parse(d.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.compute(parsed, as_of))
    }
}

/// Streak with the default policy.
pub fn compute_streak<I>(dates: I, as_of: DateKey) -> u32
where
    I: IntoIterator<Item = DateKey>,
{
    StreakCalculator::new().compute(dates, as_of)
}
