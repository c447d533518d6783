//! Calendar-day keys.
//!
//! Every journal record is addressed by a [`DateKey`]: a calendar day with no
//! time or zone component. Differencing two keys is plain day arithmetic on
//! [`NaiveDate`], so daylight-saving transitions can never shift a result.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A timezone-independent calendar day, written `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parse a zero-padded ISO calendar date.
    ///
    /// Anything other than exactly `YYYY-MM-DD` naming a real day is rejected;
    /// no trimming or repair is attempted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let bytes = input.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shape_ok {
            return Err(ValidationError::invalid_date(input));
        }
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(DateKey)
            .map_err(|_| ValidationError::invalid_date(input))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DateKey)
    }

    /// The current day on the local calendar.
    pub fn today() -> Self {
        DateKey(Local::now().date_naive())
    }

    /// The day `n` days before today.
    pub fn days_ago(n: i64) -> Self {
        Self::today().add_days(-n)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn add_days(&self, days: i64) -> Self {
        DateKey(self.0 + Duration::days(days))
    }

    /// Whole days from `earlier` to `self`; negative when `earlier` is later.
    pub fn days_since(&self, earlier: DateKey) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    /// Ordinal within the year, 1 for January 1st.
    pub fn day_of_year(&self) -> u32 {
        self.0.ordinal()
    }

    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    /// Monday of the week containing this day.
    pub fn week_start(&self) -> Self {
        let offset = self.0.weekday().num_days_from_monday();
        self.add_days(-(offset as i64))
    }

    /// Sunday of the week containing this day.
    pub fn week_end(&self) -> Self {
        self.week_start().add_days(6)
    }

    /// e.g. `Monday, January 1`
    pub fn format_long(&self) -> String {
        self.0.format("%A, %B %-d").to_string()
    }

    /// e.g. `Jan 1`
    pub fn format_short(&self) -> String {
        self.0.format("%b %-d").to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse(s)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateKey::parse(&raw).map_err(de::Error::custom)
    }
}

impl ToSql for DateKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for DateKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        DateKey::parse(raw).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Render a minute count as `45m`, `2h` or `1h 30m`.
pub fn minutes_to_hours(minutes: u32) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    match (h, m) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    #[test]
    fn parse_accepts_iso_days() {
        let key = d("2024-02-29");
        assert_eq!(key.to_string(), "2024-02-29");
        assert_eq!(key, DateKey::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in [
            "",
            "2024-1-01",
            "2024-01-1",
            "20240101",
            "2024/01/01",
            "2024-13-01",
            "2023-02-29",
            " 2024-01-01",
            "2024-01-01T12:00:00",
            "abcd-ef-gh",
        ] {
            assert_eq!(
                DateKey::parse(bad),
                Err(ValidationError::InvalidDateFormat {
                    input: bad.to_string()
                }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn days_since_crosses_dst_and_year_boundaries() {
        assert_eq!(d("2024-03-11").days_since(d("2024-03-10")), 1);
        assert_eq!(d("2024-11-04").days_since(d("2024-11-03")), 1);
        assert_eq!(d("2025-01-01").days_since(d("2024-12-31")), 1);
        assert_eq!(d("2024-01-01").days_since(d("2024-01-03")), -2);
    }

    #[test]
    fn day_of_year_starts_at_one() {
        assert_eq!(d("2024-01-01").day_of_year(), 1);
        assert_eq!(d("2024-12-31").day_of_year(), 366);
        assert_eq!(d("2023-12-31").day_of_year(), 365);
    }

    #[test]
    fn week_bounds_are_monday_to_sunday() {
        // 2024-06-12 is a Wednesday
        assert_eq!(d("2024-06-12").week_start(), d("2024-06-10"));
        assert_eq!(d("2024-06-10").week_start(), d("2024-06-10"));
        assert_eq!(d("2024-06-16").week_start(), d("2024-06-10"));
        assert_eq!(d("2024-06-10").week_end(), d("2024-06-16"));
        assert_eq!(d("2024-06-12").week_end(), d("2024-06-16"));
        assert_eq!(d("2024-06-16").week_end(), d("2024-06-16"));
        assert_eq!(d("2024-06-17").week_end(), d("2024-06-23"));
    }

    #[test]
    fn days_ago_counts_back_from_today() {
        let today = DateKey::today();
        let week_back = DateKey::days_ago(7);
        // midnight may pass between the two calls
        assert!(matches!(today.days_since(week_back), 6 | 7));
    }

    #[test]
    fn display_formats() {
        assert_eq!(d("2024-01-01").format_long(), "Monday, January 1");
        assert_eq!(d("2024-07-04").format_short(), "Jul 4");
    }

    #[test]
    fn serde_uses_iso_string() {
        let json = serde_json::to_string(&d("2024-05-06")).unwrap();
        assert_eq!(json, "\"2024-05-06\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d("2024-05-06"));
        assert!(serde_json::from_str::<DateKey>("\"May 6\"").is_err());
    }

    #[test]
    fn minutes_render_compactly() {
        assert_eq!(minutes_to_hours(0), "0m");
        assert_eq!(minutes_to_hours(45), "45m");
        assert_eq!(minutes_to_hours(120), "2h");
        assert_eq!(minutes_to_hours(90), "1h 30m");
    }
}
