//! Wall-clock date arithmetic shared by search, scheduling and views.
//!
//! # Responsibility
//! - Parse and render event dates in the canonical local format.
//! - Provide day/year arithmetic used by anniversary projection.
//!
//! # Invariants
//! - All values are local wall-clock `NaiveDateTime`; no timezone conversion.
//! - Functions never read the system clock; callers pass `now` explicitly.
//! - Only [`parse_event_date`] has an error path.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Canonical serialized event date format (`yyyy-MM-ddTHH:mm:ss`).
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const MINUTE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAY_DATE_FORMAT: &str = "%Y-%m-%d";
const LONG_FORMAT: &str = "%B %-d, %Y %-I:%M %p";
const CLOCK_FORMAT: &str = "%B %-d, %Y %-I:%M:%S %p";
const LONG_DATE_FORMAT: &str = "%B %-d, %Y";
const MONTH_DAY_FORMAT: &str = "%B %-d";

/// Date parsing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// Input is not a recognized local date or date-time.
    InvalidDate(String),
}

impl Display for TemporalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => write!(f, "invalid date: `{value}`"),
        }
    }
}

impl Error for TemporalError {}

/// Parses an event date.
///
/// Accepts `yyyy-MM-ddTHH:mm:ss`, `yyyy-MM-ddTHH:mm` and `yyyy-MM-dd`
/// (midnight). Surrounding whitespace is ignored.
pub fn parse_event_date(raw: &str) -> Result<NaiveDateTime, TemporalError> {
    let value = raw.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, EVENT_DATE_FORMAT) {
        return Ok(parsed);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, MINUTE_DATE_FORMAT) {
        return Ok(parsed);
    }
    NaiveDate::parse_from_str(value, DAY_DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| TemporalError::InvalidDate(raw.to_string()))
}

/// Renders a date in the canonical serialized format.
pub fn format_event_date(value: NaiveDateTime) -> String {
    value.format(EVENT_DATE_FORMAT).to_string()
}

/// Long human format used for search matching, e.g. `august 26, 1982 8:45 am`.
pub fn format_long(value: NaiveDateTime) -> String {
    value.format(LONG_FORMAT).to_string().to_lowercase()
}

/// Clock display format with seconds, e.g. `august 26, 1982 8:45:00 am`.
pub fn format_clock(value: NaiveDateTime) -> String {
    value.format(CLOCK_FORMAT).to_string().to_lowercase()
}

/// Date-only long format, e.g. `august 26, 1982`.
pub fn format_long_date(value: NaiveDateTime) -> String {
    value.format(LONG_DATE_FORMAT).to_string().to_lowercase()
}

/// Month/day label, e.g. `august 26`.
pub fn format_month_day(value: NaiveDateTime) -> String {
    value.format(MONTH_DAY_FORMAT).to_string().to_lowercase()
}

/// Midnight of the same calendar day.
pub fn start_of_day(value: NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(NaiveTime::MIN)
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

/// Adds (or subtracts) whole calendar days.
///
/// Returns `None` when the result leaves chrono's representable range.
pub fn add_days(value: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    Duration::try_days(days).and_then(|delta| value.checked_add_signed(delta))
}

/// Adds (or subtracts) whole calendar years.
///
/// Feb 29 maps to Feb 28 when the target year is not a leap year.
pub fn add_years(value: NaiveDateTime, years: i32) -> NaiveDateTime {
    let months = Months::new(years.unsigned_abs().saturating_mul(12));
    let shifted = if years >= 0 {
        value.checked_add_months(months)
    } else {
        value.checked_sub_months(months)
    };
    shifted.unwrap_or(value)
}

/// Projects `value`'s month/day/time onto `year`.
///
/// Returns `None` only when `year` is outside chrono's representable range.
pub fn with_year_clamped(value: NaiveDateTime, year: i32) -> Option<NaiveDateTime> {
    let date = value.date();
    let projected = NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))?;
    Some(projected.and_time(value.time()))
}

/// Whole days from `b` to `a` (`a - b`), truncated toward zero.
pub fn day_difference(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    (a - b).num_days()
}

/// Whole calendar years from `b` to `a` (`a - b`), truncated toward zero.
pub fn year_difference(a: NaiveDateTime, b: NaiveDateTime) -> i32 {
    let (later, earlier, sign) = if a >= b { (a, b, 1) } else { (b, a, -1) };
    let mut years = later.year() - earlier.year();
    if years > 0 && add_years(earlier, years) > later {
        years -= 1;
    }
    sign * years
}

pub fn is_before(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a < b
}

pub fn is_after(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a > b
}

/// Ascending chronological comparator.
pub fn compare_chronological(a: NaiveDateTime, b: NaiveDateTime) -> Ordering {
    a.cmp(&b)
}

/// Serde adapter storing event dates as `yyyy-MM-ddTHH:mm:ss` strings.
///
/// Deserialization accepts every format [`parse_event_date`] accepts.
pub mod serde_event_date {
    use super::{format_event_date, parse_event_date};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_event_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_event_date(&raw).map_err(serde::de::Error::custom)
    }
}
