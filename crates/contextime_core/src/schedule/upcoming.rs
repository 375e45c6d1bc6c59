//! Upcoming list: recurring anniversaries plus near-future events.
//!
//! # Responsibility
//! - Project every event's month/day/time onto the year of `now` and rank the
//!   nearest anniversaries.
//! - Collect literal events inside the near-future window.
//! - Merge both lists and order them by the selected [`SortMode`].
//!
//! # Invariants
//! - `now` is always an explicit input; the system clock is never read.
//! - An event appears at most once in the merged list.
//! - Anniversaries never lie before the start of today.
//! - Today markers never contribute.

use crate::model::event::{EventId, TimelineEvent};
use crate::temporal::{self, format_month_day, start_of_day, with_year_clamped};
use chrono::{Datelike, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Default cap for each of the two sub-lists.
pub const UPCOMING_DEFAULT_LIMIT: usize = 5;
/// Default near-future window in days, measured from start of today.
pub const NEAR_FUTURE_WINDOW_DAYS: i64 = 7;

/// Ordering applied to the merged upcoming list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Next occurrence of month/day, rolled into next year once passed.
    #[default]
    #[serde(rename = "month-day")]
    MonthDay,
    /// Literal event date/time.
    #[serde(rename = "absolute")]
    Absolute,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MonthDay => "month-day",
            Self::Absolute => "absolute",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::MonthDay => Self::Absolute,
            Self::Absolute => Self::MonthDay,
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized sort mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortModeError(pub String);

impl Display for ParseSortModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported sort mode `{}`; expected month-day|absolute",
            self.0
        )
    }
}

impl Error for ParseSortModeError {}

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month-day" | "monthday" | "month_day" => Ok(Self::MonthDay),
            "absolute" => Ok(Self::Absolute),
            other => Err(ParseSortModeError(other.to_string())),
        }
    }
}

/// Tunables for [`upcoming_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingOptions {
    pub anniversary_limit: usize,
    pub near_future_limit: usize,
    pub window_days: i64,
    pub sort_mode: SortMode,
}

impl Default for UpcomingOptions {
    fn default() -> Self {
        Self {
            anniversary_limit: UPCOMING_DEFAULT_LIMIT,
            near_future_limit: UPCOMING_DEFAULT_LIMIT,
            window_days: NEAR_FUTURE_WINDOW_DAYS,
            sort_mode: SortMode::default(),
        }
    }
}

impl UpcomingOptions {
    /// Default options with the given sort mode.
    pub fn with_sort_mode(sort_mode: SortMode) -> Self {
        Self {
            sort_mode,
            ..Self::default()
        }
    }
}

/// Which branch produced an upcoming entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingSource {
    Anniversary,
    NearFuture,
}

/// One entry of the upcoming list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEvent {
    pub event: TimelineEvent,
    pub source: UpcomingSource,
    /// Projected occurrence; set for anniversary entries.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_event_date::serialize"
    )]
    pub anniversary: Option<NaiveDateTime>,
    /// Whole days from start of today to the anniversary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until: Option<i64>,
    /// Anniversary year minus the event's year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<i32>,
}

impl UpcomingEvent {
    pub fn id(&self) -> EventId {
        self.event.id
    }

    /// Display line, e.g. `august 26 - i was born (in 238 days it will be 42 years)`.
    ///
    /// The parenthetical is shown only for positive year counts.
    pub fn label(&self) -> String {
        let head = format!("{} - {}", format_month_day(self.event.date), self.event.text);
        match (self.days_until, self.years) {
            (Some(days), Some(years)) if years > 0 => {
                format!("{head} (in {days} days it will be {years} years)")
            }
            _ => head,
        }
    }
}

mod optional_event_date {
    use crate::temporal::format_event_date;
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&format_event_date(*date)),
            None => serializer.serialize_none(),
        }
    }
}

/// Next occurrence of `date`'s month/day/time at or after `today_start`.
///
/// Feb 29 falls on Feb 28 in non-leap years.
pub fn next_anniversary(date: NaiveDateTime, today_start: NaiveDateTime) -> Option<NaiveDateTime> {
    let year = today_start.year();
    let projected = with_year_clamped(date, year)?;
    if projected < today_start {
        with_year_clamped(date, year + 1)
    } else {
        Some(projected)
    }
}

/// Nearest anniversaries, ascending by `days_until`, capped at `limit`.
pub fn upcoming_anniversaries(
    events: &[TimelineEvent],
    now: NaiveDateTime,
    limit: usize,
) -> Vec<UpcomingEvent> {
    let today_start = start_of_day(now);
    let mut entries = events
        .iter()
        .filter(|event| event.is_searchable())
        .filter_map(|event| {
            let anniversary = next_anniversary(event.date, today_start)?;
            let days_until = temporal::day_difference(anniversary, today_start);
            Some(UpcomingEvent {
                event: event.clone(),
                source: UpcomingSource::Anniversary,
                anniversary: Some(anniversary),
                days_until: Some(days_until),
                years: Some(anniversary.year() - event.date.year()),
            })
        })
        .filter(|entry| entry.days_until.is_some_and(|days| days >= 0))
        .collect::<Vec<_>>();

    entries.sort_by_key(|entry| entry.days_until);
    entries.truncate(limit);
    entries
}

/// Literal events strictly inside `(start of today, start of today + window)`.
pub fn near_future_events(
    events: &[TimelineEvent],
    now: NaiveDateTime,
    window_days: i64,
    limit: usize,
) -> Vec<UpcomingEvent> {
    let today_start = start_of_day(now);
    let window_end = temporal::add_days(today_start, window_days).unwrap_or(if window_days < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    });
    let mut entries = events
        .iter()
        .filter(|event| event.is_searchable())
        .filter(|event| {
            temporal::is_after(event.date, today_start) && temporal::is_before(event.date, window_end)
        })
        .map(|event| UpcomingEvent {
            event: event.clone(),
            source: UpcomingSource::NearFuture,
            anniversary: None,
            days_until: None,
            years: None,
        })
        .collect::<Vec<_>>();

    entries.sort_by(|a, b| temporal::compare_chronological(a.event.date, b.event.date));
    entries.truncate(limit);
    entries
}

/// Merged upcoming list ordered by `options.sort_mode`.
///
/// Anniversary entries come first in the concatenation, so an event found by
/// both branches keeps its anniversary annotation.
pub fn upcoming_events(
    events: &[TimelineEvent],
    now: NaiveDateTime,
    options: &UpcomingOptions,
) -> Vec<UpcomingEvent> {
    let anniversaries = upcoming_anniversaries(events, now, options.anniversary_limit);
    let near_future = near_future_events(events, now, options.window_days, options.near_future_limit);
    let (anniversary_count, near_future_count) = (anniversaries.len(), near_future.len());

    let mut seen = HashSet::<EventId>::new();
    let mut merged = anniversaries
        .into_iter()
        .chain(near_future)
        .filter(|entry| seen.insert(entry.id()))
        .collect::<Vec<_>>();

    let today_start = start_of_day(now);
    match options.sort_mode {
        SortMode::MonthDay => merged.sort_by_key(|entry| {
            next_anniversary(entry.event.date, today_start).unwrap_or(entry.event.date)
        }),
        SortMode::Absolute => merged.sort_by_key(|entry| entry.event.date),
    }

    debug!(
        "event=upcoming_computed module=schedule status=ok anniversaries={} near_future={} merged={} sort_mode={}",
        anniversary_count,
        near_future_count,
        merged.len(),
        options.sort_mode
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::parse_event_date;

    fn dt(raw: &str) -> NaiveDateTime {
        parse_event_date(raw).unwrap()
    }

    #[test]
    fn anniversary_projects_into_current_year() {
        let events = vec![TimelineEvent::new(dt("1982-08-26T08:45"), "i was born")];
        let entries = upcoming_anniversaries(&events, dt("2024-01-01T09:30"), 5);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].anniversary, Some(dt("2024-08-26T08:45")));
        assert_eq!(entries[0].days_until, Some(238));
        assert_eq!(entries[0].years, Some(42));
        assert_eq!(
            entries[0].label(),
            "august 26 - i was born (in 238 days it will be 42 years)"
        );
    }

    #[test]
    fn anniversary_rolls_forward_once_passed() {
        let events = vec![TimelineEvent::new(dt("1982-08-26T08:45"), "i was born")];
        let entries = upcoming_anniversaries(&events, dt("2024-09-01T00:00"), 5);
        assert_eq!(entries[0].anniversary, Some(dt("2025-08-26T08:45")));
        assert_eq!(entries[0].years, Some(43));
    }

    #[test]
    fn anniversary_earlier_today_still_counts_as_today() {
        let events = vec![TimelineEvent::new(dt("2000-05-05T01:00"), "x")];
        let entries = upcoming_anniversaries(&events, dt("2024-05-05T23:00"), 5);
        assert_eq!(entries[0].anniversary, Some(dt("2024-05-05T01:00")));
        assert_eq!(entries[0].days_until, Some(0));
    }

    #[test]
    fn leap_day_anniversary_in_common_year() {
        let events = vec![TimelineEvent::new(dt("2000-02-29T12:00"), "leap")];
        let entries = upcoming_anniversaries(&events, dt("2023-02-01"), 5);
        assert_eq!(entries[0].anniversary, Some(dt("2023-02-28T12:00")));
    }

    #[test]
    fn near_future_window_is_exclusive() {
        let now = dt("2024-06-10T15:00");
        let events = vec![
            TimelineEvent::new(dt("2024-06-10T00:00"), "start of today"),
            TimelineEvent::new(dt("2024-06-10T09:00"), "this morning"),
            TimelineEvent::new(dt("2024-06-16T23:59"), "edge inside"),
            TimelineEvent::new(dt("2024-06-17T00:00"), "edge outside"),
        ];
        let texts = near_future_events(&events, now, 7, 5)
            .into_iter()
            .map(|entry| entry.event.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["this morning", "edge inside"]);
    }

    #[test]
    fn merge_dedups_and_orders_by_mode() {
        let now = dt("2024-11-20T10:00");
        let events = vec![
            TimelineEvent::new(dt("1990-01-03T08:00"), "january thing"),
            TimelineEvent::new(dt("2024-11-22T18:00"), "dinner"),
            TimelineEvent::new(dt("2010-12-01T08:00"), "december thing"),
        ];

        let month_day = upcoming_events(&events, now, &UpcomingOptions::default());
        let texts = month_day
            .iter()
            .map(|entry| entry.event.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["dinner", "december thing", "january thing"]);
        let dinner = &month_day[0];
        assert_eq!(dinner.source, UpcomingSource::Anniversary);
        assert_eq!(dinner.years, Some(0));
        assert_eq!(dinner.label(), "november 22 - dinner");

        let absolute = upcoming_events(
            &events,
            now,
            &UpcomingOptions::with_sort_mode(SortMode::Absolute),
        );
        let texts = absolute
            .iter()
            .map(|entry| entry.event.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["january thing", "december thing", "dinner"]);
    }

    #[test]
    fn each_branch_is_capped() {
        let now = dt("2024-01-01");
        let events = (1..=9)
            .map(|day| TimelineEvent::new(dt(&format!("2024-01-0{day}T12:00")), "e"))
            .collect::<Vec<_>>();
        assert_eq!(upcoming_anniversaries(&events, now, 5).len(), 5);
        assert_eq!(near_future_events(&events, now, 7, 5).len(), 5);
        assert_eq!(upcoming_events(&events, now, &UpcomingOptions::default()).len(), 5);
    }

    #[test]
    fn sort_mode_parses_and_toggles() {
        assert_eq!("month-day".parse::<SortMode>(), Ok(SortMode::MonthDay));
        assert_eq!(" Absolute ".parse::<SortMode>(), Ok(SortMode::Absolute));
        assert!("weekly".parse::<SortMode>().is_err());
        assert_eq!(SortMode::MonthDay.toggled(), SortMode::Absolute);
        assert_eq!(SortMode::Absolute.toggled().to_string(), "month-day");
    }

    #[test]
    fn far_future_now_saturates_the_window() {
        let now = dt("+262142-12-30T00:00:00");
        assert!(upcoming_events(&[], now, &UpcomingOptions::default()).is_empty());

        let events = vec![TimelineEvent::new(dt("+262142-12-31T08:00"), "last day")];
        let upcoming = upcoming_events(&events, now, &UpcomingOptions::default());
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].source, UpcomingSource::Anniversary);
        assert_eq!(upcoming[0].days_until, Some(1));
        assert_eq!(near_future_events(&events, now, 7, 5).len(), 1);
    }
}
