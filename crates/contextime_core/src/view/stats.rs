//! Header statistics and pin-control visibility.

use crate::model::event::TimelineEvent;
use crate::temporal::{format_long_date, year_difference};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Pin controls (pins-only toggle, clear pins) need at least this many pins.
pub const PIN_CONTROLS_THRESHOLD: usize = 2;

/// Summary of the currently visible events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineStats {
    pub total_events: usize,
    /// Whole years between the first and last visible event.
    pub total_years: i32,
    pub first_date: Option<NaiveDateTime>,
    pub last_date: Option<NaiveDateTime>,
}

impl TimelineStats {
    /// Header line, e.g. `7 events spanning 40 years (september 18, 1976 -
    /// september 5, 2016)`. `None` when nothing is visible.
    pub fn summary(&self) -> Option<String> {
        let (first, last) = (self.first_date?, self.last_date?);
        Some(format!(
            "{} events spanning {} years ({} - {})",
            self.total_events,
            self.total_years,
            format_long_date(first),
            format_long_date(last)
        ))
    }
}

/// Computes statistics over `visible` (today marker excluded).
pub fn timeline_stats(visible: &[TimelineEvent]) -> TimelineStats {
    let dates = visible
        .iter()
        .filter(|event| event.is_searchable())
        .map(|event| event.date)
        .collect::<Vec<_>>();
    let first_date = dates.iter().min().copied();
    let last_date = dates.iter().max().copied();
    let total_years = match (first_date, last_date) {
        (Some(first), Some(last)) => year_difference(last, first),
        _ => 0,
    };

    TimelineStats {
        total_events: dates.len(),
        total_years,
        first_date,
        last_date,
    }
}

/// Number of pinned events in the canonical set.
pub fn pinned_count(events: &[TimelineEvent]) -> usize {
    events
        .iter()
        .filter(|event| event.is_searchable() && event.pinned)
        .count()
}

/// Whether the pins-only toggle and clear-pins control should be offered.
pub fn show_pin_controls(events: &[TimelineEvent]) -> bool {
    pinned_count(events) >= PIN_CONTROLS_THRESHOLD
}
