//! Chronological timeline rows with the synthetic today marker.

use crate::model::event::TimelineEvent;
use crate::search::filter::sort_chronological;
use crate::temporal::{is_after, is_before, start_of_day};
use chrono::NaiveDateTime;
use serde::Serialize;

/// One rendered row of the vertical timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum TimelineRow {
    /// Always the first row.
    HistoryLabel,
    /// Inserted before the first event after start of today that follows a
    /// past event.
    FutureLabel,
    Event { event: TimelineEvent },
}

/// Visible events plus a fresh today marker, sorted ascending (stable).
///
/// The marker sorts after events sharing its exact timestamp.
pub fn with_today_marker(visible: &[TimelineEvent], now: NaiveDateTime) -> Vec<TimelineEvent> {
    let mut rows = visible
        .iter()
        .filter(|event| event.is_searchable())
        .cloned()
        .collect::<Vec<_>>();
    rows.push(TimelineEvent::today_marker(now));
    sort_chronological(&mut rows);
    rows
}

/// Builds timeline rows: history label, events (today marker included) and
/// the future label at the past/future boundary.
pub fn timeline_rows(visible: &[TimelineEvent], now: NaiveDateTime) -> Vec<TimelineRow> {
    let today_start = start_of_day(now);
    let events = with_today_marker(visible, now);
    let mut rows = Vec::with_capacity(events.len() + 2);
    rows.push(TimelineRow::HistoryLabel);

    for (index, event) in events.iter().enumerate() {
        let crosses_boundary = index > 0
            && is_after(event.date, today_start)
            && is_before(events[index - 1].date, today_start);
        if crosses_boundary {
            rows.push(TimelineRow::FutureLabel);
        }
        rows.push(TimelineRow::Event {
            event: event.clone(),
        });
    }
    rows
}
