//! Visible-list composition from the canonical event set.
//!
//! # Responsibility
//! - Combine query matching with pin semantics into the displayed list.
//!
//! # Invariants
//! - Outside pins-only mode, every pinned event is visible regardless of the
//!   active query.
//! - Each event appears at most once.
//! - The today marker is never part of the result.
//! - Output depends only on the inputs (no hidden state).

use crate::model::event::{EventId, TimelineEvent};
use crate::search::query::parse_query;
use std::collections::HashSet;

/// Produces the ordered visible list.
///
/// - blank query, `pins_only = false`: all events in natural order
/// - blank query, `pins_only = true`: pinned events in natural order
/// - query, `pins_only = true`: pinned AND matching, natural order
/// - query, `pins_only = false`: matches plus all pinned, deduplicated by id
///   and sorted ascending by date (stable)
pub fn filter_events(
    events: &[TimelineEvent],
    raw_query: &str,
    pins_only: bool,
) -> Vec<TimelineEvent> {
    let searchable = events.iter().filter(|event| event.is_searchable());

    let Some(query) = parse_query(raw_query) else {
        return searchable
            .filter(|event| !pins_only || event.pinned)
            .cloned()
            .collect();
    };

    if pins_only {
        return searchable
            .filter(|event| event.pinned && query.matches(event))
            .cloned()
            .collect();
    }

    let matched = searchable.clone().filter(|event| query.matches(event));
    let pinned = searchable.filter(|event| event.pinned);

    let mut seen = HashSet::<EventId>::new();
    let mut visible = matched
        .chain(pinned)
        .filter(|event| seen.insert(event.id))
        .cloned()
        .collect::<Vec<_>>();
    sort_chronological(&mut visible);
    visible
}

/// Number of events matching `raw_query` (today marker excluded).
///
/// Blank input counts every searchable event.
pub fn count_matches(events: &[TimelineEvent], raw_query: &str) -> usize {
    let searchable = events.iter().filter(|event| event.is_searchable());
    match parse_query(raw_query) {
        Some(query) => searchable.filter(|event| query.matches(event)).count(),
        None => searchable.count(),
    }
}

/// Stable ascending sort by event date.
pub fn sort_chronological(events: &mut [TimelineEvent]) {
    events.sort_by(|a, b| a.date.cmp(&b.date));
}
