//! Cross-event duration aggregate.
//!
//! # Responsibility
//! - Summarize, per duration name, whether a `#start` and/or `#stop` marker
//!   exists anywhere in the event set.
//! - Feed tag-box completion with names that are still open.
//!
//! # Invariants
//! - The index is derived on demand and never cached across calls.
//! - Today markers never contribute.

use crate::model::event::TimelineEvent;
use crate::tags::taxonomy::{classify_tag, DurationEdge, TagKind};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Aggregate state of one named duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationState {
    /// Earliest event date carrying `#start <name>`.
    pub first_start: Option<NaiveDateTime>,
    /// Earliest event date carrying `#stop <name>`.
    pub first_stop: Option<NaiveDateTime>,
}

impl DurationState {
    pub fn has_start(&self) -> bool {
        self.first_start.is_some()
    }

    pub fn has_stop(&self) -> bool {
        self.first_stop.is_some()
    }

    /// Both ends are recorded somewhere in the set.
    pub fn is_closed(&self) -> bool {
        self.has_start() && self.has_stop()
    }

    fn record(&mut self, edge: DurationEdge, date: NaiveDateTime) {
        let slot = match edge {
            DurationEdge::Start => &mut self.first_start,
            DurationEdge::Stop => &mut self.first_stop,
        };
        *slot = Some(slot.map_or(date, |current| current.min(date)));
    }
}

/// Per-name duration summary keyed by duration name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationIndex {
    entries: BTreeMap<String, DurationState>,
}

impl DurationIndex {
    pub fn get(&self, name: &str) -> Option<&DurationState> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DurationState)> {
        self.entries.iter().map(|(name, state)| (name.as_str(), state))
    }

    /// Names lacking a start or a stop.
    pub fn open_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, state)| !state.is_closed())
            .map(|(name, _)| name)
    }

    /// Names whose first `#stop` is dated before their first `#start`.
    ///
    /// Report-only; tag validation never consults this.
    pub fn chronology_violations(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, state)| match (state.first_start, state.first_stop) {
                (Some(start), Some(stop)) => stop < start,
                _ => false,
            })
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// Rebuilds the duration index from the whole event set.
pub fn rebuild_durations(events: &[TimelineEvent]) -> DurationIndex {
    let mut index = DurationIndex::default();
    for event in events.iter().filter(|event| event.is_searchable()) {
        for tag in &event.tags {
            if let Ok(TagKind::DurationMarker { edge, name }) = classify_tag(tag) {
                index
                    .entries
                    .entry(name)
                    .or_default()
                    .record(edge, event.date);
            }
        }
    }
    index
}
