//! Lenient import of externally supplied event rows.
//!
//! # Responsibility
//! - Convert loosely typed rows (string dates, optional ids) into
//!   [`TimelineEvent`] values.
//! - Skip bad rows individually so one malformed event never hides the rest.
//!
//! # Invariants
//! - Accepted events satisfy [`TimelineEvent::validate`] and have unique ids.
//! - Skipped rows are reported by index and reason only; text is not logged.

use crate::model::event::{
    normalize_text, EventId, EventValidationError, TimelineEvent, TODAY_EVENT_ID,
};
use crate::tags::taxonomy::normalize_tag;
use crate::temporal::{format_event_date, parse_event_date};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Event row as supplied by a front end or a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Missing ids get a fresh v4 id.
    #[serde(default)]
    pub id: Option<EventId>,
    pub date: String,
    pub text: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unsaved draft; blank text is accepted.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_new: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One rejected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub index: usize,
    pub reason: String,
}

/// Import outcome: accepted events in input order plus skipped rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub events: Vec<TimelineEvent>,
    pub skipped: Vec<SkippedRow>,
}

/// Converts rows into events, skipping (and logging) invalid ones.
pub fn import_events(rows: Vec<RawEvent>) -> ImportReport {
    let mut report = ImportReport::default();
    let mut seen = HashSet::<EventId>::new();

    for (index, row) in rows.into_iter().enumerate() {
        match convert_row(row, &seen) {
            Ok(event) => {
                seen.insert(event.id);
                report.events.push(event);
            }
            Err(reason) => {
                warn!(
                    "event=event_import module=model status=skipped index={} reason={}",
                    index, reason
                );
                report.skipped.push(SkippedRow { index, reason });
            }
        }
    }
    report
}

fn convert_row(row: RawEvent, seen: &HashSet<EventId>) -> Result<TimelineEvent, String> {
    let id = row.id.unwrap_or_else(Uuid::new_v4);
    if id == TODAY_EVENT_ID {
        return Err("reserved_id".to_string());
    }
    if seen.contains(&id) {
        return Err("duplicate_id".to_string());
    }
    let date = parse_event_date(&row.date).map_err(|_| "invalid_date".to_string())?;
    if !row.is_new && normalize_text(&row.text).is_empty() {
        return Err("empty_text".to_string());
    }

    let tags = row.tags.iter().map(|tag| normalize_tag(tag)).collect::<Vec<_>>();
    let mut event = TimelineEvent::with_id(id, date, row.text)
        .with_tags(tags)
        .pinned(row.pinned);
    event.is_new = row.is_new;
    event.validate().map_err(|err| match err {
        EventValidationError::InvalidTag { .. } => "invalid_tag".to_string(),
        EventValidationError::DuplicateTag(_) => "duplicate_tag".to_string(),
        EventValidationError::MultipleDurationMarkers => {
            "duration_conflict".to_string()
        }
        other => other.to_string(),
    })?;
    Ok(event)
}

/// Converts an event back into its row shape.
pub fn export_event(event: &TimelineEvent) -> RawEvent {
    RawEvent {
        id: Some(event.id),
        date: format_event_date(event.date),
        text: event.text.clone(),
        pinned: event.pinned,
        tags: event.tags.clone(),
        is_new: event.is_new,
    }
}
