//! Timeline mutation use-cases.
//!
//! # Responsibility
//! - Validate and apply UI mutation requests to the canonical event set.
//! - Map every rejection to a stable reason code.
//!
//! # Invariants
//! - Inputs are borrowed and never mutated; success returns a new set.
//! - A rejected mutation leaves the caller's set untouched.
//! - The today marker cannot be edited, pinned or deleted.
//! - Tags are normalized to lowercase before validation.
//!
//! # See also
//! - crate::tags::taxonomy

use crate::model::event::{normalize_text, EventId, TimelineEvent, TODAY_EVENT_ID};
use crate::tags::taxonomy::{
    normalize_tag, validate_tag_add, validate_tag_edit, TagError, TagValidationError,
};
use crate::temporal::{parse_event_date, TemporalError};
use chrono::NaiveDateTime;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TimelineResult<T> = Result<T, TimelineError>;

/// Validation rejection for a timeline mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// Text is blank after trim.
    EmptyText,
    /// Date string does not parse.
    InvalidDate(String),
    /// Malformed `#`/`@` usage.
    InvalidTag { tag: String, reason: TagError },
    /// Event already holds a duration marker.
    DurationConflict { existing: String, attempted: String },
    /// Tag value already present on the event.
    DuplicateTag(String),
    /// No event with this id in the set.
    EventNotFound(EventId),
    /// Tag to edit is not on the event.
    TagNotFound(String),
    /// The synthetic today marker was targeted.
    TodayMarker,
}

impl TimelineError {
    /// Stable snake_case code for UI display mapping.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidTag { .. } => "invalid_tag",
            Self::DurationConflict { .. } => "duration_conflict",
            Self::DuplicateTag(_) => "duplicate_tag",
            Self::EventNotFound(_) => "event_not_found",
            Self::TagNotFound(_) => "tag_not_found",
            Self::TodayMarker => "today_marker",
        }
    }
}

impl Display for TimelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "event text cannot be empty"),
            Self::InvalidDate(value) => write!(f, "invalid date: `{value}`"),
            Self::InvalidTag { tag, reason } => write!(f, "invalid tag `{tag}`: {reason}"),
            Self::DurationConflict {
                existing,
                attempted,
            } => write!(
                f,
                "event already holds duration marker `{existing}`; cannot add `{attempted}`"
            ),
            Self::DuplicateTag(tag) => write!(f, "tag already present: `{tag}`"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::TagNotFound(tag) => write!(f, "tag not found: `{tag}`"),
            Self::TodayMarker => write!(f, "the today marker cannot be modified"),
        }
    }
}

impl Error for TimelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTag { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<TagValidationError> for TimelineError {
    fn from(value: TagValidationError) -> Self {
        match value {
            TagValidationError::Invalid { tag, reason } => Self::InvalidTag { tag, reason },
            TagValidationError::Duplicate(tag) => Self::DuplicateTag(tag),
            TagValidationError::DurationConflict {
                existing,
                attempted,
            } => Self::DurationConflict {
                existing,
                attempted,
            },
        }
    }
}

impl From<TemporalError> for TimelineError {
    fn from(value: TemporalError) -> Self {
        match value {
            TemporalError::InvalidDate(raw) => Self::InvalidDate(raw),
        }
    }
}

/// Full-replacement edit of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUpdate {
    pub text: String,
    /// Raw date input; see [`parse_event_date`] for accepted formats.
    pub date: String,
    /// Replacement tag set; `None` keeps the current tags.
    pub tags: Option<Vec<String>>,
}

/// Prepends a blank draft dated `now` and returns its id.
///
/// The draft carries `is_new` until its first successful update.
pub fn add_event(events: &[TimelineEvent], now: NaiveDateTime) -> (Vec<TimelineEvent>, EventId) {
    let draft = TimelineEvent::draft(now);
    let id = draft.id;
    let mut next = Vec::with_capacity(events.len() + 1);
    next.push(draft);
    next.extend_from_slice(events);
    debug!("event=event_add module=service status=ok draft=true");
    (next, id)
}

/// Creates a complete event in one step and appends it.
pub fn create_event(
    events: &[TimelineEvent],
    text: &str,
    date: &str,
    tags: &[String],
) -> TimelineResult<(Vec<TimelineEvent>, EventId)> {
    let result = build_event(text, date, tags);
    let event = log_outcome("event_create", result)?;
    let id = event.id;
    let mut next = events.to_vec();
    next.push(event);
    Ok((next, id))
}

fn build_event(text: &str, date: &str, tags: &[String]) -> TimelineResult<TimelineEvent> {
    let text = require_text(text)?;
    let date = parse_event_date(date)?;
    let tags = validate_tag_set(tags)?;
    Ok(TimelineEvent::new(date, text).with_tags(tags))
}

/// Replaces text, date and optionally tags of one event.
pub fn update_event(
    events: &[TimelineEvent],
    id: EventId,
    update: &EventUpdate,
) -> TimelineResult<Vec<TimelineEvent>> {
    mutate_event(events, id, "event_update", |event| {
        let text = require_text(&update.text)?;
        let date = parse_event_date(&update.date)?;
        let tags = match &update.tags {
            Some(tags) => validate_tag_set(tags)?,
            None => event.tags.clone(),
        };
        event.text = text;
        event.date = date;
        event.tags = tags;
        event.is_new = false;
        Ok(())
    })
}

/// Removes one event.
pub fn delete_event(events: &[TimelineEvent], id: EventId) -> TimelineResult<Vec<TimelineEvent>> {
    let result = locate(events, id).map(|index| {
        let mut next = events.to_vec();
        next.remove(index);
        next
    });
    log_outcome("event_delete", result)
}

/// Flips the pinned flag of one event.
pub fn toggle_pin(events: &[TimelineEvent], id: EventId) -> TimelineResult<Vec<TimelineEvent>> {
    mutate_event(events, id, "pin_toggle", |event| {
        event.pinned = !event.pinned;
        Ok(())
    })
}

/// Unpins every event.
pub fn clear_pins(events: &[TimelineEvent]) -> Vec<TimelineEvent> {
    let next = events
        .iter()
        .cloned()
        .map(|event| event.pinned(false))
        .collect();
    debug!("event=pins_clear module=service status=ok");
    next
}

/// Adds one validated tag to an event.
pub fn add_tag(
    events: &[TimelineEvent],
    id: EventId,
    tag: &str,
) -> TimelineResult<Vec<TimelineEvent>> {
    mutate_event(events, id, "tag_add", |event| {
        let validated = validate_tag_add(&event.tags, tag)?;
        event.tags.push(validated.value);
        Ok(())
    })
}

/// Replaces `old_tag` with `new_tag` in place.
pub fn edit_tag(
    events: &[TimelineEvent],
    id: EventId,
    old_tag: &str,
    new_tag: &str,
) -> TimelineResult<Vec<TimelineEvent>> {
    mutate_event(events, id, "tag_edit", |event| {
        let old_tag = normalize_tag(old_tag);
        let position = event
            .tags
            .iter()
            .position(|tag| tag == &old_tag)
            .ok_or_else(|| TimelineError::TagNotFound(old_tag.clone()))?;
        let validated = validate_tag_edit(&event.tags, &old_tag, new_tag)?;
        event.tags[position] = validated.value;
        Ok(())
    })
}

/// Removes `tag` from an event. Removing an absent tag is a no-op.
pub fn delete_tag(
    events: &[TimelineEvent],
    id: EventId,
    tag: &str,
) -> TimelineResult<Vec<TimelineEvent>> {
    mutate_event(events, id, "tag_delete", |event| {
        let tag = normalize_tag(tag);
        event.tags.retain(|existing| existing != &tag);
        Ok(())
    })
}

/// Tags offered by the per-event delete menu; empty when `id` is unknown.
pub fn deletable_tags(events: &[TimelineEvent], id: EventId) -> Vec<String> {
    events
        .iter()
        .find(|event| event.id == id && event.is_searchable())
        .map(|event| event.tags.clone())
        .unwrap_or_default()
}

fn mutate_event<F>(
    events: &[TimelineEvent],
    id: EventId,
    operation: &'static str,
    apply: F,
) -> TimelineResult<Vec<TimelineEvent>>
where
    F: FnOnce(&mut TimelineEvent) -> TimelineResult<()>,
{
    let result = locate(events, id).and_then(|index| {
        let mut next = events.to_vec();
        apply(&mut next[index])?;
        Ok(next)
    });
    log_outcome(operation, result)
}

fn locate(events: &[TimelineEvent], id: EventId) -> TimelineResult<usize> {
    if id == TODAY_EVENT_ID {
        return Err(TimelineError::TodayMarker);
    }
    events
        .iter()
        .position(|event| event.id == id && event.is_searchable())
        .ok_or(TimelineError::EventNotFound(id))
}

fn require_text(raw: &str) -> TimelineResult<String> {
    let text = normalize_text(raw);
    if text.is_empty() {
        return Err(TimelineError::EmptyText);
    }
    Ok(text)
}

fn validate_tag_set(tags: &[String]) -> TimelineResult<Vec<String>> {
    let mut accepted = Vec::with_capacity(tags.len());
    for tag in tags {
        let validated = validate_tag_add(&accepted, tag)?;
        accepted.push(validated.value);
    }
    Ok(accepted)
}

fn log_outcome<T>(operation: &'static str, result: TimelineResult<T>) -> TimelineResult<T> {
    match &result {
        Ok(_) => debug!("event={operation} module=service status=ok"),
        Err(err) => info!(
            "event={operation} module=service status=rejected reason={}",
            err.reason_code()
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(raw: &str) -> NaiveDateTime {
        parse_event_date(raw).unwrap()
    }

    #[test]
    fn add_event_prepends_draft() {
        let existing = vec![TimelineEvent::new(dt("2000-01-01"), "old")];
        let (next, id) = add_event(&existing, dt("2024-03-01T10:11:12"));
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].id, id);
        assert!(next[0].is_new);
        assert_eq!(next[0].date, dt("2024-03-01T10:11"));
    }

    #[test]
    fn locate_rejects_today_marker() {
        let events = vec![TimelineEvent::today_marker(dt("2024-01-01"))];
        assert_eq!(
            toggle_pin(&events, TODAY_EVENT_ID),
            Err(TimelineError::TodayMarker)
        );
    }

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(TimelineError::EmptyText.reason_code(), "empty_text");
        assert_eq!(
            TimelineError::from(TemporalError::InvalidDate("x".to_string())).reason_code(),
            "invalid_date"
        );
        assert_eq!(
            TimelineError::from(TagValidationError::Duplicate("x".to_string())).reason_code(),
            "duplicate_tag"
        );
    }

    #[test]
    fn validate_tag_set_normalizes_and_rejects_second_marker() {
        let ok = validate_tag_set(&["Trip".to_string(), "@Kelly".to_string()]).unwrap();
        assert_eq!(ok, vec!["trip".to_string(), "@kelly".to_string()]);
        let err =
            validate_tag_set(&["#start a".to_string(), "#stop b".to_string()]).unwrap_err();
        assert_eq!(err.reason_code(), "duration_conflict");
    }
}
