//! Timeline event domain model.
//!
//! # Responsibility
//! - Define the canonical dated record owned by the UI collaborator.
//! - Provide constructors for persisted events and the synthetic today marker.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `text` is lowercase; persisted events never carry blank text.
//! - `tags` hold unique values with at most one duration marker.
//! - `is_today` events are never stored in the canonical set.
//!
//! # See also
//! - crate::tags::taxonomy

use crate::tags::taxonomy::{classify_tag, TagError, TagKind};
use crate::temporal::{self, serde_event_date};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every timeline event.
pub type EventId = Uuid;

/// Sentinel id carried by the synthetic today marker.
pub const TODAY_EVENT_ID: EventId = Uuid::nil();

/// Display text of the synthetic today marker.
pub const TODAY_EVENT_TEXT: &str = "today";

/// Validation errors for event shape invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Text is blank after trim.
    EmptyText,
    /// A tag fails taxonomy rules.
    InvalidTag { tag: String, reason: TagError },
    /// The same tag value appears twice.
    DuplicateTag(String),
    /// More than one `#start`/`#stop` marker on one event.
    MultipleDurationMarkers,
    /// Persisted events may not use the today sentinel.
    ReservedId,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "event text cannot be empty"),
            Self::InvalidTag { tag, reason } => write!(f, "invalid tag `{tag}`: {reason}"),
            Self::DuplicateTag(tag) => write!(f, "duplicate tag `{tag}`"),
            Self::MultipleDurationMarkers => {
                write!(f, "event holds more than one duration marker")
            }
            Self::ReservedId => write!(f, "event id is reserved for the today marker"),
        }
    }
}

impl Error for EventValidationError {}

/// Canonical dated record in the personal timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: EventId,
    /// Local wall-clock time, serialized as `yyyy-MM-ddTHH:mm:ss`.
    #[serde(with = "serde_event_date")]
    pub date: NaiveDateTime,
    pub text: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Awaiting first save; cleared by a successful update.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_new: bool,
    /// Synthetic today marker; excluded from search, counts and editing.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_today: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TimelineEvent {
    /// Creates a persisted event with a generated stable ID.
    ///
    /// Text is normalized (trimmed, lowercased) but not validated.
    pub fn new(date: NaiveDateTime, text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), date, text)
    }

    /// Creates an event with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: EventId, date: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            id,
            date,
            text: normalize_text(&text.into()),
            pinned: false,
            tags: Vec::new(),
            is_new: false,
            is_today: false,
        }
    }

    /// Creates a blank draft dated `now` (minute precision), flagged `is_new`.
    pub fn draft(now: NaiveDateTime) -> Self {
        let mut event = Self::new(temporal::truncate_to_minute(now), "");
        event.is_new = true;
        event
    }

    /// Synthesizes the today marker for `now`.
    pub fn today_marker(now: NaiveDateTime) -> Self {
        Self {
            id: TODAY_EVENT_ID,
            date: now,
            text: TODAY_EVENT_TEXT.to_string(),
            pinned: false,
            tags: Vec::new(),
            is_new: false,
            is_today: true,
        }
    }

    /// Builder-style tag attachment for fixtures and import paths.
    ///
    /// Does not validate; call [`TimelineEvent::validate`] afterwards.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style pin flag.
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Whether the event takes part in search, counts and aggregates.
    pub fn is_searchable(&self) -> bool {
        !self.is_today
    }

    /// Whether the event carries `tag` (exact value).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Validates persisted-event invariants.
    ///
    /// Draft events (`is_new`) may carry blank text until first save.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id == TODAY_EVENT_ID && !self.is_today {
            return Err(EventValidationError::ReservedId);
        }
        if !self.is_new && self.text.trim().is_empty() {
            return Err(EventValidationError::EmptyText);
        }

        let mut markers = 0usize;
        for (index, tag) in self.tags.iter().enumerate() {
            let kind = classify_tag(tag).map_err(|reason| EventValidationError::InvalidTag {
                tag: tag.clone(),
                reason,
            })?;
            if self.tags[..index].contains(tag) {
                return Err(EventValidationError::DuplicateTag(tag.clone()));
            }
            if matches!(kind, TagKind::DurationMarker { .. }) {
                markers += 1;
            }
        }
        if markers > 1 {
            return Err(EventValidationError::MultipleDurationMarkers);
        }
        Ok(())
    }
}

/// Normalizes free text: trims and lowercases.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::parse_event_date;

    fn dt(raw: &str) -> NaiveDateTime {
        parse_event_date(raw).expect("valid test date")
    }

    #[test]
    fn new_normalizes_text_and_sets_defaults() {
        let event = TimelineEvent::new(dt("1982-08-26T08:45"), "  I Was Born  ");
        assert_eq!(event.text, "i was born");
        assert!(!event.pinned);
        assert!(event.tags.is_empty());
        assert!(!event.is_new);
        assert!(event.is_searchable());
        assert_ne!(event.id, TODAY_EVENT_ID);
    }

    #[test]
    fn draft_is_new_and_truncated_to_minute() {
        let draft = TimelineEvent::draft(dt("2024-03-01T10:11:12"));
        assert!(draft.is_new);
        assert_eq!(draft.date, dt("2024-03-01T10:11"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn today_marker_is_not_searchable() {
        let marker = TimelineEvent::today_marker(dt("2024-03-01T10:11:12"));
        assert_eq!(marker.id, TODAY_EVENT_ID);
        assert!(!marker.is_searchable());
        assert!(marker.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_text_duplicates_and_double_markers() {
        let blank = TimelineEvent::new(dt("2024-01-01"), "   ");
        assert_eq!(blank.validate(), Err(EventValidationError::EmptyText));

        let dup = TimelineEvent::new(dt("2024-01-01"), "x").with_tags(["trip", "trip"]);
        assert_eq!(
            dup.validate(),
            Err(EventValidationError::DuplicateTag("trip".to_string()))
        );

        let markers =
            TimelineEvent::new(dt("2024-01-01"), "x").with_tags(["#start job", "#stop job"]);
        assert_eq!(
            markers.validate(),
            Err(EventValidationError::MultipleDurationMarkers)
        );

        let reserved = TimelineEvent::with_id(TODAY_EVENT_ID, dt("2024-01-01"), "x");
        assert_eq!(reserved.validate(), Err(EventValidationError::ReservedId));
    }
}
