//! Tag classification and per-event validation rules.
//!
//! # Responsibility
//! - Classify tag strings into person, duration-marker and plain kinds.
//! - Validate tag add/edit requests against one event's current tag set.
//!
//! # Invariants
//! - Classification is a pure function of the tag string.
//! - A tag set accepted by [`validate_tag_add`] never holds two duration
//!   markers or two equal values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const PERSON_PREFIX: char = '@';
const HASH_PREFIX: char = '#';
const START_PREFIX: &str = "#start ";
const STOP_PREFIX: &str = "#stop ";

/// Which end of a named duration a marker tag denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEdge {
    Start,
    Stop,
}

impl DurationEdge {
    /// Tag prefix including the trailing space, e.g. `#start `.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Start => START_PREFIX,
            Self::Stop => STOP_PREFIX,
        }
    }

    /// Renders the full marker tag for `name`.
    pub fn tag_for(self, name: &str) -> String {
        format!("{}{name}", self.prefix())
    }
}

/// Classified kind of one tag string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagKind {
    /// `@name`
    Person { name: String },
    /// `#start name` or `#stop name`
    DurationMarker { edge: DurationEdge, name: String },
    /// Anything without `#`/`@`.
    Plain,
}

/// Why a tag string is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagError {
    /// Blank after normalization.
    Empty,
    /// A lone `@`.
    BareMention,
    /// `@` tag containing another `@` or a `#`.
    MalformedMention,
    /// `#` prefix other than `#start ` / `#stop `.
    UnknownHashPrefix,
    /// `#start` / `#stop` without a name.
    EmptyDurationName,
    /// `#` or `@` inside a plain tag or duration name.
    ReservedCharacter,
}

impl Display for TagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::Empty => "tag cannot be empty",
            Self::BareMention => "person tag needs a name after `@`",
            Self::MalformedMention => "person tag may not contain `#` or a second `@`",
            Self::UnknownHashPrefix => "`#` tags must be `#start <name>` or `#stop <name>`",
            Self::EmptyDurationName => "duration marker needs a name",
            Self::ReservedCharacter => "`#` and `@` are reserved for structured tags",
        };
        f.write_str(message)
    }
}

impl Error for TagError {}

/// Rejection of a tag add/edit request against one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    Invalid { tag: String, reason: TagError },
    Duplicate(String),
    /// The event already holds `existing`; `attempted` would be a second marker.
    DurationConflict { existing: String, attempted: String },
}

impl Display for TagValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { tag, reason } => write!(f, "invalid tag `{tag}`: {reason}"),
            Self::Duplicate(tag) => write!(f, "tag already present: `{tag}`"),
            Self::DurationConflict {
                existing,
                attempted,
            } => write!(
                f,
                "event already holds duration marker `{existing}`; cannot add `{attempted}`"
            ),
        }
    }
}

impl Error for TagValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// A tag that passed validation, with its normalized value and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTag {
    pub value: String,
    pub kind: TagKind,
}

/// Normalizes user tag input: trim, lowercase, collapse inner whitespace.
pub fn normalize_tag(raw: &str) -> String {
    WHITESPACE_RE
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// Classifies one tag string.
pub fn classify_tag(tag: &str) -> Result<TagKind, TagError> {
    if tag.trim().is_empty() {
        return Err(TagError::Empty);
    }

    if let Some(name) = tag.strip_prefix(PERSON_PREFIX) {
        if name.is_empty() {
            return Err(TagError::BareMention);
        }
        if name.contains(PERSON_PREFIX) || name.contains(HASH_PREFIX) {
            return Err(TagError::MalformedMention);
        }
        return Ok(TagKind::Person {
            name: name.to_string(),
        });
    }

    if tag.starts_with(HASH_PREFIX) {
        return classify_duration_marker(tag);
    }

    if tag.contains(PERSON_PREFIX) || tag.contains(HASH_PREFIX) {
        return Err(TagError::ReservedCharacter);
    }
    Ok(TagKind::Plain)
}

fn classify_duration_marker(tag: &str) -> Result<TagKind, TagError> {
    let (edge, rest) = if let Some(rest) = tag.strip_prefix(START_PREFIX) {
        (DurationEdge::Start, rest)
    } else if let Some(rest) = tag.strip_prefix(STOP_PREFIX) {
        (DurationEdge::Stop, rest)
    } else if tag.trim_end() == START_PREFIX.trim_end() || tag.trim_end() == STOP_PREFIX.trim_end()
    {
        return Err(TagError::EmptyDurationName);
    } else {
        return Err(TagError::UnknownHashPrefix);
    };

    let name = rest.trim();
    if name.is_empty() {
        return Err(TagError::EmptyDurationName);
    }
    if name.contains(PERSON_PREFIX) || name.contains(HASH_PREFIX) {
        return Err(TagError::ReservedCharacter);
    }
    Ok(TagKind::DurationMarker {
        edge,
        name: name.to_string(),
    })
}

/// Returns the duration marker in `tags`, if any.
pub fn find_duration_marker(tags: &[String]) -> Option<&String> {
    tags.iter()
        .find(|tag| matches!(classify_tag(tag), Ok(TagKind::DurationMarker { .. })))
}

/// Validates adding `new_tag` to an event holding `existing`.
///
/// Checks run in order: malformed tag, duplicate value, second duration
/// marker. `new_tag` is normalized first.
pub fn validate_tag_add(
    existing: &[String],
    new_tag: &str,
) -> Result<ValidatedTag, TagValidationError> {
    let value = normalize_tag(new_tag);
    let kind = classify_tag(&value).map_err(|reason| TagValidationError::Invalid {
        tag: value.clone(),
        reason,
    })?;

    if existing.iter().any(|tag| tag == &value) {
        return Err(TagValidationError::Duplicate(value));
    }

    if matches!(kind, TagKind::DurationMarker { .. }) {
        if let Some(marker) = find_duration_marker(existing) {
            return Err(TagValidationError::DurationConflict {
                existing: marker.clone(),
                attempted: value,
            });
        }
    }

    Ok(ValidatedTag { value, kind })
}

/// Validates replacing `old_tag` with `new_tag`.
///
/// The replacement is checked as a fresh add against the set without
/// `old_tag`, so swapping `#start x` for `#stop x` is allowed.
pub fn validate_tag_edit(
    existing: &[String],
    old_tag: &str,
    new_tag: &str,
) -> Result<ValidatedTag, TagValidationError> {
    let remaining = existing
        .iter()
        .filter(|tag| tag.as_str() != old_tag)
        .cloned()
        .collect::<Vec<_>>();
    validate_tag_add(&remaining, new_tag)
}
