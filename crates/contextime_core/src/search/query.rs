//! Boolean search language: `+` separates OR-groups, whitespace separates
//! AND-terms inside a group.
//!
//! # Responsibility
//! - Compile raw search input into [`ParsedQuery`].
//! - Evaluate a parsed query against one event.
//!
//! # Invariants
//! - Blank input parses to `None` ("no filter"), never to "match nothing".
//! - Terms are lowercase substrings; matching is case-insensitive.
//! - The today marker never matches.

use crate::model::event::TimelineEvent;
use crate::temporal::format_long;

const GROUP_SEPARATOR: char = '+';

/// Parsed search query: OR over groups, AND over terms within a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    groups: Vec<Vec<String>>,
}

impl ParsedQuery {
    /// Ordered OR-groups of ordered AND-terms.
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    /// Whether `event` satisfies every term of at least one group.
    pub fn matches(&self, event: &TimelineEvent) -> bool {
        if !event.is_searchable() {
            return false;
        }
        let haystack = MatchTarget::new(event);
        self.groups
            .iter()
            .any(|terms| terms.iter().all(|term| haystack.contains(term)))
    }
}

/// Parses raw search input.
///
/// Returns `None` for empty/whitespace input. Input made only of `+`
/// separators yields a query with no groups, which matches nothing.
pub fn parse_query(raw: &str) -> Option<ParsedQuery> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let groups = normalized
        .split(GROUP_SEPARATOR)
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(|group| {
            group
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|terms| !terms.is_empty())
        .collect();

    Some(ParsedQuery { groups })
}

/// Searchable fields of one event, rendered once per match call.
struct MatchTarget<'a> {
    text: String,
    date: String,
    tags: &'a [String],
}

impl<'a> MatchTarget<'a> {
    fn new(event: &'a TimelineEvent) -> Self {
        Self {
            text: event.text.to_lowercase(),
            date: format_long(event.date),
            tags: &event.tags,
        }
    }

    fn contains(&self, term: &str) -> bool {
        self.text.contains(term)
            || self.date.contains(term)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(term))
    }
}
