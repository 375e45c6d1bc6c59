//! Autocomplete vocabulary for the search box and the tag box.
//!
//! # Responsibility
//! - Derive a deduplicated vocabulary (text words + tags) from the event set.
//! - Answer partial-input suggestion requests with a bounded list.
//!
//! # Invariants
//! - The vocabulary is a pure derived view; callers rebuild it when the event
//!   set changes.
//! - Order is first-occurrence order; no ranking.
//! - Closed durations are never offered as prefix completions.

use crate::model::event::TimelineEvent;
use crate::tags::duration::rebuild_durations;
use crate::tags::taxonomy::DurationEdge;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Default number of suggestions returned.
pub const SUGGESTION_DEFAULT_LIMIT: u32 = 10;
/// Hard upper bound for caller-provided limits.
pub const SUGGESTION_LIMIT_MAX: u32 = 50;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}']*").expect("valid token regex"));

/// Deduplicated search vocabulary in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|existing| existing == term)
    }
}

/// Clamps a caller limit: `None`/`0` use the default, values cap at the max.
pub fn normalize_suggestion_limit(limit: Option<u32>) -> usize {
    let applied = match limit {
        None | Some(0) => SUGGESTION_DEFAULT_LIMIT,
        Some(value) => value.min(SUGGESTION_LIMIT_MAX),
    };
    applied as usize
}

/// Collects, event by event, text words and then tag values longer than one
/// character.
pub fn derive_vocabulary(events: &[TimelineEvent]) -> Vocabulary {
    let mut seen = HashSet::<String>::new();
    let mut terms = Vec::new();
    let mut push = |term: String| {
        if term.chars().count() > 1 && seen.insert(term.clone()) {
            terms.push(term);
        }
    };

    for event in events.iter().filter(|event| event.is_searchable()) {
        let text = event.text.to_lowercase();
        for token in TOKEN_RE.find_iter(&text) {
            push(token.as_str().to_string());
        }
        for tag in &event.tags {
            push(tag.to_lowercase());
        }
    }

    Vocabulary { terms }
}

/// Search-box suggestions: vocabulary terms containing `partial`.
pub fn suggest_search(vocabulary: &Vocabulary, partial: &str, limit: Option<u32>) -> Vec<String> {
    let needle = partial.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    vocabulary
        .terms
        .iter()
        .filter(|term| term.contains(&needle))
        .take(normalize_suggestion_limit(limit))
        .cloned()
        .collect()
}

/// Tag-box suggestions.
///
/// Candidates are every known tag containing `partial` (duration markers
/// included), minus the values in `exclude` (the tags already on the edited
/// event). When `partial` starts with `#start ` or `#stop `, that prefix is
/// kept and joined to each open duration name containing the typed name part.
pub fn suggest_tags(
    events: &[TimelineEvent],
    partial: &str,
    exclude: &[String],
    limit: Option<u32>,
) -> Vec<String> {
    let needle = partial.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut seen = exclude.iter().cloned().collect::<HashSet<_>>();
    let mut candidates = Vec::new();
    for event in events.iter().filter(|event| event.is_searchable()) {
        for tag in &event.tags {
            if tag.contains(&needle) && seen.insert(tag.clone()) {
                candidates.push(tag.clone());
            }
        }
    }

    let marker = [DurationEdge::Start, DurationEdge::Stop]
        .into_iter()
        .find_map(|edge| needle.strip_prefix(edge.prefix()).map(|rest| (edge, rest.trim())));
    if let Some((edge, name_part)) = marker {
        let durations = rebuild_durations(events);
        for name in durations.open_names().filter(|name| name.contains(name_part)) {
            let completion = edge.tag_for(name);
            if seen.insert(completion.clone()) {
                candidates.push(completion);
            }
        }
    }

    candidates
        .into_iter()
        .take(normalize_suggestion_limit(limit))
        .collect()
}
