//! Core domain logic for ContexTime.
//! This crate is the single source of truth for timeline invariants:
//! query matching, pin-aware filtering, tag validation and upcoming
//! scheduling. Every operation is a pure function of its inputs.

pub mod logging;
pub mod model;
pub mod schedule;
pub mod search;
pub mod service;
pub mod tags;
pub mod temporal;
pub mod view;

pub use logging::{default_log_level, init_logging, init_logging_from_env, logging_status};
pub use model::event::{EventId, EventValidationError, TimelineEvent, TODAY_EVENT_ID};
pub use model::import::{export_event, import_events, ImportReport, RawEvent, SkippedRow};
pub use schedule::upcoming::{
    upcoming_events, SortMode, UpcomingEvent, UpcomingOptions, UpcomingSource,
};
pub use search::filter::{count_matches, filter_events, sort_chronological};
pub use search::query::{parse_query, ParsedQuery};
pub use search::suggest::{derive_vocabulary, suggest_search, suggest_tags, Vocabulary};
pub use service::timeline_service::{
    add_event, add_tag, clear_pins, create_event, deletable_tags, delete_event, delete_tag,
    edit_tag, toggle_pin, update_event, EventUpdate, TimelineError, TimelineResult,
};
pub use tags::duration::{rebuild_durations, DurationIndex, DurationState};
pub use tags::taxonomy::{
    classify_tag, normalize_tag, validate_tag_add, validate_tag_edit, DurationEdge, TagError,
    TagKind, TagValidationError,
};
pub use temporal::{parse_event_date, TemporalError};
pub use view::stats::{pinned_count, show_pin_controls, timeline_stats, TimelineStats};
pub use view::timeline::{timeline_rows, with_today_marker, TimelineRow};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
