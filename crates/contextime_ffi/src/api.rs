//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level timeline functions to Dart via FRB.
//! - Convert between string-typed bridge records and core events.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The bridge holds no state; the caller owns the event list and passes it
//!   on every call.
//! - Rejected mutations return no events; the caller keeps its prior list.
//! - Mutations never drop rows: an input row that fails to decode rejects the
//!   call with `invalid_event_row`. Read-only calls skip such rows.
//!
//! # See also
//! - contextime_core::service::timeline_service

use contextime_core::temporal::format_event_date;
use contextime_core::{
    add_event, add_tag, clear_pins, core_version as core_version_inner, count_matches,
    deletable_tags, delete_event, delete_tag, derive_vocabulary, edit_tag, export_event,
    filter_events, import_events, init_logging as init_logging_inner, parse_event_date,
    ping as ping_inner, pinned_count, show_pin_controls, suggest_search, suggest_tags,
    timeline_stats as timeline_stats_inner, toggle_pin, update_event, upcoming_events, EventId,
    EventUpdate, RawEvent, SortMode, TimelineError, TimelineEvent, TimelineResult,
    UpcomingEvent, UpcomingOptions, UpcomingSource,
};
use log::warn;
use uuid::Uuid;

const EVENT_NOT_FOUND_REASON: &str = "event_not_found";
const INVALID_EVENT_ROW_REASON: &str = "invalid_event_row";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Timeline event as it crosses the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiEvent {
    /// UUID string; blank means "assign a new id".
    pub id: String,
    /// `yyyy-MM-ddTHH:mm:ss`; `yyyy-MM-ddTHH:mm` and `yyyy-MM-dd` are accepted.
    pub date: String,
    pub text: String,
    pub pinned: bool,
    pub tags: Vec<String>,
    /// Unsaved draft created by [`timeline_add_event`].
    pub is_new: bool,
}

/// Result envelope for every timeline mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineActionResponse {
    /// Whether the mutation was applied.
    pub ok: bool,
    /// Full updated event list on success; empty on rejection.
    pub events: Vec<FfiEvent>,
    /// Event touched by the mutation, when there is one.
    pub event_id: Option<String>,
    /// Stable reason code on rejection, e.g. `duration_conflict`.
    pub reason: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TimelineActionResponse {
    fn success(message: impl Into<String>, events: &[TimelineEvent], id: Option<EventId>) -> Self {
        Self {
            ok: true,
            events: events.iter().map(to_ffi_event).collect(),
            event_id: id.map(|id| id.to_string()),
            reason: None,
            message: message.into(),
        }
    }

    fn failure(reason: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            events: Vec::new(),
            event_id: None,
            reason: Some(reason.to_string()),
            message: message.into(),
        }
    }

    fn rejected(operation: &str, err: &TimelineError) -> Self {
        Self::failure(err.reason_code(), format!("{operation} failed: {err}"))
    }
}

/// Visible events for one search/pin state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineFilterResponse {
    pub events: Vec<FfiEvent>,
    /// Events matching the query alone (pins not counted).
    pub match_count: u32,
    pub pinned_count: u32,
    /// Whether pins-only and clear-pins controls should be shown.
    pub show_pin_controls: bool,
}

/// One upcoming entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiUpcomingItem {
    pub event_id: String,
    pub label: String,
    /// `anniversary` or `near_future`.
    pub source: String,
    pub date: String,
    pub anniversary: Option<String>,
    pub days_until: Option<i64>,
    pub years: Option<i32>,
}

/// Upcoming list plus the applied sort mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineUpcomingResponse {
    pub items: Vec<FfiUpcomingItem>,
    /// Applied sort mode (`month-day|absolute`).
    pub sort_mode: String,
    pub message: String,
}

/// Header statistics of a visible event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineStatsResponse {
    pub total_events: u32,
    pub total_years: i32,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub summary: Option<String>,
}

/// Filters `events` by `query` with pin semantics.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics; undecodable rows are skipped and logged.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_filter(events: Vec<FfiEvent>, query: String, pins_only: bool) -> TimelineFilterResponse {
    let events = to_core_events(events);
    let visible = filter_events(&events, &query, pins_only);
    TimelineFilterResponse {
        events: visible.iter().map(to_ffi_event).collect(),
        match_count: saturating_u32(count_matches(&events, &query)),
        pinned_count: saturating_u32(pinned_count(&events)),
        show_pin_controls: show_pin_controls(&events),
    }
}

/// Computes the upcoming list for `now`.
///
/// `sort_mode` accepts `month-day` or `absolute`; blank uses `month-day`.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics; invalid `now` or sort mode yields empty items and a message.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_upcoming(events: Vec<FfiEvent>, now: String, sort_mode: String) -> TimelineUpcomingResponse {
    let sort_mode = if sort_mode.trim().is_empty() {
        SortMode::default()
    } else {
        match sort_mode.parse::<SortMode>() {
            Ok(mode) => mode,
            Err(err) => {
                return TimelineUpcomingResponse {
                    items: Vec::new(),
                    sort_mode: SortMode::default().to_string(),
                    message: format!("timeline_upcoming failed: {err}"),
                };
            }
        }
    };
    let now = match parse_event_date(&now) {
        Ok(now) => now,
        Err(err) => {
            return TimelineUpcomingResponse {
                items: Vec::new(),
                sort_mode: sort_mode.to_string(),
                message: format!("timeline_upcoming failed: {err}"),
            };
        }
    };

    let events = to_core_events(events);
    let items = upcoming_events(&events, now, &UpcomingOptions::with_sort_mode(sort_mode))
        .iter()
        .map(to_ffi_upcoming_item)
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "Nothing upcoming.".to_string()
    } else {
        format!("Found {} upcoming item(s).", items.len())
    };
    TimelineUpcomingResponse {
        items,
        sort_mode: sort_mode.to_string(),
        message,
    }
}

/// Prepends a blank draft dated `now` and returns its id.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_add_event(events: Vec<FfiEvent>, now: String) -> TimelineActionResponse {
    let now = match parse_event_date(&now) {
        Ok(now) => now,
        Err(err) => {
            return TimelineActionResponse::rejected("timeline_add_event", &TimelineError::from(err))
        }
    };
    let events = match to_mutation_events("timeline_add_event", events) {
        Ok(events) => events,
        Err(response) => return response,
    };
    let (next, id) = add_event(&events, now);
    TimelineActionResponse::success("Draft created.", &next, Some(id))
}

/// Saves text, date and optionally tags of one event.
///
/// `tags = None` keeps the current tags.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics; rejection carries a reason code.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_update_event(
    events: Vec<FfiEvent>,
    event_id: String,
    text: String,
    date: String,
    tags: Option<Vec<String>>,
) -> TimelineActionResponse {
    let update = EventUpdate { text, date, tags };
    run_mutation("timeline_update_event", "Event saved.", events, &event_id, |events, id| {
        update_event(events, id, &update)
    })
}

/// Deletes one event.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_delete_event(events: Vec<FfiEvent>, event_id: String) -> TimelineActionResponse {
    run_mutation("timeline_delete_event", "Event deleted.", events, &event_id, delete_event)
}

/// Flips the pinned flag of one event. Also used when an upcoming entry is
/// selected.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_toggle_pin(events: Vec<FfiEvent>, event_id: String) -> TimelineActionResponse {
    run_mutation("timeline_toggle_pin", "Pin toggled.", events, &event_id, toggle_pin)
}

/// Unpins every event. Fails only when an input row cannot be decoded.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_clear_pins(events: Vec<FfiEvent>) -> TimelineActionResponse {
    let events = match to_mutation_events("timeline_clear_pins", events) {
        Ok(events) => events,
        Err(response) => return response,
    };
    TimelineActionResponse::success("Pins cleared.", &clear_pins(&events), None)
}

/// Adds one tag to an event.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics; rejection carries `invalid_tag`, `duplicate_tag` or
///   `duration_conflict`.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_add_tag(events: Vec<FfiEvent>, event_id: String, tag: String) -> TimelineActionResponse {
    run_mutation("timeline_add_tag", "Tag added.", events, &event_id, |events, id| {
        add_tag(events, id, &tag)
    })
}

/// Replaces `old_tag` with `new_tag` on an event.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_edit_tag(
    events: Vec<FfiEvent>,
    event_id: String,
    old_tag: String,
    new_tag: String,
) -> TimelineActionResponse {
    run_mutation("timeline_edit_tag", "Tag updated.", events, &event_id, |events, id| {
        edit_tag(events, id, &old_tag, &new_tag)
    })
}

/// Removes a tag from an event; removing an absent tag succeeds unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_delete_tag(events: Vec<FfiEvent>, event_id: String, tag: String) -> TimelineActionResponse {
    run_mutation("timeline_delete_tag", "Tag deleted.", events, &event_id, |events, id| {
        delete_tag(events, id, &tag)
    })
}

/// Search-box suggestions for `partial`.
///
/// `limit`: `None`/`0` use the default (10); values cap at 50.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_suggest_search(events: Vec<FfiEvent>, partial: String, limit: Option<u32>) -> Vec<String> {
    let events = to_core_events(events);
    suggest_search(&derive_vocabulary(&events), &partial, limit)
}

/// Tag-box suggestions for `partial`.
///
/// Tags already on `event_id` (when given) are not offered again.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_suggest_tags(
    events: Vec<FfiEvent>,
    event_id: Option<String>,
    partial: String,
    limit: Option<u32>,
) -> Vec<String> {
    let events = to_core_events(events);
    let exclude = event_id
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .map(|id| deletable_tags(&events, id))
        .unwrap_or_default();
    suggest_tags(&events, &partial, &exclude, limit)
}

/// Header statistics over the visible events.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_stats(events: Vec<FfiEvent>) -> TimelineStatsResponse {
    let events = to_core_events(events);
    let stats = timeline_stats_inner(&events);
    TimelineStatsResponse {
        total_events: saturating_u32(stats.total_events),
        total_years: stats.total_years,
        first_date: stats.first_date.map(format_event_date),
        last_date: stats.last_date.map(format_event_date),
        summary: stats.summary(),
    }
}

fn run_mutation<F>(
    operation: &str,
    success_message: &str,
    events: Vec<FfiEvent>,
    event_id: &str,
    mutate: F,
) -> TimelineActionResponse
where
    F: FnOnce(&[TimelineEvent], EventId) -> TimelineResult<Vec<TimelineEvent>>,
{
    let Ok(id) = Uuid::parse_str(event_id.trim()) else {
        return TimelineActionResponse::failure(
            EVENT_NOT_FOUND_REASON,
            format!("{operation} failed: invalid event id"),
        );
    };
    let events = match to_mutation_events(operation, events) {
        Ok(events) => events,
        Err(response) => return response,
    };
    match mutate(&events, id) {
        Ok(next) => TimelineActionResponse::success(success_message, &next, Some(id)),
        Err(err) => TimelineActionResponse::rejected(operation, &err),
    }
}

fn to_core_events(events: Vec<FfiEvent>) -> Vec<TimelineEvent> {
    let rows = events
        .into_iter()
        .enumerate()
        .filter_map(|(index, event)| to_raw_event(index, event))
        .collect::<Vec<_>>();
    import_events(rows).events
}

/// Decodes the full list for a mutation.
///
/// Any undecodable row rejects the call, since the returned list replaces the
/// caller's list wholesale.
fn to_mutation_events(
    operation: &str,
    events: Vec<FfiEvent>,
) -> Result<Vec<TimelineEvent>, TimelineActionResponse> {
    let mut rows = Vec::with_capacity(events.len());
    for (index, event) in events.into_iter().enumerate() {
        match to_raw_event(index, event) {
            Some(row) => rows.push(row),
            None => return Err(reject_row(operation, index, "invalid_id")),
        }
    }
    let report = import_events(rows);
    match report.skipped.first() {
        Some(row) => Err(reject_row(operation, row.index, &row.reason)),
        None => Ok(report.events),
    }
}

fn reject_row(operation: &str, index: usize, detail: &str) -> TimelineActionResponse {
    warn!(
        "event=ffi_mutation module=ffi status=rejected operation={} index={} reason={}",
        operation, index, detail
    );
    TimelineActionResponse::failure(
        INVALID_EVENT_ROW_REASON,
        format!("{operation} failed: event {index} cannot be decoded ({detail})"),
    )
}

fn to_raw_event(index: usize, event: FfiEvent) -> Option<RawEvent> {
    let raw_id = event.id.trim();
    let id = if raw_id.is_empty() {
        None
    } else {
        match Uuid::parse_str(raw_id) {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(
                    "event=ffi_event_decode module=ffi status=skipped index={} reason=invalid_id",
                    index
                );
                return None;
            }
        }
    };
    Some(RawEvent {
        id,
        date: event.date,
        text: event.text,
        pinned: event.pinned,
        tags: event.tags,
        is_new: event.is_new,
    })
}

fn to_ffi_event(event: &TimelineEvent) -> FfiEvent {
    let raw = export_event(event);
    FfiEvent {
        id: event.id.to_string(),
        date: raw.date,
        text: raw.text,
        pinned: raw.pinned,
        tags: raw.tags,
        is_new: raw.is_new,
    }
}

fn to_ffi_upcoming_item(entry: &UpcomingEvent) -> FfiUpcomingItem {
    FfiUpcomingItem {
        event_id: entry.id().to_string(),
        label: entry.label(),
        source: upcoming_source_label(entry.source).to_string(),
        date: format_event_date(entry.event.date),
        anniversary: entry.anniversary.map(format_event_date),
        days_until: entry.days_until,
        years: entry.years,
    }
}

fn upcoming_source_label(source: UpcomingSource) -> &'static str {
    match source {
        UpcomingSource::Anniversary => "anniversary",
        UpcomingSource::NearFuture => "near_future",
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
