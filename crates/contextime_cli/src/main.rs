//! Command-line front end over a JSON events file.
//!
//! # Responsibility
//! - Load an events file leniently and run one core use case per invocation.
//! - Render results as plain text lines or, with `--json`, as JSON.
//!
//! # Invariants
//! - The events file is never written.
//! - Rows that fail to decode are skipped with a warning on stderr.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use contextime_core::temporal::format_long;
use contextime_core::{
    count_matches, derive_vocabulary, filter_events, import_events, init_logging_from_env,
    parse_event_date, pinned_count, suggest_search, suggest_tags, timeline_rows, timeline_stats,
    upcoming_events, RawEvent, SortMode, TimelineEvent, TimelineRow, UpcomingOptions,
};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

const HISTORY_LABEL: &str = "History starts here";
const FUTURE_LABEL: &str = "Into the future";

#[derive(Parser)]
#[command(name = "contextime")]
#[command(version, about = "Search and schedule a personal event timeline")]
struct Cli {
    /// JSON file holding an array of events
    file: PathBuf,

    /// Print JSON instead of text lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter events with the boolean query language (`a b + c`)
    Search {
        /// Query terms; `+` separates OR groups
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,

        /// Only show pinned events
        #[arg(long)]
        pins_only: bool,
    },
    /// List upcoming anniversaries and near-future events
    Upcoming {
        /// Ordering of the merged list
        #[arg(long, default_value = "month-day")]
        sort: SortMode,

        /// Reference time (`yyyy-MM-ddTHH:mm[:ss]`); defaults to local now
        #[arg(long)]
        now: Option<String>,
    },
    /// Show timeline statistics
    Stats,
    /// Suggest search words or tags for a partial input
    Suggest {
        partial: String,

        /// Suggest tags (including duration completions) instead of words
        #[arg(long)]
        tags: bool,

        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print the chronological timeline with the today marker
    Timeline {
        /// Reference time (`yyyy-MM-ddTHH:mm[:ss]`); defaults to local now
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = init_logging_from_env() {
        eprintln!("warning: file logging disabled: {err}");
    }

    let events = load_events(&cli.file)?;
    match cli.command {
        Commands::Search { query, pins_only } => {
            run_search(&events, &query.join(" "), pins_only, cli.json)
        }
        Commands::Upcoming { sort, now } => {
            run_upcoming(&events, sort, resolve_now(now.as_deref())?, cli.json)
        }
        Commands::Stats => run_stats(&events, cli.json),
        Commands::Suggest {
            partial,
            tags,
            limit,
        } => run_suggest(&events, &partial, tags, limit, cli.json),
        Commands::Timeline { now } => {
            run_timeline(&events, resolve_now(now.as_deref())?, cli.json)
        }
    }
}

fn load_events(path: &Path) -> Result<Vec<TimelineEvent>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read events file `{}`", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .with_context(|| format!("`{}` is not a JSON array", path.display()))?;

    let mut skipped = 0usize;
    let rows = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawEvent>(value) {
            Ok(row) => Some(row),
            Err(err) => {
                eprintln!("warning: skipping row {index}: {err}");
                skipped += 1;
                None
            }
        })
        .collect::<Vec<_>>();

    let report = import_events(rows);
    for row in &report.skipped {
        eprintln!("warning: skipping event {}: {}", row.index, row.reason);
    }
    skipped += report.skipped.len();
    if skipped > 0 {
        warn!(
            "event=events_load module=cli status=partial loaded={} skipped={}",
            report.events.len(),
            skipped
        );
    } else {
        info!(
            "event=events_load module=cli status=ok loaded={}",
            report.events.len()
        );
    }
    Ok(report.events)
}

fn resolve_now(raw: Option<&str>) -> Result<NaiveDateTime> {
    match raw {
        Some(value) => {
            parse_event_date(value).with_context(|| format!("invalid --now value `{value}`"))
        }
        None => Ok(Local::now().naive_local()),
    }
}

fn run_search(events: &[TimelineEvent], query: &str, pins_only: bool, json: bool) -> Result<()> {
    let visible = filter_events(events, query, pins_only);
    if json {
        return print_json(&visible);
    }
    for event in &visible {
        println!("{}", render_event(event));
    }
    if !query.trim().is_empty() {
        println!("{} matching event(s)", count_matches(events, query));
    }
    Ok(())
}

fn run_upcoming(
    events: &[TimelineEvent],
    sort: SortMode,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let upcoming = upcoming_events(events, now, &UpcomingOptions::with_sort_mode(sort));
    if json {
        return print_json(&upcoming);
    }
    for entry in &upcoming {
        println!("{}", entry.label());
    }
    Ok(())
}

fn run_stats(events: &[TimelineEvent], json: bool) -> Result<()> {
    let stats = timeline_stats(events);
    if json {
        return print_json(&stats);
    }
    match stats.summary() {
        Some(summary) => println!("{summary}"),
        None => println!("no events"),
    }
    println!("{} pinned", pinned_count(events));
    Ok(())
}

fn run_suggest(
    events: &[TimelineEvent],
    partial: &str,
    tags: bool,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let suggestions = if tags {
        suggest_tags(events, partial, &[], limit)
    } else {
        suggest_search(&derive_vocabulary(events), partial, limit)
    };
    if json {
        return print_json(&suggestions);
    }
    for suggestion in &suggestions {
        println!("{suggestion}");
    }
    Ok(())
}

fn run_timeline(events: &[TimelineEvent], now: NaiveDateTime, json: bool) -> Result<()> {
    let rows = timeline_rows(events, now);
    if json {
        return print_json(&rows);
    }
    for row in &rows {
        match row {
            TimelineRow::HistoryLabel => println!("-- {HISTORY_LABEL} --"),
            TimelineRow::FutureLabel => println!("-- {FUTURE_LABEL} --"),
            TimelineRow::Event { event } => println!("{}", render_event(event)),
        }
    }
    Ok(())
}

fn render_event(event: &TimelineEvent) -> String {
    let mut line = format!("{}  {}", format_long(event.date), event.text);
    if !event.tags.is_empty() {
        line.push_str(&format!("  [{}]", event.tags.join(", ")));
    }
    if event.pinned {
        line.push_str("  (pinned)");
    }
    line
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    println!("{rendered}");
    Ok(())
}
