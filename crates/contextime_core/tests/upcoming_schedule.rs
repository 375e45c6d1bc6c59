use chrono::NaiveDateTime;
use contextime_core::{
    parse_event_date, upcoming_events, SortMode, TimelineEvent, UpcomingOptions, UpcomingSource,
};

fn dt(raw: &str) -> NaiveDateTime {
    parse_event_date(raw).unwrap()
}

fn family_timeline() -> Vec<TimelineEvent> {
    vec![
        TimelineEvent::new(dt("1976-09-18T14:30"), "brady was born"),
        TimelineEvent::new(dt("1980-03-10T09:15"), "blake was born"),
        TimelineEvent::new(dt("1980-07-07T12:00"), "kelly was born"),
        TimelineEvent::new(dt("1982-08-26T08:45"), "i was born"),
        TimelineEvent::new(dt("2013-01-26T16:20"), "wedding"),
        TimelineEvent::new(dt("2014-07-15T10:30"), "august was born"),
        TimelineEvent::new(dt("2016-09-05T14:00"), "evan was born"),
    ]
}

#[test]
fn anniversary_rollover_matches_reference_dates() {
    let events = vec![TimelineEvent::new(dt("1982-08-26"), "i was born")];

    let january = upcoming_events(&events, dt("2024-01-01T08:00"), &UpcomingOptions::default());
    assert_eq!(january.len(), 1);
    assert_eq!(january[0].anniversary, Some(dt("2024-08-26")));
    assert_eq!(january[0].days_until, Some(238));
    assert_eq!(january[0].years, Some(42));

    let september = upcoming_events(&events, dt("2024-09-01T08:00"), &UpcomingOptions::default());
    assert_eq!(september[0].anniversary, Some(dt("2025-08-26")));
    assert_eq!(september[0].years, Some(43));
}

#[test]
fn month_day_mode_wraps_into_next_year() {
    let now = dt("2024-11-01T10:00");
    let upcoming = upcoming_events(&family_timeline(), now, &UpcomingOptions::default());
    let texts = upcoming
        .iter()
        .map(|entry| entry.event.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        texts,
        vec![
            "wedding",
            "blake was born",
            "kelly was born",
            "august was born",
            "i was born"
        ]
    );
    assert!(upcoming
        .iter()
        .all(|entry| entry.source == UpcomingSource::Anniversary));
}

#[test]
fn absolute_mode_orders_by_literal_date() {
    let now = dt("2024-11-01T10:00");
    let options = UpcomingOptions::with_sort_mode(SortMode::Absolute);
    let upcoming = upcoming_events(&family_timeline(), now, &options);
    let years = upcoming
        .iter()
        .map(|entry| entry.event.date.format("%Y").to_string())
        .collect::<Vec<_>>();
    assert_eq!(years, vec!["1980", "1980", "1982", "2013", "2014"]);
}

#[test]
fn near_future_event_appears_once_with_anniversary_annotation() {
    let now = dt("2024-05-01T10:00");
    let mut events = family_timeline();
    let dinner = TimelineEvent::new(dt("2024-05-03T19:00"), "dinner");
    let dinner_id = dinner.id;
    events.push(dinner);

    let upcoming = upcoming_events(&events, now, &UpcomingOptions::default());
    let dinners = upcoming
        .iter()
        .filter(|entry| entry.id() == dinner_id)
        .collect::<Vec<_>>();
    assert_eq!(dinners.len(), 1);
    assert_eq!(dinners[0].source, UpcomingSource::Anniversary);
    assert_eq!(dinners[0].days_until, Some(2));
    assert_eq!(dinners[0].label(), "may 3 - dinner");
    assert_eq!(upcoming[0].id(), dinner_id);
}

#[test]
fn near_future_only_events_beyond_anniversary_cap_are_merged() {
    let now = dt("2024-05-01T00:00");
    let mut events = (1..=5)
        .map(|day| TimelineEvent::new(dt(&format!("1990-05-0{day}T06:00")), "old"))
        .collect::<Vec<_>>();
    let trip = TimelineEvent::new(dt("2024-05-06T12:00"), "trip");
    let trip_id = trip.id;
    events.push(trip);

    let upcoming = upcoming_events(&events, now, &UpcomingOptions::default());
    assert_eq!(upcoming.len(), 6);
    let trip_entry = upcoming.iter().find(|entry| entry.id() == trip_id).unwrap();
    assert_eq!(trip_entry.source, UpcomingSource::NearFuture);
    assert_eq!(trip_entry.days_until, None);
    assert_eq!(upcoming.last().unwrap().id(), trip_id);
}

#[test]
fn today_marker_never_scheduled() {
    let now = dt("2024-05-01T10:00");
    let events = vec![TimelineEvent::today_marker(now)];
    assert!(upcoming_events(&events, now, &UpcomingOptions::default()).is_empty());
}

#[test]
fn scheduling_is_deterministic_for_fixed_now() {
    let now = dt("2024-02-10T10:00");
    let events = family_timeline();
    let first = upcoming_events(&events, now, &UpcomingOptions::default());
    let second = upcoming_events(&events, now, &UpcomingOptions::default());
    assert_eq!(first, second);
}
