use contextime_core::{
    add_tag, deletable_tags, delete_tag, edit_tag, parse_event_date, rebuild_durations,
    suggest_tags, TagError, TimelineError, TimelineEvent,
};

fn single(tags: &[&str]) -> Vec<TimelineEvent> {
    vec![TimelineEvent::new(parse_event_date("2015-03-01T09:00").unwrap(), "new job")
        .with_tags(tags.iter().copied())]
}

#[test]
fn second_duration_marker_is_rejected_and_tags_unchanged() {
    let events = single(&["#start job"]);
    let id = events[0].id;

    for attempt in ["#stop job", "#start other", "#stop other"] {
        let err = add_tag(&events, id, attempt).unwrap_err();
        assert!(
            matches!(err, TimelineError::DurationConflict { .. }),
            "{attempt}: {err:?}"
        );
        assert_eq!(err.reason_code(), "duration_conflict");
    }
    assert_eq!(events[0].tags, vec!["#start job".to_string()]);

    let err = add_tag(&events, id, "#start job").unwrap_err();
    assert_eq!(err, TimelineError::DuplicateTag("#start job".to_string()));
}

#[test]
fn malformed_tags_are_rejected_with_reason() {
    let events = single(&[]);
    let id = events[0].id;
    let cases = [
        ("@", TagError::BareMention),
        ("#vacation", TagError::UnknownHashPrefix),
        ("#start", TagError::EmptyDurationName),
        ("road@trip", TagError::ReservedCharacter),
    ];
    for (tag, reason) in cases {
        let err = add_tag(&events, id, tag).unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidTag {
                tag: tag.to_string(),
                reason
            }
        );
    }
}

#[test]
fn add_tag_normalizes_case_and_whitespace() {
    let events = single(&[]);
    let next = add_tag(&events, events[0].id, "  @Kelly  ").unwrap();
    assert_eq!(next[0].tags, vec!["@kelly".to_string()]);
}

#[test]
fn round_trip_tag_edit_restores_original() {
    let events = single(&["vacation"]);
    let id = events[0].id;

    let renamed = edit_tag(&events, id, "vacation", "trip").unwrap();
    assert_eq!(renamed[0].tags, vec!["trip".to_string()]);

    let restored = edit_tag(&renamed, id, "trip", "vacation").unwrap();
    assert_eq!(restored[0].tags, events[0].tags);
}

#[test]
fn edit_rejects_collisions_and_keeps_prior_tag() {
    let events = single(&["vacation", "beach"]);
    let id = events[0].id;

    let err = edit_tag(&events, id, "vacation", "beach").unwrap_err();
    assert_eq!(err, TimelineError::DuplicateTag("beach".to_string()));

    let err = edit_tag(&events, id, "vacation", "#nope").unwrap_err();
    assert_eq!(err.reason_code(), "invalid_tag");

    let err = edit_tag(&events, id, "missing", "trip").unwrap_err();
    assert_eq!(err, TimelineError::TagNotFound("missing".to_string()));

    let same = edit_tag(&events, id, "vacation", "vacation").unwrap();
    assert_eq!(same[0].tags, events[0].tags);
}

#[test]
fn edit_can_swap_start_for_stop() {
    let events = single(&["#start school", "kids"]);
    let next = edit_tag(&events, events[0].id, "#start school", "#stop school").unwrap();
    assert_eq!(
        next[0].tags,
        vec!["#stop school".to_string(), "kids".to_string()]
    );
}

#[test]
fn delete_tag_always_succeeds() {
    let events = single(&["vacation", "beach"]);
    let id = events[0].id;
    let next = delete_tag(&events, id, "beach").unwrap();
    assert_eq!(next[0].tags, vec!["vacation".to_string()]);
    let unchanged = delete_tag(&next, id, "absent").unwrap();
    assert_eq!(unchanged[0].tags, next[0].tags);
    assert_eq!(deletable_tags(&unchanged, id), vec!["vacation".to_string()]);
}

#[test]
fn duration_completions_follow_the_aggregate() {
    let mut events = single(&["#start job"]);
    let date = parse_event_date("2019-01-01").unwrap();
    events.push(TimelineEvent::new(date, "quit").with_tags(["farewell"]));
    let quit_id = events[1].id;

    assert_eq!(suggest_tags(&events, "job", &[], None), vec!["#start job".to_string()]);
    assert_eq!(suggest_tags(&events, "#stop j", &[], None), vec!["#stop job".to_string()]);

    let closed = add_tag(&events, quit_id, "#stop job").unwrap();
    assert!(rebuild_durations(&closed).get("job").unwrap().is_closed());
    assert_eq!(
        suggest_tags(&closed, "job", &[], None),
        vec!["#start job".to_string(), "#stop job".to_string()]
    );
    let editing = closed[1].tags.clone();
    assert!(suggest_tags(&closed, "#stop j", &editing, None).is_empty());
    assert!(rebuild_durations(&closed).chronology_violations().is_empty());
}
