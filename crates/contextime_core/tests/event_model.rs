use contextime_core::{parse_event_date, EventValidationError, TimelineEvent, TODAY_EVENT_ID};
use uuid::Uuid;

#[test]
fn event_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let event = TimelineEvent::with_id(id, parse_event_date("1982-08-26T08:45").unwrap(), "Born")
        .with_tags(["@mom", "#start life"])
        .pinned(true);

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["date"], "1982-08-26T08:45:00");
    assert_eq!(json["text"], "born");
    assert_eq!(json["pinned"], true);
    assert_eq!(json["tags"], serde_json::json!(["@mom", "#start life"]));
    assert!(json.get("is_new").is_none());
    assert!(json.get("is_today").is_none());

    let decoded: TimelineEvent = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn deserialize_accepts_minute_precision_and_defaults() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "date": "2014-07-15T10:30",
        "text": "first child"
    });
    let event: TimelineEvent = serde_json::from_value(value).unwrap();
    assert_eq!(event.date, parse_event_date("2014-07-15T10:30:00").unwrap());
    assert!(!event.pinned);
    assert!(event.tags.is_empty());
}

#[test]
fn deserialize_rejects_unparseable_date() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "date": "someday",
        "text": "bad"
    });
    let err = serde_json::from_value::<TimelineEvent>(value).unwrap_err();
    assert!(err.to_string().contains("invalid date"), "unexpected error: {err}");
}

#[test]
fn today_marker_uses_sentinel_id_and_flag() {
    let now = parse_event_date("2024-06-01T12:34:56").unwrap();
    let marker = TimelineEvent::today_marker(now);
    assert_eq!(marker.id, TODAY_EVENT_ID);
    assert!(marker.is_today);
    assert_eq!(marker.date, now);

    let json = serde_json::to_value(&marker).unwrap();
    assert_eq!(json["is_today"], true);
}

#[test]
fn validate_rejects_malformed_tags() {
    let event = TimelineEvent::new(parse_event_date("2000-01-01").unwrap(), "x").with_tags(["#oops"]);
    assert!(matches!(
        event.validate(),
        Err(EventValidationError::InvalidTag { .. })
    ));
}
