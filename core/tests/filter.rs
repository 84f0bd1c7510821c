use chrono::{TimeZone, Utc};
use funnel_core::{
    aggregate,
    filter::RecordFilter,
    types::Timestamp,
    EventRecord, SendStatus,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn ts(day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn send_log() -> Vec<EventRecord> {
    vec![
        EventRecord::sent("camp-1", "a", ts(1)).delivered(ts(1)).opened(ts(2)),
        EventRecord::sent("camp-1", "b", ts(5)).bounced(ts(5), "mailbox full"),
        EventRecord::sent("camp-2", "c", ts(5)).delivered(ts(5)),
        EventRecord::sent("camp-2", "d", ts(9)).delivered(ts(9)).opened(ts(9)).clicked(ts(9)).replied(ts(10)),
        EventRecord::sent("camp-1", "e", ts(10)).failed("smtp authentication failed"),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The empty filter matches everything in input order.
#[test]
fn empty_filter_matches_all() {
    let records = send_log();
    let matched = RecordFilter::default().apply(&records);
    let ids: Vec<&str> = matched.iter().map(|r| r.recipient_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn filters_by_campaign() {
    let records = send_log();
    let counts = aggregate(RecordFilter::campaign("camp-1").apply(&records));
    assert_eq!(counts.total, 3);
    assert_eq!(counts.bounced, 1);
    assert_eq!(counts.opened, 1);
}

/// Date bounds are inclusive at both ends.
#[test]
fn date_bounds_are_inclusive() {
    let records = send_log();
    let filter = RecordFilter::default().sent_between(ts(5), ts(9));
    let ids: Vec<&str> = filter.apply(&records).iter().map(|r| r.recipient_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "d"]);
}

/// Status filtering uses the derived send status.
#[test]
fn filters_by_status() {
    let records = send_log();
    let cases = [
        (SendStatus::Opened, vec!["a"]),
        (SendStatus::Bounced, vec!["b"]),
        (SendStatus::Delivered, vec!["c"]),
        (SendStatus::Replied, vec!["d"]),
        (SendStatus::Failed, vec!["e"]),
        (SendStatus::Sent, vec![]),
    ];
    for (status, expected) in cases {
        let filter = RecordFilter::default().with_status(status);
        let ids: Vec<&str> = filter.apply(&records).iter().map(|r| r.recipient_id.as_str()).collect();
        assert_eq!(ids, expected, "status {}", status.name());
    }
}

/// Criteria combine as a conjunction.
#[test]
fn criteria_combine() {
    let records = send_log();
    let filter = RecordFilter::campaign("camp-2")
        .sent_between(ts(1), ts(6))
        .with_status(SendStatus::Delivered);
    let matched = filter.apply(&records);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].recipient_id, "c");
}

/// Status names round-trip through the parser used by the CLI.
#[test]
fn status_names_parse() {
    for status in [
        SendStatus::Sent,
        SendStatus::Delivered,
        SendStatus::Opened,
        SendStatus::Clicked,
        SendStatus::Replied,
        SendStatus::Bounced,
        SendStatus::Failed,
    ] {
        assert_eq!(SendStatus::parse(status.name()), Some(status));
    }
    assert_eq!(SendStatus::parse("scheduled"), None);
}
