use chrono::{NaiveDate, TimeZone, Utc};
use funnel_core::{
    aggregate,
    rollup_by_segment,
    segment::{rollup_by_campaign, rollup_by_day},
    types::Timestamp,
    EventRecord,
};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn ts(day: u32, hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn send(campaign: &str, recipient: &str, day: u32) -> EventRecord {
    EventRecord::sent(campaign, recipient, ts(day, 9))
}

/// Recipient title tier, the kind of rule the segmentation view supplies.
fn title_tier(record: &EventRecord) -> &'static str {
    if record.recipient_id.starts_with("ceo") {
        "c-level"
    } else if record.recipient_id.starts_with("vp") {
        "vp"
    } else {
        "other"
    }
}

fn mixed_records() -> Vec<EventRecord> {
    vec![
        send("camp-b", "vp-1", 2).delivered(ts(2, 10)).opened(ts(2, 11)),
        send("camp-a", "ceo-1", 1).delivered(ts(1, 10)),
        send("camp-b", "eng-1", 1).bounced(ts(1, 10), "mailbox full"),
        send("camp-a", "vp-2", 3).delivered(ts(3, 10)).opened(ts(3, 12)).clicked(ts(3, 13)),
        send("camp-c", "ceo-2", 2).delivered(ts(2, 10)).opened(ts(2, 11)).replied(ts(2, 15)),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Segment totals sum to the number of records.
#[test]
fn segment_totals_sum_to_record_count() {
    let records = mixed_records();
    let rollup = rollup_by_segment(&records, title_tier);

    assert_eq!(rollup.total_records(), records.len() as u64);
    let sum: u64 = rollup.entries().iter().map(|e| e.counts.total).sum();
    assert_eq!(sum, 5);
}

/// Keys iterate in first-seen order, not sorted or hashed order.
#[test]
fn keys_keep_first_seen_order() {
    let records = mixed_records();
    let rollup = rollup_by_segment(&records, title_tier);
    let keys: Vec<&str> = rollup.keys().copied().collect();
    assert_eq!(keys, vec!["vp", "c-level", "other"]);

    let campaigns = rollup_by_campaign(&records);
    let keys: Vec<&String> = campaigns.keys().collect();
    assert_eq!(keys, vec!["camp-b", "camp-a", "camp-c"]);
}

/// Each partition is aggregated independently.
#[test]
fn partitions_match_direct_aggregation() {
    let records = mixed_records();
    let rollup = rollup_by_segment(&records, title_tier);

    for entry in rollup.entries() {
        let direct = aggregate(records.iter().filter(|r| title_tier(r) == entry.segment));
        assert_eq!(entry.counts, direct, "segment {}", entry.segment);
    }

    let vp = rollup.get(&"vp").unwrap();
    assert_eq!(vp.total, 2);
    assert_eq!(vp.opened, 2);
    assert_eq!(vp.clicked, 1);
    assert!(rollup.get(&"intern").is_none());
}

/// Daily buckets key on the UTC calendar day of sent_at.
#[test]
fn day_buckets_group_by_send_date() {
    let records = mixed_records();
    let rollup = rollup_by_day(&records);

    let days: Vec<NaiveDate> = rollup.keys().copied().collect();
    assert_eq!(
        days,
        vec![
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        ]
    );
    let march_2 = rollup.get(&NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()).unwrap();
    assert_eq!(march_2.total, 2);
    assert_eq!(march_2.replied, 1);
}

/// No records, no segments.
#[test]
fn empty_input_has_no_segments() {
    let rollup = rollup_by_segment(&Vec::<EventRecord>::new(), title_tier);
    assert!(rollup.is_empty());
    assert_eq!(rollup.len(), 0);
    assert_eq!(rollup.total_records(), 0);
}

/// The rollup serializes as an ordered list of {segment, counts}.
#[test]
fn rollup_serializes_in_order() {
    let records = mixed_records();
    let json = serde_json::to_value(rollup_by_campaign(&records)).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["segment"], "camp-b");
    assert_eq!(list[0]["counts"]["total"], 2);
}

proptest! {
    /// Conservation holds for any record set and any segmentation rule.
    #[test]
    fn prop_partition_conserves_records(
        keys in prop::collection::vec(0u8..8, 0..300),
        modulus in 1u8..8,
    ) {
        let records: Vec<EventRecord> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| send(&format!("camp-{k}"), &format!("r{i}"), 1))
            .collect();
        let rollup = rollup_by_segment(&records, |r| r.campaign_id.as_bytes()[5] % modulus);
        prop_assert_eq!(rollup.total_records(), records.len() as u64);

        let by_campaign = rollup_by_campaign(&records);
        prop_assert_eq!(by_campaign.total_records(), records.len() as u64);
        prop_assert!(by_campaign.len() <= 8);
    }
}
