//! Deterministic sample send logs for demos, fixtures and load checks.
//!
//! Default rates are calibrated on a typical cold campaign: ~97.6 % delivered,
//! half of delivered opened, 30 % of openers clicking.
//!
//! Output always honours the producer contracts on `EventRecord`:
//!   - recipient ids are unique
//!   - sent ≤ delivered ≤ opened ≤ clicked ≤ converted, opened ≤ replied
//!   - bounced and failed records carry no engagement
//!   - reasons appear only alongside their event

use crate::{
    event::EventRecord,
    rng::{SampleRng, SampleRngBank, SampleSlot},
    types::{CampaignId, Timestamp},
};
use chrono::{Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const BOUNCE_REASONS: &[&str] = &[
    "mailbox does not exist",
    "mailbox full",
    "domain not found",
];

const FAILURE_REASONS: &[&str] = &[
    "daily sending limit exceeded",
    "smtp authentication failed",
];

const SECS_PER_DAY: i64 = 86_400;

/// Widest send window a sample may span, in days.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SampleConfig {
    pub records:       usize,
    pub campaigns:     Vec<CampaignId>,
    /// Sends are spread over this many days before `anchor`.
    pub window_days:   i64,
    pub anchor:        Timestamp,
    pub probabilities: StageProbabilities,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            records: 500,
            campaigns: vec![
                "summer-sale".into(),
                "new-collection".into(),
                "black-friday".into(),
                "welcome-series".into(),
                "win-back".into(),
            ],
            window_days: 30,
            anchor: Utc
                .with_ymd_and_hms(2024, 3, 20, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            probabilities: StageProbabilities::default(),
        }
    }
}

/// Conditional probability of reaching each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageProbabilities {
    pub delivered:              f64,
    /// Of undelivered sends; the rest fail at the sender.
    pub bounced_of_undelivered: f64,
    pub opened_of_delivered:    f64,
    pub clicked_of_opened:      f64,
    pub replied_of_opened:      f64,
    pub converted_of_clicked:   f64,
    pub unsubscribed_of_delivered: f64,
}

impl Default for StageProbabilities {
    fn default() -> Self {
        Self {
            delivered:                 0.976,
            bounced_of_undelivered:    0.9,
            opened_of_delivered:       0.5,
            clicked_of_opened:         0.30,
            replied_of_opened:         0.073,
            converted_of_clicked:      0.064,
            unsubscribed_of_delivered: 0.005,
        }
    }
}

/// Generate `config.records` records. Same seed and config, same records.
pub fn generate_sample(seed: u64, config: &SampleConfig) -> Vec<EventRecord> {
    let bank = SampleRngBank::new(seed);
    let mut campaign_rng = bank.stream(SampleSlot::Campaign);
    let mut status_rng = bank.stream(SampleSlot::Status);
    let mut timing_rng = bank.stream(SampleSlot::Timing);
    let mut engagement_rng = bank.stream(SampleSlot::Engagement);

    let fallback = ["campaign-1".to_string()];
    let campaigns: &[CampaignId] = if config.campaigns.is_empty() {
        &fallback
    } else {
        &config.campaigns
    };
    let p = &config.probabilities;
    let window_secs = config.window_days.clamp(0, MAX_WINDOW_DAYS) * SECS_PER_DAY;

    let mut records = Vec::with_capacity(config.records);
    for i in 0..config.records {
        let campaign = pick(&mut campaign_rng, campaigns).clone();
        let offset = Duration::seconds(timing_rng.range_inclusive(0, window_secs));
        let sent_at = config.anchor.checked_sub_signed(offset).unwrap_or(config.anchor);
        let record = EventRecord::sent(campaign, format!("rcpt-{:05}", i + 1), sent_at);

        let record = if status_rng.chance(p.delivered) {
            delivered_path(record, p, &mut status_rng, &mut timing_rng, &mut engagement_rng)
        } else if status_rng.chance(p.bounced_of_undelivered) {
            let at = after(sent_at, &mut timing_rng, 1, 600);
            let reason = *pick(&mut status_rng, BOUNCE_REASONS);
            record.bounced(at, reason)
        } else {
            let reason = *pick(&mut status_rng, FAILURE_REASONS);
            record.failed(reason)
        };
        records.push(record);
    }

    log::debug!(
        "sample: generated {} records across {} campaigns (seed={seed})",
        records.len(),
        campaigns.len()
    );
    records
}

fn delivered_path(
    record: EventRecord,
    p: &StageProbabilities,
    status_rng: &mut SampleRng,
    timing_rng: &mut SampleRng,
    engagement_rng: &mut SampleRng,
) -> EventRecord {
    let delivered_at = after(record.sent_at, timing_rng, 1, 300);
    let mut record = record.delivered(delivered_at);
    let mut last_touch = delivered_at;

    if status_rng.chance(p.opened_of_delivered) {
        let opened_at = after(delivered_at, timing_rng, 60, SECS_PER_DAY);
        record = record.opened(opened_at);
        last_touch = opened_at;
        let opens = engagement_rng.range_inclusive(1, 5) as u32;

        let mut clicks = 0;
        if status_rng.chance(p.clicked_of_opened) {
            let clicked_at = after(opened_at, timing_rng, 5, 7_200);
            record = record.clicked(clicked_at);
            last_touch = clicked_at;
            clicks = engagement_rng.range_inclusive(1, 3) as u32;

            if status_rng.chance(p.converted_of_clicked) {
                let converted_at = after(clicked_at, timing_rng, 60, 2 * SECS_PER_DAY);
                record = record.converted(converted_at);
            }
        }

        if status_rng.chance(p.replied_of_opened) {
            let replied_at = after(opened_at, timing_rng, 300, 3 * SECS_PER_DAY);
            record = record.replied(replied_at);
        }

        record = record.with_engagement(opens, clicks);
    }

    if status_rng.chance(p.unsubscribed_of_delivered) {
        let at = after(last_touch, timing_rng, 30, SECS_PER_DAY);
        record = record.unsubscribed(at);
    }

    record
}

fn after(base: Timestamp, rng: &mut SampleRng, min_secs: i64, max_secs: i64) -> Timestamp {
    let offset = Duration::seconds(rng.range_inclusive(min_secs, max_secs));
    base.checked_add_signed(offset).unwrap_or(base)
}

fn pick<'a, T>(rng: &mut SampleRng, items: &'a [T]) -> &'a T {
    let index = rng.next_u64_below(items.len() as u64) as usize;
    &items[index]
}
