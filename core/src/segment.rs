//! Segment rollup: one `CountSet` per externally defined segment.
//!
//! The segmentation rule is supplied by the caller. Output iterates in the
//! order each segment key was first seen, so reports render the same way on
//! every run.

use crate::{
    aggregator::CountSet,
    event::EventRecord,
    types::CampaignId,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEntry<K> {
    pub segment: K,
    pub counts:  CountSet,
}

/// Insertion-ordered mapping from segment key to its counts.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SegmentRollup<K> {
    entries: Vec<SegmentEntry<K>>,
    #[serde(skip)]
    index:   HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> SegmentRollup<K> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn tally(&mut self, key: K, record: &EventRecord) {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push(SegmentEntry {
                    segment: key,
                    counts: CountSet::default(),
                });
                slot
            }
        };
        self.entries[slot].counts.tally(record);
    }

    pub fn get(&self, key: &K) -> Option<&CountSet> {
        self.index.get(key).map(|&slot| &self.entries[slot].counts)
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[SegmentEntry<K>] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|e| &e.segment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of `total` over every segment.
    pub fn total_records(&self) -> u64 {
        self.entries.iter().map(|e| e.counts.total).sum()
    }
}

impl<K> IntoIterator for SegmentRollup<K> {
    type Item = SegmentEntry<K>;
    type IntoIter = std::vec::IntoIter<SegmentEntry<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Partition `records` by `segment_of` and count each partition.
///
/// Every record lands in exactly one segment, so the segment totals sum to
/// the number of records.
pub fn rollup_by_segment<'a, I, K, F>(records: I, segment_of: F) -> SegmentRollup<K>
where
    I: IntoIterator<Item = &'a EventRecord>,
    K: Eq + Hash + Clone,
    F: Fn(&EventRecord) -> K,
{
    let mut rollup = SegmentRollup::new();
    for record in records {
        rollup.tally(segment_of(record), record);
    }
    log::debug!("segment rollup: {} segments", rollup.len());
    rollup
}

pub fn rollup_by_campaign<'a, I>(records: I) -> SegmentRollup<CampaignId>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    rollup_by_segment(records, |r| r.campaign_id.clone())
}

/// Daily buckets keyed by the UTC calendar day of `sent_at`.
pub fn rollup_by_day<'a, I>(records: I) -> SegmentRollup<NaiveDate>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    rollup_by_segment(records, |r| r.sent_at.date_naive())
}
