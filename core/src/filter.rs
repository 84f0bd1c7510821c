//! Caller-side record selection for the send log and campaign views.
//!
//! The aggregator never filters; callers narrow their records here first and
//! pass the borrowed matches on.

use crate::{
    event::{EventRecord, SendStatus},
    types::{CampaignId, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Conjunction of optional criteria. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    #[serde(default)]
    pub sent_from:   Option<Timestamp>,
    #[serde(default)]
    pub sent_to:     Option<Timestamp>,
    #[serde(default)]
    pub status:      Option<SendStatus>,
}

impl RecordFilter {
    pub fn campaign(campaign_id: impl Into<CampaignId>) -> Self {
        Self {
            campaign_id: Some(campaign_id.into()),
            ..Self::default()
        }
    }

    pub fn sent_between(mut self, from: Timestamp, to: Timestamp) -> Self {
        self.sent_from = Some(from);
        self.sent_to = Some(to);
        self
    }

    pub fn with_status(mut self, status: SendStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        if let Some(campaign_id) = &self.campaign_id {
            if &record.campaign_id != campaign_id {
                return false;
            }
        }
        if let Some(from) = self.sent_from {
            if record.sent_at < from {
                return false;
            }
        }
        if let Some(to) = self.sent_to {
            if record.sent_at > to {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status() != status {
                return false;
            }
        }
        true
    }

    /// Matching records, in input order.
    pub fn apply<'a>(&self, records: &'a [EventRecord]) -> Vec<&'a EventRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
