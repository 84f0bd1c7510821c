//! Event records: the raw per-recipient facts every metric is derived from.
//!
//! RULE: Records are append-only facts owned by the sending/tracking system.
//! Nothing in this crate mutates a record it was handed. Timestamp ordering,
//! non-negative counters and recipient uniqueness are producer contracts;
//! aggregation only checks whether a timestamp is present.

use crate::types::{CampaignId, RecipientId, Timestamp};
use serde::{Deserialize, Serialize};

/// One recipient's interaction history for one sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub campaign_id:  CampaignId,
    pub recipient_id: RecipientId,
    pub sent_at:      Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at:    Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_at:       Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicked_at:      Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_at:      Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounced_at:      Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_at:    Option<Timestamp>,

    /// Repeat opens, including the first one.
    #[serde(default)]
    pub open_count:  u32,
    /// Repeat clicks, including the first one.
    #[serde(default)]
    pub click_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounce_reason:  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl EventRecord {
    /// A record for a message that was sent and nothing else happened yet.
    pub fn sent(
        campaign_id: impl Into<CampaignId>,
        recipient_id: impl Into<RecipientId>,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            recipient_id: recipient_id.into(),
            sent_at,
            delivered_at: None,
            opened_at: None,
            clicked_at: None,
            replied_at: None,
            bounced_at: None,
            unsubscribed_at: None,
            converted_at: None,
            open_count: 0,
            click_count: 0,
            bounce_reason: None,
            failure_reason: None,
        }
    }

    pub fn delivered(mut self, at: Timestamp) -> Self {
        self.delivered_at = Some(at);
        self
    }

    /// Marks the record opened. Bumps `open_count` to at least 1.
    pub fn opened(mut self, at: Timestamp) -> Self {
        self.opened_at = Some(at);
        self.open_count = self.open_count.max(1);
        self
    }

    /// Marks the record clicked. Bumps `click_count` to at least 1.
    pub fn clicked(mut self, at: Timestamp) -> Self {
        self.clicked_at = Some(at);
        self.click_count = self.click_count.max(1);
        self
    }

    pub fn replied(mut self, at: Timestamp) -> Self {
        self.replied_at = Some(at);
        self
    }

    pub fn bounced(mut self, at: Timestamp, reason: impl Into<String>) -> Self {
        self.bounced_at = Some(at);
        self.bounce_reason = Some(reason.into());
        self
    }

    pub fn unsubscribed(mut self, at: Timestamp) -> Self {
        self.unsubscribed_at = Some(at);
        self
    }

    pub fn converted(mut self, at: Timestamp) -> Self {
        self.converted_at = Some(at);
        self
    }

    pub fn failed(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }

    pub fn with_engagement(mut self, open_count: u32, click_count: u32) -> Self {
        self.open_count = open_count;
        self.click_count = click_count;
        self
    }

    /// The most advanced state this record reached.
    pub fn status(&self) -> SendStatus {
        if self.bounced_at.is_some() {
            SendStatus::Bounced
        } else if self.failure_reason.is_some() {
            SendStatus::Failed
        } else if self.replied_at.is_some() {
            SendStatus::Replied
        } else if self.clicked_at.is_some() {
            SendStatus::Clicked
        } else if self.opened_at.is_some() {
            SendStatus::Opened
        } else if self.delivered_at.is_some() {
            SendStatus::Delivered
        } else {
            SendStatus::Sent
        }
    }
}

/// Display state of a single send, as shown in the send log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStatus {
    Sent,
    Delivered,
    Opened,
    Clicked,
    Replied,
    Bounced,
    Failed,
}

impl SendStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sent      => "sent",
            Self::Delivered => "delivered",
            Self::Opened    => "opened",
            Self::Clicked   => "clicked",
            Self::Replied   => "replied",
            Self::Bounced   => "bounced",
            Self::Failed    => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent"      => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "opened"    => Some(Self::Opened),
            "clicked"   => Some(Self::Clicked),
            "replied"   => Some(Self::Replied),
            "bounced"   => Some(Self::Bounced),
            "failed"    => Some(Self::Failed),
            _ => None,
        }
    }
}
