//! Shared primitive types used across the metrics engine.

use chrono::{DateTime, Utc};

/// A point in time at which a send-side event was recorded.
pub type Timestamp = DateTime<Utc>;

/// Opaque campaign identifier.
pub type CampaignId = String;

/// Opaque recipient identifier. Unique per campaign within a record set.
pub type RecipientId = String;
