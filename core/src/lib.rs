//! Funnel metrics for outreach campaigns.
//!
//! Raw per-recipient send events roll up into counts, rates, ordered funnels,
//! segment breakdowns and A/B variant comparisons. Every operation is a pure
//! function over records the caller owns.

pub mod aggregator;
pub mod comparator;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod filter;
pub mod funnel;
pub mod percent;
pub mod rng;
pub mod sample;
pub mod segment;
pub mod source;
pub mod types;

pub use aggregator::{aggregate, derive_rates, CountSet, Metric, RateSet};
pub use comparator::{compare, VariantComparison, Winner};
pub use event::{EventRecord, SendStatus};
pub use funnel::{build_funnel, FunnelStage, StageName};
pub use segment::{rollup_by_segment, SegmentRollup};
