//! Funnel builder: orders a `CountSet` into the six fixed funnel stages.
//!
//! Stage order: sent → delivered → opened → clicked → replied → converted.
//! All six stages are always present, reachable or not.
//!
//! Monotonicity is not enforced. A stage larger than its predecessor
//! reports `percent_of_previous` above 100 and a negative `drop_off`.

use crate::aggregator::CountSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Sent,
    Delivered,
    Opened,
    Clicked,
    Replied,
    Converted,
}

impl StageName {
    /// Every stage, in funnel order.
    pub const ALL: [StageName; 6] = [
        StageName::Sent,
        StageName::Delivered,
        StageName::Opened,
        StageName::Clicked,
        StageName::Replied,
        StageName::Converted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sent      => "sent",
            Self::Delivered => "delivered",
            Self::Opened    => "opened",
            Self::Clicked   => "clicked",
            Self::Replied   => "replied",
            Self::Converted => "converted",
        }
    }

    fn count_in(&self, counts: &CountSet) -> u64 {
        match self {
            Self::Sent      => counts.total,
            Self::Delivered => counts.delivered,
            Self::Opened    => counts.opened,
            Self::Clicked   => counts.clicked,
            Self::Replied   => counts.replied,
            Self::Converted => counts.converted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub name:                StageName,
    pub count:               u64,
    /// `count / sent × 100`; 0 when nothing was sent.
    pub percent_of_total:    f64,
    /// `count / previous.count × 100`; 0 when the previous stage is 0.
    pub percent_of_previous: f64,
    /// `(previous.count − count) / previous.count × 100`; 0 when the
    /// previous stage is 0 and for the first stage.
    pub drop_off:            f64,
}

pub fn build_funnel(counts: &CountSet) -> Vec<FunnelStage> {
    let root = counts.total;
    let mut stages = Vec::with_capacity(StageName::ALL.len());
    let mut previous: Option<u64> = None;

    for name in StageName::ALL {
        let count = name.count_in(counts);
        let percent_of_total = percent(count, root);
        let (percent_of_previous, drop_off) = match previous {
            None => (percent_of_total, 0.0),
            Some(0) => (0.0, 0.0),
            Some(prev) => {
                let prev_f = prev as f64;
                (
                    count as f64 / prev_f * 100.0,
                    (prev_f - count as f64) / prev_f * 100.0,
                )
            }
        };

        stages.push(FunnelStage {
            name,
            count,
            percent_of_total,
            percent_of_previous,
            drop_off,
        });
        previous = Some(count);
    }

    stages
}

fn percent(count: u64, of: u64) -> f64 {
    if of == 0 {
        0.0
    } else {
        count as f64 / of as f64 * 100.0
    }
}
