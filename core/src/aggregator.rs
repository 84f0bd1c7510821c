//! Aggregator: rolls event records up into counts and rates.
//!
//! Every call counts from scratch over the records it is handed.
//! Filtering by campaign, segment or date range happens before this point.

use crate::event::EventRecord;
use serde::{Deserialize, Serialize};

// ── Counts ───────────────────────────────────────────────────────────────────

/// Integer tally of records reaching each stage.
///
/// `total` is the denominator for "sent". Each other field is the number of
/// records whose matching timestamp is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountSet {
    pub total:        u64,
    pub delivered:    u64,
    pub opened:       u64,
    pub clicked:      u64,
    pub replied:      u64,
    pub bounced:      u64,
    pub unsubscribed: u64,
    pub converted:    u64,
}

impl CountSet {
    /// Fold one record into the tally.
    pub fn tally(&mut self, record: &EventRecord) {
        self.total += 1;
        self.delivered += u64::from(record.delivered_at.is_some());
        self.opened += u64::from(record.opened_at.is_some());
        self.clicked += u64::from(record.clicked_at.is_some());
        self.replied += u64::from(record.replied_at.is_some());
        self.bounced += u64::from(record.bounced_at.is_some());
        self.unsubscribed += u64::from(record.unsubscribed_at.is_some());
        self.converted += u64::from(record.converted_at.is_some());
    }

    /// The raw count behind a comparable metric.
    pub fn metric_count(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Open       => self.opened,
            Metric::Click      => self.clicked,
            Metric::Conversion => self.converted,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Count every record in `records`.
///
/// An empty input yields the all-zero `CountSet`.
pub fn aggregate<'a, I>(records: I) -> CountSet
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let mut counts = CountSet::default();
    for record in records {
        counts.tally(record);
    }
    counts
}

// ── Rates ────────────────────────────────────────────────────────────────────

/// Counts expressed as fractions of `total`. All zero when `total` is zero.
///
/// `click_rate` is clicked/total, not clicked/opened. Use
/// [`click_through_of_opens`] for the latter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSet {
    pub delivery_rate:   f64,
    pub open_rate:       f64,
    pub click_rate:      f64,
    pub reply_rate:      f64,
    pub bounce_rate:     f64,
    pub conversion_rate: f64,
}

impl RateSet {
    pub fn metric_rate(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Open       => self.open_rate,
            Metric::Click      => self.click_rate,
            Metric::Conversion => self.conversion_rate,
        }
    }
}

pub fn derive_rates(counts: &CountSet) -> RateSet {
    RateSet {
        delivery_rate:   ratio(counts.delivered, counts.total),
        open_rate:       ratio(counts.opened, counts.total),
        click_rate:      ratio(counts.clicked, counts.total),
        reply_rate:      ratio(counts.replied, counts.total),
        bounce_rate:     ratio(counts.bounced, counts.total),
        conversion_rate: ratio(counts.converted, counts.total),
    }
}

/// Share of openers who clicked: `click_rate / open_rate`, 0 with no opens.
pub fn click_through_of_opens(rates: &RateSet) -> f64 {
    if rates.open_rate > 0.0 {
        rates.click_rate / rates.open_rate
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// ── Metric selector ──────────────────────────────────────────────────────────

/// A rate two variants can be compared on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Open,
    Click,
    #[default]
    Conversion,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open       => "open",
            Self::Click      => "click",
            Self::Conversion => "conversion",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open"       => Some(Self::Open),
            "click"      => Some(Self::Click),
            "conversion" => Some(Self::Conversion),
            _ => None,
        }
    }
}
