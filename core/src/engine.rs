//! The metrics engine: configuration bundled with the pure operations.
//!
//! RULES:
//!   - The engine owns configuration only, never records.
//!   - Every call recomputes from the records it is handed.
//!   - Same records and config in, same reports out.

use crate::{
    aggregator::{aggregate, click_through_of_opens, derive_rates, CountSet, Metric, RateSet},
    comparator::{compare_with_threshold, VariantComparison},
    config::MetricsConfig,
    event::{EventRecord, SendStatus},
    funnel::{build_funnel, FunnelStage},
    segment::{rollup_by_campaign, rollup_by_day, rollup_by_segment, SegmentRollup},
    types::CampaignId,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::hash::Hash;

/// Counts, rates and funnel for one group of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReport {
    pub counts:                 CountSet,
    pub rates:                  RateSet,
    pub funnel:                 Vec<FunnelStage>,
    pub click_through_of_opens: f64,
}

impl FunnelReport {
    pub fn from_counts(counts: CountSet) -> Self {
        let rates = derive_rates(&counts);
        Self {
            counts,
            rates,
            funnel: build_funnel(&counts),
            click_through_of_opens: click_through_of_opens(&rates),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyedReport<K> {
    pub key:    K,
    pub report: FunnelReport,
}

pub struct MetricsEngine {
    pub config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// One report over every record handed in.
    pub fn report<'a, I>(&self, records: I) -> FunnelReport
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let report = FunnelReport::from_counts(aggregate(records));
        log::debug!(
            "report: total={} delivered={} opened={} converted={}",
            report.counts.total,
            report.counts.delivered,
            report.counts.opened,
            report.counts.converted,
        );
        report
    }

    /// One report per campaign, in first-seen campaign order.
    pub fn campaign_reports<'a, I>(&self, records: I) -> Vec<KeyedReport<CampaignId>>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let reports = keyed(rollup_by_campaign(records));
        log::info!("campaign reports: {} campaigns", reports.len());
        reports
    }

    /// One report per UTC send day, in first-seen order.
    pub fn daily_reports<'a, I>(&self, records: I) -> Vec<KeyedReport<NaiveDate>>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        keyed(rollup_by_day(records))
    }

    /// One report per send status, in first-seen order.
    pub fn status_reports<'a, I>(&self, records: I) -> Vec<KeyedReport<SendStatus>>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        keyed(rollup_by_segment(records, EventRecord::status))
    }

    /// Compare variant `b` against `a`. `None` uses the configured metric.
    pub fn compare(&self, a: &CountSet, b: &CountSet, metric: Option<Metric>) -> VariantComparison {
        let comparison = &self.config.comparison;
        let metric = metric.unwrap_or(comparison.default_metric);
        let result = compare_with_threshold(a, b, metric, comparison.significance_threshold);
        log::info!(
            "compare on {}: confidence={:.2} winner={:?}",
            metric.name(),
            result.confidence,
            result.winner,
        );
        result
    }
}

fn keyed<K: Eq + Hash + Clone>(rollup: SegmentRollup<K>) -> Vec<KeyedReport<K>> {
    rollup
        .into_iter()
        .map(|entry| KeyedReport {
            key: entry.segment,
            report: FunnelReport::from_counts(entry.counts),
        })
        .collect()
}
