use crate::{
    aggregator::Metric,
    comparator::SIGNIFICANCE_THRESHOLD,
    error::{MetricsError, MetricsResult},
    sample::{SampleConfig, MAX_WINDOW_DAYS},
};
use anyhow::Context;
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "data/metrics_config.json";

/// Widest rounding the presentation helpers are configured for.
pub const MAX_PERCENT_DECIMALS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComparisonConfig {
    /// Percent confidence required before a variant wins.
    pub significance_threshold: f64,
    pub default_metric:         Metric,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            significance_threshold: SIGNIFICANCE_THRESHOLD,
            default_metric: Metric::Conversion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayConfig {
    pub percent_decimals: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { percent_decimals: 1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsConfig {
    pub comparison: ComparisonConfig,
    pub display:    DisplayConfig,
    pub sample:     SampleConfig,
}

impl MetricsConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    /// The underlying `MetricsError` stays reachable via `downcast_ref`.
    /// In tests, use MetricsConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content).with_context(|| format!("Cannot load {path}"))?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> MetricsResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MetricsResult<()> {
        let threshold = self.comparison.significance_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(MetricsError::InvalidConfig {
                reason: format!("significanceThreshold {threshold} outside [0, 100]"),
            });
        }
        if self.display.percent_decimals > MAX_PERCENT_DECIMALS {
            return Err(MetricsError::InvalidConfig {
                reason: format!(
                    "percentDecimals {} exceeds {MAX_PERCENT_DECIMALS}",
                    self.display.percent_decimals
                ),
            });
        }
        let p = &self.sample.probabilities;
        let probabilities = [
            ("delivered", p.delivered),
            ("bouncedOfUndelivered", p.bounced_of_undelivered),
            ("openedOfDelivered", p.opened_of_delivered),
            ("clickedOfOpened", p.clicked_of_opened),
            ("repliedOfOpened", p.replied_of_opened),
            ("convertedOfClicked", p.converted_of_clicked),
            ("unsubscribedOfDelivered", p.unsubscribed_of_delivered),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(MetricsError::InvalidConfig {
                    reason: format!("sample probability {name} = {value} outside [0, 1]"),
                });
            }
        }
        let window_days = self.sample.window_days;
        if !(0..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(MetricsError::InvalidConfig {
                reason: format!("sample windowDays {window_days} outside [0, {MAX_WINDOW_DAYS}]"),
            });
        }
        if self
            .sample
            .anchor
            .checked_sub_signed(Duration::days(window_days))
            .is_none()
        {
            return Err(MetricsError::InvalidConfig {
                reason: format!(
                    "sample anchor {} minus {window_days} days is out of range",
                    self.sample.anchor
                ),
            });
        }
        Ok(())
    }
}
