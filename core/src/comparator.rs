//! Variant comparator: A/B significance between two count sets.
//!
//! Confidence is a two-proportion z-test on the chosen metric:
//!
//!   p1 = a.count / a.total          p2 = b.count / b.total
//!   p  = (a.count + b.count) / (a.total + b.total)
//!   SE = sqrt(p (1 − p) (1/a.total + 1/b.total))
//!   z  = (p2 − p1) / SE
//!   confidence = (1 − two_tailed_p(z)) × 100, clamped to [0, 100]
//!
//! Degenerate inputs (an empty side, zero variance) give confidence 0 and no
//! winner. The comparison never fails.

use crate::aggregator::{derive_rates, ratio, CountSet, Metric};
use serde::{Deserialize, Serialize};

/// Confidence (percent) a variant needs before it is declared the winner.
pub const SIGNIFICANCE_THRESHOLD: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantComparison {
    pub metric:                Metric,
    /// B − A.
    pub open_rate_delta:       f64,
    /// B − A.
    pub click_rate_delta:      f64,
    /// B − A.
    pub conversion_rate_delta: f64,
    pub confidence:            f64,
    pub winner:                Winner,
}

/// Compare `b` against `a` on `metric` at the standard 95 % threshold.
pub fn compare(a: &CountSet, b: &CountSet, metric: Metric) -> VariantComparison {
    compare_with_threshold(a, b, metric, SIGNIFICANCE_THRESHOLD)
}

/// As [`compare`], declaring a winner at `threshold` percent confidence.
pub fn compare_with_threshold(
    a: &CountSet,
    b: &CountSet,
    metric: Metric,
    threshold: f64,
) -> VariantComparison {
    let rates_a = derive_rates(a);
    let rates_b = derive_rates(b);

    let confidence = z_test_confidence(a, b, metric);

    let count_a = a.metric_count(metric);
    let count_b = b.metric_count(metric);
    let winner = if confidence < threshold {
        Winner::None
    } else if count_a > count_b {
        Winner::A
    } else if count_b > count_a {
        Winner::B
    } else {
        Winner::None
    };

    VariantComparison {
        metric,
        open_rate_delta:       rates_b.open_rate - rates_a.open_rate,
        click_rate_delta:      rates_b.click_rate - rates_a.click_rate,
        conversion_rate_delta: rates_b.conversion_rate - rates_a.conversion_rate,
        confidence,
        winner,
    }
}

fn z_test_confidence(a: &CountSet, b: &CountSet, metric: Metric) -> f64 {
    if a.total == 0 || b.total == 0 {
        return 0.0;
    }

    let hits_a = a.metric_count(metric);
    let hits_b = b.metric_count(metric);

    let p1 = ratio(hits_a, a.total);
    let p2 = ratio(hits_b, b.total);
    // Summed in f64 so extreme totals cannot overflow.
    let pooled = (hits_a as f64 + hits_b as f64) / (a.total as f64 + b.total as f64);

    let se = (pooled * (1.0 - pooled) * (1.0 / a.total as f64 + 1.0 / b.total as f64)).sqrt();
    // Also catches NaN from counts exceeding their totals.
    if !se.is_finite() || se <= 0.0 {
        return 0.0;
    }

    let z = (p2 - p1) / se;
    let confidence = (1.0 - two_tailed_p_value(z)) * 100.0;
    confidence.clamp(0.0, 100.0)
}

/// P(|Z| ≥ |z|) for a standard normal Z.
pub fn two_tailed_p_value(z: f64) -> f64 {
    2.0 * (1.0 - standard_normal_cdf(z.abs()))
}

pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Abramowitz & Stegun 7.1.26. Absolute error below 1.5e-7.
fn erf(x: f64) -> f64 {
    const P:  f64 = 0.327_591_1;
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erf_matches_reference_values() {
        // erf(0.5), erf(1), erf(2) to 7 places.
        assert!((erf(0.5) - 0.520_499_9).abs() < 1e-6);
        assert!((erf(1.0) - 0.842_700_8).abs() < 1e-6);
        assert!((erf(2.0) - 0.995_322_3).abs() < 1e-6);
        assert!((erf(-1.0) + 0.842_700_8).abs() < 1e-6);
        assert!(erf(0.0).abs() < 1e-6);
    }

    #[test]
    fn cdf_at_critical_values() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!((standard_normal_cdf(1.959_964) - 0.975).abs() < 1e-5);
        assert!((standard_normal_cdf(-1.959_964) - 0.025).abs() < 1e-5);
    }

    #[test]
    fn two_tailed_p_is_symmetric_in_z() {
        assert_eq!(two_tailed_p_value(1.3), two_tailed_p_value(-1.3));
        assert!((two_tailed_p_value(1.959_964) - 0.05).abs() < 1e-5);
    }
}
