//! Percentage presentation: fixed-decimal, round-half-up.

/// Relative slack under which a scaled value counts as an exact half.
const HALF_TOLERANCE: f64 = 1e-9;

/// Fraction → percentage rounded half-up (toward +∞) at `decimals` places.
///
/// Decimal halves such as 0.55 % are not exact in binary and can land a
/// hair below .5 once scaled; those still round up.
pub fn round_percent(fraction: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = fraction * 100.0 * factor;
    let shifted = scaled + 0.5;
    let mut rounded = shifted.floor();
    if shifted - rounded >= 1.0 - HALF_TOLERANCE * scaled.abs().max(1.0) {
        rounded += 1.0;
    }
    rounded / factor
}

/// `0.4882` at one decimal → `"48.8%"`.
pub fn format_percent(fraction: f64, decimals: u32) -> String {
    format!(
        "{:.*}%",
        decimals as usize,
        round_percent(fraction, decimals)
    )
}

/// Signed period-over-period change in percent; 0 when `previous` is 0.
pub fn period_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_at_one_decimal() {
        assert_eq!(round_percent(0.5, 1), 50.0);
        assert_eq!(round_percent(0.12345, 1), 12.3);
        assert_eq!(round_percent(0.12375, 1), 12.4);
        assert_eq!(round_percent(0.0, 1), 0.0);
    }

    #[test]
    fn negative_halves_round_toward_positive() {
        // -3.125% → -3.12, 3.125% → 3.13
        assert_eq!(round_percent(-0.03125, 2), -3.12);
        assert_eq!(round_percent(0.03125, 2), 3.13);
    }

    #[test]
    fn decimal_halves_round_up() {
        // 11/2000 = 0.55 %, 59/2000 = 2.95 %
        assert_eq!(round_percent(11.0 / 2000.0, 1), 0.6);
        assert_eq!(round_percent(59.0 / 2000.0, 1), 3.0);
        assert_eq!(format_percent(11.0 / 2000.0, 1), "0.6%");
        assert_eq!(format_percent(59.0 / 2000.0, 1), "3.0%");
    }

    #[test]
    fn count_ratios_match_integer_half_up() {
        for total in 200u64..=2_000 {
            for count in 0..=total {
                // half-up of count * 1000 / total, in integers
                let tenths = (2 * count * 1_000 + total) / (2 * total);
                let expected = tenths as f64 / 10.0;
                let actual = round_percent(count as f64 / total as f64, 1);
                assert_eq!(actual, expected, "{count}/{total}");
            }
        }
    }

    #[test]
    fn formats_with_fixed_decimals() {
        assert_eq!(format_percent(1199.0 / 2456.0, 1), "48.8%");
        assert_eq!(format_percent(0.5, 1), "50.0%");
        assert_eq!(format_percent(0.5, 0), "50%");
        assert_eq!(format_percent(0.0, 2), "0.00%");
    }

    #[test]
    fn period_change_guards_zero_baseline() {
        assert!((period_change(120.0, 100.0) - 20.0).abs() < 1e-9);
        assert!((period_change(95.0, 100.0) + 5.0).abs() < 1e-9);
        assert_eq!(period_change(10.0, 0.0), 0.0);
    }
}
