//! Spread classification between a DEX rate and an oracle rate

use crate::config::SpreadThresholds;
use crate::types::{SpreadDirection, SpreadInfo};

/// Classify the deviation of a DEX rate from the oracle fair rate
///
/// A zero oracle rate is a degenerate input (unresolvable feed); it is
/// reported as a zero par spread instead of dividing by zero.
pub fn calculate_spread(
    dex_rate: f64,
    oracle_rate: f64,
    thresholds: &SpreadThresholds,
) -> SpreadInfo {
    if oracle_rate == 0.0 {
        return SpreadInfo {
            absolute: 0.0,
            percent: 0.0,
            direction: SpreadDirection::Par,
            favorable: true,
        };
    }

    let absolute = dex_rate - oracle_rate;
    let percent = absolute / oracle_rate * 100.0;

    let direction = if percent.abs() < thresholds.par_threshold_pct {
        SpreadDirection::Par
    } else if percent > 0.0 {
        SpreadDirection::Premium
    } else {
        SpreadDirection::Discount
    };

    SpreadInfo {
        absolute,
        percent,
        direction,
        favorable: percent.abs() < thresholds.favorable_threshold_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(dex: f64, oracle: f64) -> SpreadInfo {
        calculate_spread(dex, oracle, &SpreadThresholds::default())
    }

    #[test]
    fn test_identical_rates_are_par() {
        let result = spread(1.0845, 1.0845);
        assert_eq!(result.direction, SpreadDirection::Par);
        assert_eq!(result.absolute, 0.0);
        assert!(result.favorable);
    }

    #[test]
    fn test_premium_when_dex_higher() {
        let result = spread(1.09, 1.08);
        assert_eq!(result.direction, SpreadDirection::Premium);
        assert!((result.percent - 0.926).abs() < 0.01);
        assert!(!result.favorable);
    }

    #[test]
    fn test_discount_when_dex_lower() {
        let result = spread(1.07, 1.08);
        assert_eq!(result.direction, SpreadDirection::Discount);
        assert!(result.percent < 0.0);
    }

    #[test]
    fn test_favorable_under_half_percent() {
        let result = spread(1.084, 1.085);
        assert!(result.favorable);
    }

    #[test]
    fn test_unfavorable_over_half_percent() {
        let result = spread(1.07, 1.085);
        assert!(!result.favorable);
    }

    #[test]
    fn test_zero_oracle_rate_is_par() {
        let result = spread(1.08, 0.0);
        assert_eq!(result.direction, SpreadDirection::Par);
        assert_eq!(result.percent, 0.0);
        assert!(result.favorable);
    }

    #[test]
    fn test_percent_is_scale_invariant() {
        let a = spread(1.09, 1.08);
        let b = spread(1.09 * 137.5, 1.08 * 137.5);
        assert!((a.percent - b.percent).abs() < 1e-9);
        assert_eq!(a.direction, b.direction);
    }
}
