//! Depth / price-impact analyzer
//!
//! Runs the rate comparison engine across a ladder of notional sizes
//! to build a size-vs-rate curve. Individual sizes may fail (thin
//! liquidity at large notional); those levels are dropped rather than
//! failing the analysis.

use chrono::Utc;
use futures_util::future::join_all;

use crate::engine::{ComparisonParams, RateEngine};
use crate::types::{DepthAnalysis, DepthLevel, RateComparison};

/// Analyze how the effective rate degrades as trade size grows
///
/// `size_ladder` must be ordered smallest first; the smallest
/// successful size anchors the best rate and therefore zero impact.
/// Returns None when every level fails.
pub async fn analyze_depth(
    engine: &RateEngine,
    input_token: &str,
    output_token: &str,
    size_ladder: &[f64],
) -> Option<DepthAnalysis> {
    let futures = size_ladder.iter().map(|&amount| async move {
        let params = ComparisonParams {
            input_token: input_token.to_string(),
            output_token: output_token.to_string(),
            amount,
            taker: None,
        };
        match engine.get_comparison(&params).await {
            Ok(comparison) => Some((amount, comparison)),
            Err(e) => {
                tracing::debug!(
                    input = input_token,
                    output = output_token,
                    amount,
                    error = %e,
                    "No data at this size"
                );
                None
            }
        }
    });

    let surviving: Vec<(f64, RateComparison)> =
        join_all(futures).await.into_iter().flatten().collect();
    if surviving.is_empty() {
        return None;
    }

    // Smallest successful size has the least slippage
    let best_rate = surviving[0].1.dex_rate;
    let oracle_rate = surviving[0].1.oracle_rate;

    let levels = surviving
        .into_iter()
        .map(|(amount, c)| {
            let price_impact = ((best_rate - c.dex_rate) / best_rate * 100.0).max(0.0);
            DepthLevel {
                input_amount: amount,
                output_amount: c.output_amount,
                dex_rate: c.dex_rate,
                oracle_rate: c.oracle_rate,
                spread_percent: c.spread_percent,
                spread_direction: c.spread_direction,
                price_impact,
            }
        })
        .collect();

    Some(DepthAnalysis {
        input_token: input_token.to_string(),
        output_token: output_token.to_string(),
        levels,
        oracle_rate,
        best_rate,
        timestamp: Utc::now().timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    // Impact math is covered in tests/engine_tests.rs with mocked
    // providers; the pure clamp is checked here.

    #[test]
    fn test_impact_clamped_non_negative() {
        let best: f64 = 1.085;
        let better_level: f64 = 1.090;
        let impact = ((best - better_level) / best * 100.0).max(0.0);
        assert_eq!(impact, 0.0);
    }

    #[test]
    fn test_impact_example_ladder() {
        let best: f64 = 1.085;
        let impacts: Vec<f64> = [1.085, 1.083, 1.070]
            .iter()
            .map(|r| ((best - r) / best * 100.0).max(0.0))
            .collect();
        assert_eq!(impacts[0], 0.0);
        assert!((impacts[1] - 0.184).abs() < 0.001);
        assert!((impacts[2] - 1.382).abs() < 0.001);
    }
}
