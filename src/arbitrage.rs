//! Arbitrage pair generation and scanning
//!
//! Generates the peg-arbitrage pair universe from the token directory,
//! scans it on a fixed reference notional with batched request
//! submission, and deduplicates bidirectional results for display.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::config::ScannerConfig;
use crate::engine::{ComparisonParams, RateEngine};
use crate::tokens::TokenDirectory;
use crate::types::{ArbitrageOpportunity, CurrencyCode, RateComparison, SpreadDirection};

/// Canonical "primary" token per supported currency
///
/// Peg arb pairs compare every non-primary token against the primary
/// for the same currency.
pub const PRIMARY_TOKENS: &[(CurrencyCode, &str)] = &[
    (CurrencyCode::USD, "USDC"),
    (CurrencyCode::EUR, "EURC"),
    (CurrencyCode::JPY, "GYEN"),
    (CurrencyCode::GBP, "VGBP"),
    (CurrencyCode::CHF, "VCHF"),
    (CurrencyCode::BRL, "BRZ"),
    (CurrencyCode::TRY, "TRYB"),
    (CurrencyCode::MXN, "MXNe"),
    (CurrencyCode::ZAR, "ZARP"),
];

fn primary_for(currency: CurrencyCode) -> Option<&'static str> {
    PRIMARY_TOKENS
        .iter()
        .find(|(c, _)| *c == currency)
        .map(|(_, s)| *s)
}

/// Directed token pair eligible for peg-arbitrage comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitragePair {
    pub input_token: String,
    pub output_token: String,
}

/// Build the peg-arbitrage pair universe, deterministically
///
/// For every non-primary plain-peg token with a primary for its
/// currency, both directions are emitted. Yield-bearing, synthetic and
/// institutional tokens are excluded: they are not expected to hold a
/// 1:1 peg and would generate false signals.
pub fn generate_pairs(directory: &TokenDirectory) -> Vec<ArbitragePair> {
    let mut tokens: Vec<_> = directory.all().collect();
    tokens.sort_by_key(|t| t.symbol);

    let mut pairs = Vec::new();
    for token in tokens {
        if primary_for(token.currency) == Some(token.symbol) {
            continue;
        }
        if !token.is_plain_peg() {
            continue;
        }
        let Some(primary) = primary_for(token.currency) else {
            continue;
        };
        pairs.push(ArbitragePair {
            input_token: token.symbol.to_string(),
            output_token: primary.to_string(),
        });
        pairs.push(ArbitragePair {
            input_token: primary.to_string(),
            output_token: token.symbol.to_string(),
        });
    }
    pairs
}

/// Outcome of scanning one directed pair
#[derive(Debug, Clone)]
pub enum PairOutcome {
    Quoted(RateComparison),
    /// The DEX had no executable quote for the pair
    NoLiquidity,
}

/// Periodic arbitrage scanner over the generated pair universe
pub struct Scanner {
    engine: Arc<RateEngine>,
    pairs: Vec<ArbitragePair>,
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(engine: Arc<RateEngine>, config: ScannerConfig) -> Self {
        let pairs = generate_pairs(engine.directory());
        Self {
            engine,
            pairs,
            config,
        }
    }

    pub fn pairs(&self) -> &[ArbitragePair] {
        &self.pairs
    }

    /// Run one scan cycle over all pairs
    ///
    /// Requests are submitted in batches with a short stagger to respect
    /// external rate limits. A provider error never aborts the cycle:
    /// the affected pair degrades to a no-liquidity record.
    pub async fn scan(&self) -> Vec<ArbitrageOpportunity> {
        let mut outcomes = Vec::with_capacity(self.pairs.len());
        let batch_size = self.config.batch_size.max(1);

        let mut batches = self.pairs.chunks(batch_size).peekable();
        while let Some(batch) = batches.next() {
            let futures = batch.iter().map(|pair| self.scan_pair(pair));
            outcomes.extend(join_all(futures).await);
            if batches.peek().is_some() {
                tokio::time::sleep(Duration::from_millis(self.config.stagger_ms)).await;
            }
        }

        self.pairs
            .iter()
            .zip(outcomes)
            .map(|(pair, outcome)| self.to_opportunity(pair, outcome))
            .collect()
    }

    async fn scan_pair(&self, pair: &ArbitragePair) -> PairOutcome {
        let params = ComparisonParams {
            input_token: pair.input_token.clone(),
            output_token: pair.output_token.clone(),
            amount: self.config.reference_amount,
            taker: None,
        };
        match self.engine.get_comparison(&params).await {
            Ok(comparison) => PairOutcome::Quoted(comparison),
            Err(e) => {
                tracing::debug!(
                    input = %pair.input_token,
                    output = %pair.output_token,
                    error = %e,
                    "Pair degraded to no-liquidity"
                );
                PairOutcome::NoLiquidity
            }
        }
    }

    fn to_opportunity(&self, pair: &ArbitragePair, outcome: PairOutcome) -> ArbitrageOpportunity {
        let is_peg_arb = self.is_peg_arb(pair);
        match outcome {
            PairOutcome::Quoted(c) => ArbitrageOpportunity {
                input_token: c.input_token,
                output_token: c.output_token,
                dex_rate: c.dex_rate,
                oracle_rate: c.oracle_rate,
                spread_percent: c.spread_percent,
                spread_direction: c.spread_direction,
                output_amount: c.output_amount,
                favorable: c.spread_direction == SpreadDirection::Premium,
                is_peg_arb,
                has_liquidity: true,
            },
            PairOutcome::NoLiquidity => ArbitrageOpportunity {
                input_token: pair.input_token.clone(),
                output_token: pair.output_token.clone(),
                dex_rate: 0.0,
                oracle_rate: 0.0,
                spread_percent: 0.0,
                spread_direction: SpreadDirection::Par,
                output_amount: 0.0,
                favorable: false,
                is_peg_arb,
                has_liquidity: false,
            },
        }
    }

    fn is_peg_arb(&self, pair: &ArbitragePair) -> bool {
        let directory = self.engine.directory();
        match (
            directory.get(&pair.input_token),
            directory.get(&pair.output_token),
        ) {
            (Some(a), Some(b)) => a.currency == b.currency,
            _ => false,
        }
    }
}

/// Deduplicate bidirectional scan results into one record per unordered
/// pair, keeping the direction with the larger absolute spread
///
/// Spreads beyond `max_plausible_spread_pct` are quote or liquidity
/// artifacts and are dropped entirely.
pub fn dedupe(
    opportunities: Vec<ArbitrageOpportunity>,
    max_plausible_spread_pct: f64,
) -> Vec<ArbitrageOpportunity> {
    let mut kept: Vec<ArbitrageOpportunity> = Vec::new();
    let mut index_by_key: HashMap<(String, String), usize> = HashMap::new();

    for opp in opportunities {
        if opp.spread_percent.abs() > max_plausible_spread_pct {
            continue;
        }

        let mut key = [opp.input_token.as_str(), opp.output_token.as_str()];
        key.sort();
        let key = (key[0].to_string(), key[1].to_string());

        match index_by_key.get(&key) {
            Some(&i) => {
                if opp.spread_percent.abs() > kept[i].spread_percent.abs() {
                    kept[i] = opp;
                }
            }
            None => {
                index_by_key.insert(key, kept.len());
                kept.push(opp);
            }
        }
    }

    kept
}
