//! Rate comparison engine
//!
//! Obtains an executable DEX quote and the oracle cross-rate for a
//! token pair concurrently, then classifies the spread between them.
//! A comparison without both legs is meaningless, so either failure
//! fails the whole call.

mod spread;

pub use spread::calculate_spread;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;

use crate::config::SpreadThresholds;
use crate::dex::{QuoteProvider, QuoteRequest};
use crate::error::{EngineError, Result};
use crate::oracle::OracleProvider;
use crate::routing::{FeedId, RoutingGraph};
use crate::tokens::{TokenDirectory, TokenInfo};
use crate::types::{CurrencyCode, OraclePrice, OrderPayload, RateComparison};

/// Parameters for one comparison
#[derive(Debug, Clone)]
pub struct ComparisonParams {
    pub input_token: String,
    pub output_token: String,
    /// Notional in input-token human units
    pub amount: f64,
    /// Optional taker identity for an executable payload
    pub taker: Option<String>,
}

pub struct RateEngine {
    directory: TokenDirectory,
    graph: RoutingGraph,
    quotes: Arc<dyn QuoteProvider>,
    oracle: Arc<dyn OracleProvider>,
    thresholds: SpreadThresholds,
}

impl RateEngine {
    pub fn new(
        directory: TokenDirectory,
        quotes: Arc<dyn QuoteProvider>,
        oracle: Arc<dyn OracleProvider>,
        thresholds: SpreadThresholds,
    ) -> Self {
        Self {
            directory,
            graph: RoutingGraph::new(),
            quotes,
            oracle,
            thresholds,
        }
    }

    pub fn directory(&self) -> &TokenDirectory {
        &self.directory
    }

    fn token(&self, symbol: &str) -> Result<&'static TokenInfo> {
        self.directory
            .get(symbol)
            .ok_or_else(|| EngineError::UnknownToken(symbol.to_string()))
    }

    /// Compare the executable DEX rate against the oracle cross-rate
    pub async fn get_comparison(&self, params: &ComparisonParams) -> Result<RateComparison> {
        let input = self.token(&params.input_token)?;
        let output = self.token(&params.output_token)?;

        // Floor, never round up: requesting more than the caller
        // specified would overstate the quote
        let amount_raw = (params.amount * 10f64.powi(input.decimals as i32)).floor() as u64;
        let route = self.graph.resolve(input.currency, output.currency)?;
        let feeds = route.feeds();

        let request = QuoteRequest {
            input_mint: input.mint_address.to_string(),
            output_mint: output.mint_address.to_string(),
            amount: amount_raw.to_string(),
            taker: params.taker.clone(),
        };

        let quote_fut = async {
            self.quotes
                .get_quote(&request)
                .await
                .map_err(EngineError::Provider)
        };
        let readings_fut = async {
            // Zero-feed routes never touch the oracle
            if feeds.is_empty() {
                Ok(HashMap::new())
            } else {
                self.oracle
                    .latest_prices(&feeds)
                    .await
                    .map_err(EngineError::Provider)
            }
        };

        let (quote, readings) = tokio::try_join!(quote_fut, readings_fut)?;

        let in_human = parse_raw_amount(&quote.in_amount, input.decimals)?;
        let out_human = parse_raw_amount(&quote.out_amount, output.decimals)?;
        let dex_rate = out_human / in_human;

        let oracle_rate = route.compute(&readings)?;
        let oracle_confidence = aggregate_confidence(&feeds, &readings, oracle_rate);

        let spread = calculate_spread(dex_rate, oracle_rate, &self.thresholds);

        let order = params.taker.as_ref().map(|_| OrderPayload {
            transaction: quote.transaction.clone().unwrap_or_default(),
            request_id: quote.request_id.clone(),
            in_amount: quote.in_amount.clone(),
            out_amount: quote.out_amount.clone(),
        });

        Ok(RateComparison {
            dex_rate,
            oracle_rate,
            oracle_confidence,
            spread_percent: spread.percent,
            spread_direction: spread.direction,
            input_amount: params.amount,
            output_amount: out_human,
            input_token: params.input_token.clone(),
            output_token: params.output_token.clone(),
            order,
        })
    }

    /// Oracle cross-rate between two settlement currencies
    pub async fn get_oracle_rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<f64> {
        let route = self.graph.resolve(from, to)?;
        let feeds = route.feeds();
        if feeds.is_empty() {
            return Ok(1.0);
        }
        let readings = self
            .oracle
            .latest_prices(&feeds)
            .await
            .map_err(EngineError::Provider)?;
        route.compute(&readings)
    }

    pub fn thresholds(&self) -> &SpreadThresholds {
        &self.thresholds
    }
}

fn parse_raw_amount(raw: &str, decimals: u32) -> Result<f64> {
    let units: f64 = raw
        .parse()
        .with_context(|| format!("Invalid raw amount from quote: {raw}"))
        .map_err(EngineError::Provider)?;
    Ok(units / 10f64.powi(decimals as i32))
}

/// Aggregate relative error over all feeds, scaled into rate units
fn aggregate_confidence(
    feeds: &[FeedId],
    readings: &HashMap<FeedId, OraclePrice>,
    oracle_rate: f64,
) -> f64 {
    let relative: f64 = feeds
        .iter()
        .filter_map(|feed| readings.get(feed))
        .map(|r| r.confidence / r.price)
        .sum();
    relative * oracle_rate
}
