//! Arbitrage scan daemon
//!
//! Runs the peg-arbitrage scanner on a fixed interval and logs the
//! deduplicated opportunities.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use fxscan::arbitrage::{dedupe, Scanner};
use fxscan::config::AppConfig;
use fxscan::dex::UltraClient;
use fxscan::engine::RateEngine;
use fxscan::oracle::HermesClient;
use fxscan::tokens::TokenDirectory;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    tracing::info!(config = %config.digest(), "Starting FXScan scanner");

    let timeout = Duration::from_secs(config.providers.request_timeout_secs);
    let quotes = Arc::new(UltraClient::new(
        &config.providers.dex_url,
        config.providers.dex_api_key.clone(),
        timeout,
    )?);
    let oracle = Arc::new(HermesClient::new(&config.providers.oracle_url, timeout)?);

    let engine = Arc::new(RateEngine::new(
        TokenDirectory::new(),
        quotes,
        oracle,
        config.spread.clone(),
    ));
    let scanner = Scanner::new(engine, config.scanner.clone());
    tracing::info!(pairs = scanner.pairs().len(), "Pair universe generated");

    let mut ticker = tokio::time::interval(Duration::from_secs(config.scanner.interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_cycle(&scanner, config.scanner.max_plausible_spread_pct).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                return Ok(());
            }
        }
    }
}

async fn run_cycle(scanner: &Scanner, max_plausible_spread_pct: f64) {
    let opportunities = scanner.scan().await;
    let live = opportunities.iter().filter(|o| o.has_liquidity).count();
    let mut deduped = dedupe(opportunities, max_plausible_spread_pct);
    deduped.sort_by(|a, b| {
        b.spread_percent
            .abs()
            .partial_cmp(&a.spread_percent.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tracing::info!(live, shown = deduped.len(), "Scan cycle complete");

    for opp in deduped.iter().take(10) {
        if !opp.has_liquidity {
            continue;
        }
        tracing::info!(
            pair = format!("{}->{}", opp.input_token, opp.output_token),
            spread_pct = format!("{:+.4}", opp.spread_percent),
            direction = %opp.spread_direction,
            dex_rate = opp.dex_rate,
            oracle_rate = opp.oracle_rate,
            peg = opp.is_peg_arb,
            "Opportunity"
        );
    }
}
