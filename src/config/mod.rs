//! Configuration management for FXScan
//!
//! Loads from optional config files + environment variables via .env

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub providers: ProvidersConfig,
    pub spread: SpreadThresholds,
    pub scanner: ScannerConfig,
    pub depth: DepthConfig,
    pub candles: CandlesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    /// DEX aggregator API endpoint
    pub dex_url: String,
    /// Optional DEX API key (FXSCAN__PROVIDERS__DEX_API_KEY)
    pub dex_api_key: Option<String>,
    /// Oracle price service endpoint
    pub oracle_url: String,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

/// Spread classification thresholds
///
/// Heuristics carried over from live trading; values are configurable
/// so they can be recalibrated against real liquidity depth.
#[derive(Debug, Clone, Deserialize)]
pub struct SpreadThresholds {
    /// Band below which a spread counts as par, in percent
    pub par_threshold_pct: f64,
    /// Ceiling below which a spread counts as favorable, in percent
    pub favorable_threshold_pct: f64,
}

impl Default for SpreadThresholds {
    fn default() -> Self {
        Self {
            par_threshold_pct: 0.005,
            favorable_threshold_pct: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Reference notional in input-token units for arb comparisons
    pub reference_amount: f64,
    /// Scan cycle interval in seconds
    pub interval_secs: u64,
    /// Requests submitted per batch
    pub batch_size: usize,
    /// Delay between batches in milliseconds
    pub stagger_ms: u64,
    /// Spreads above this absolute percent are quote artifacts, not
    /// opportunities
    pub max_plausible_spread_pct: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepthConfig {
    /// Notional size ladder, smallest first
    pub amounts: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandlesConfig {
    /// Maximum candles retained per (pair, timeframe) series
    pub max_history: usize,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Provider defaults
            .set_default("providers.dex_url", crate::dex::DEFAULT_ULTRA_URL)?
            .set_default("providers.oracle_url", crate::oracle::DEFAULT_HERMES_URL)?
            .set_default("providers.request_timeout_secs", 30)?
            // Spread defaults
            .set_default("spread.par_threshold_pct", 0.005)?
            .set_default("spread.favorable_threshold_pct", 0.5)?
            // Scanner defaults
            .set_default("scanner.reference_amount", 1000.0)?
            .set_default("scanner.interval_secs", 60)?
            .set_default("scanner.batch_size", 6)?
            .set_default("scanner.stagger_ms", 25)?
            .set_default("scanner.max_plausible_spread_pct", 50.0)?
            // Depth defaults
            .set_default(
                "depth.amounts",
                vec![100.0, 1_000.0, 10_000.0, 100_000.0, 500_000.0, 1_000_000.0],
            )?
            // Candle defaults
            .set_default("candles.max_history", 200)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (FXSCAN_*)
            .add_source(Environment::with_prefix("FXSCAN").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "dex={} oracle={} ref_amount={} interval={}s batch={}",
            self.providers.dex_url,
            self.providers.oracle_url,
            self.scanner.reference_amount,
            self.scanner.interval_secs,
            self.scanner.batch_size
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}
