//! Core types used throughout FXScan
//!
//! Defines common data structures for currencies, rates, spreads,
//! arbitrage opportunities and candles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement currencies covered by the token directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurrencyCode {
    USD,
    EUR,
    JPY,
    GBP,
    CHF,
    BRL,
    TRY,
    MXN,
    NGN,
    IDR,
    ZAR,
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::USD
    }
}

impl CurrencyCode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "USD" => Some(CurrencyCode::USD),
            "EUR" => Some(CurrencyCode::EUR),
            "JPY" => Some(CurrencyCode::JPY),
            "GBP" => Some(CurrencyCode::GBP),
            "CHF" => Some(CurrencyCode::CHF),
            "BRL" => Some(CurrencyCode::BRL),
            "TRY" => Some(CurrencyCode::TRY),
            "MXN" => Some(CurrencyCode::MXN),
            "NGN" => Some(CurrencyCode::NGN),
            "IDR" => Some(CurrencyCode::IDR),
            "ZAR" => Some(CurrencyCode::ZAR),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::JPY => "JPY",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::CHF => "CHF",
            CurrencyCode::BRL => "BRL",
            CurrencyCode::TRY => "TRY",
            CurrencyCode::MXN => "MXN",
            CurrencyCode::NGN => "NGN",
            CurrencyCode::IDR => "IDR",
            CurrencyCode::ZAR => "ZAR",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported candle timeframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Min1,
    Min5,
    Min15,
    Hour1,
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Min1
    }
}

impl Timeframe {
    /// All configured timeframes, smallest first
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Min1,
        Timeframe::Min5,
        Timeframe::Min15,
        Timeframe::Hour1,
    ];

    /// Bucket width in seconds
    pub fn secs(&self) -> i64 {
        match self {
            Timeframe::Min1 => 60,
            Timeframe::Min5 => 300,
            Timeframe::Min15 => 900,
            Timeframe::Hour1 => 3600,
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" => Some(Timeframe::Min1),
            "5m" | "5min" => Some(Timeframe::Min5),
            "15m" | "15min" => Some(Timeframe::Min15),
            "1h" | "1hour" => Some(Timeframe::Hour1),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Min1 => write!(f, "1m"),
            Timeframe::Min5 => write!(f, "5m"),
            Timeframe::Min15 => write!(f, "15m"),
            Timeframe::Hour1 => write!(f, "1h"),
        }
    }
}

/// Direction of the DEX-vs-oracle spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadDirection {
    /// DEX pays more than fair value
    Premium,
    /// DEX pays less than fair value
    Discount,
    /// Within the par band
    Par,
}

impl fmt::Display for SpreadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpreadDirection::Premium => write!(f, "premium"),
            SpreadDirection::Discount => write!(f, "discount"),
            SpreadDirection::Par => write!(f, "par"),
        }
    }
}

/// Normalized oracle price for one currency-pair feed
///
/// `price` is how many units of quote-currency one unit of base-currency
/// buys; `confidence` is a symmetric absolute error band in the same units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OraclePrice {
    pub price: f64,
    pub confidence: f64,
    /// Decimal exponent of the raw fixed-point feed value
    pub expo: i32,
    /// Publish time in Unix seconds
    pub publish_time: i64,
}

/// Classified spread between a DEX rate and an oracle rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpreadInfo {
    /// dex_rate - oracle_rate
    pub absolute: f64,
    /// Signed percentage of the oracle rate
    pub percent: f64,
    pub direction: SpreadDirection,
    /// True when the spread is below the noise threshold
    pub favorable: bool,
}

/// Replayable executable-order payload from the DEX quote
///
/// Returned only when a taker identity was supplied. The engine never
/// signs or submits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Base64 transaction blob
    pub transaction: String,
    pub request_id: String,
    /// Raw input amount in smallest units
    pub in_amount: String,
    /// Raw output amount in smallest units
    pub out_amount: String,
}

/// One DEX-vs-oracle rate comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateComparison {
    /// Effective DEX rate (output/input, human units)
    pub dex_rate: f64,
    /// Oracle-derived fair cross-rate
    pub oracle_rate: f64,
    /// Aggregate oracle error band in oracle-rate units
    pub oracle_confidence: f64,
    pub spread_percent: f64,
    pub spread_direction: SpreadDirection,
    /// Input amount in human units
    pub input_amount: f64,
    /// Output amount in human units
    pub output_amount: f64,
    pub input_token: String,
    pub output_token: String,
    /// Executable payload when a taker was supplied
    pub order: Option<OrderPayload>,
}

/// Scanned arbitrage record for one directed pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub input_token: String,
    pub output_token: String,
    pub dex_rate: f64,
    pub oracle_rate: f64,
    pub spread_percent: f64,
    pub spread_direction: SpreadDirection,
    pub output_amount: f64,
    /// True when the DEX pays a premium over the oracle rate
    pub favorable: bool,
    /// True when both tokens settle in the same currency
    pub is_peg_arb: bool,
    /// False when the DEX had no quote for the pair
    pub has_liquidity: bool,
}

/// One size level of a depth analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthLevel {
    pub input_amount: f64,
    pub output_amount: f64,
    pub dex_rate: f64,
    pub oracle_rate: f64,
    pub spread_percent: f64,
    pub spread_direction: SpreadDirection,
    /// Rate degradation vs the best small-size rate, percent, >= 0
    pub price_impact: f64,
}

/// Size-vs-rate curve for a token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthAnalysis {
    pub input_token: String,
    pub output_token: String,
    /// Levels ordered smallest notional first
    pub levels: Vec<DepthLevel>,
    pub oracle_rate: f64,
    /// DEX rate at the smallest successful size
    pub best_rate: f64,
    /// Analysis time in Unix milliseconds
    pub timestamp: i64,
}

/// OHLC candle for one timeframe bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start in Unix seconds
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
