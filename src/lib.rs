//! FXScan Library
//!
//! Compares executable DEX quotes for stablecoin pairs against
//! oracle-derived fair cross-rates, scans for peg-arbitrage
//! opportunities, and analyzes quote depth.

pub mod arbitrage;
pub mod candles;
pub mod config;
pub mod depth;
pub mod dex;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod routing;
pub mod tokens;
pub mod types;
