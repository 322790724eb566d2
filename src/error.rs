//! Core error taxonomy
//!
//! Unknown tokens and unresolvable currency routes are fatal to the
//! calling operation; provider failures are fatal to a single
//! comparison but degraded to "no data" at the scan/depth level.

use thiserror::Error;

use crate::types::CurrencyCode;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("No FX route from {from} to {to}")]
    RouteNotFound {
        from: CurrencyCode,
        to: CurrencyCode,
    },

    #[error("Provider error: {0}")]
    Provider(#[from] anyhow::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
