//! Currency routing graph
//!
//! Resolves the oracle cross-rate route between two settlement
//! currencies: identity for same-currency pairs, a single (possibly
//! inverted) feed where one exists, pre-registered composites for known
//! crosses, and a generic two-hop route through USD otherwise. Derived
//! hub routes are memoized on the graph instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::{CurrencyCode, OraclePrice};

/// Named oracle currency-pair feed, e.g. EUR/USD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedId {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl FeedId {
    pub const fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

use CurrencyCode::*;

pub const EUR_USD: FeedId = FeedId::new(EUR, USD);
pub const USD_JPY: FeedId = FeedId::new(USD, JPY);
pub const GBP_USD: FeedId = FeedId::new(GBP, USD);
pub const USD_CHF: FeedId = FeedId::new(USD, CHF);
pub const USD_BRL: FeedId = FeedId::new(USD, BRL);
pub const USD_TRY: FeedId = FeedId::new(USD, TRY);
pub const USD_MXN: FeedId = FeedId::new(USD, MXN);
pub const USD_ZAR: FeedId = FeedId::new(USD, ZAR);
pub const EUR_CHF: FeedId = FeedId::new(EUR, CHF);
pub const GBP_JPY: FeedId = FeedId::new(GBP, JPY);
pub const GBP_CHF: FeedId = FeedId::new(GBP, CHF);

/// One feed reading used as-is or inverted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub feed: FeedId,
    pub invert: bool,
}

impl Leg {
    const fn direct(feed: FeedId) -> Self {
        Self {
            feed,
            invert: false,
        }
    }

    const fn inverse(feed: FeedId) -> Self {
        Self { feed, invert: true }
    }

    fn value(&self, readings: &HashMap<FeedId, OraclePrice>) -> Result<f64> {
        let reading = readings
            .get(&self.feed)
            .ok_or_else(|| EngineError::Provider(anyhow!("Missing oracle reading for {}", self.feed)))?;
        if self.invert {
            Ok(1.0 / reading.price)
        } else {
            Ok(reading.price)
        }
    }
}

/// A resolved route from one currency to another
///
/// Feed readings are passed by name, not position, so composite routes
/// cannot depend on request ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteSpec {
    /// Same-currency route, rate exactly 1.0, zero feeds
    Identity,
    Single(Leg),
    /// Product of two legs, e.g. EUR->USD times USD->JPY
    Product(Leg, Leg),
}

impl RouteSpec {
    /// Feeds this route requires, deduplicated
    pub fn feeds(&self) -> Vec<FeedId> {
        match self {
            RouteSpec::Identity => Vec::new(),
            RouteSpec::Single(leg) => vec![leg.feed],
            RouteSpec::Product(a, b) => {
                if a.feed == b.feed {
                    vec![a.feed]
                } else {
                    vec![a.feed, b.feed]
                }
            }
        }
    }

    /// Compute the scalar rate from named feed readings
    pub fn compute(&self, readings: &HashMap<FeedId, OraclePrice>) -> Result<f64> {
        match self {
            RouteSpec::Identity => Ok(1.0),
            RouteSpec::Single(leg) => leg.value(readings),
            RouteSpec::Product(a, b) => Ok(a.value(readings)? * b.value(readings)?),
        }
    }
}

/// Resolves and caches currency routes
pub struct RoutingGraph {
    /// Memoized hub-derived routes, keyed by ordered currency pair
    hub_cache: Mutex<HashMap<(CurrencyCode, CurrencyCode), RouteSpec>>,
}

impl RoutingGraph {
    pub fn new() -> Self {
        Self {
            hub_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a route or fail with RouteNotFound
    pub fn resolve(&self, from: CurrencyCode, to: CurrencyCode) -> Result<RouteSpec> {
        if from == to {
            return Ok(RouteSpec::Identity);
        }

        if let Some(route) = registered_route(from, to) {
            return Ok(route);
        }

        let mut cache = self
            .hub_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(route) = cache.get(&(from, to)) {
            return Ok(*route);
        }

        if let Some(route) = build_hub_route(from, to) {
            cache.insert((from, to), route);
            return Ok(route);
        }

        Err(EngineError::RouteNotFound { from, to })
    }
}

impl Default for RoutingGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-registered direct and composite routes
///
/// Composites take precedence over the generic hub algorithm.
fn registered_route(from: CurrencyCode, to: CurrencyCode) -> Option<RouteSpec> {
    use RouteSpec::{Product, Single};
    let route = match (from, to) {
        // USD direct routes
        (USD, EUR) => Single(Leg::inverse(EUR_USD)),
        (EUR, USD) => Single(Leg::direct(EUR_USD)),
        (USD, JPY) => Single(Leg::direct(USD_JPY)),
        (JPY, USD) => Single(Leg::inverse(USD_JPY)),
        (USD, GBP) => Single(Leg::inverse(GBP_USD)),
        (GBP, USD) => Single(Leg::direct(GBP_USD)),
        (USD, CHF) => Single(Leg::direct(USD_CHF)),
        (CHF, USD) => Single(Leg::inverse(USD_CHF)),
        (USD, BRL) => Single(Leg::direct(USD_BRL)),
        (BRL, USD) => Single(Leg::inverse(USD_BRL)),
        (USD, TRY) => Single(Leg::direct(USD_TRY)),
        (TRY, USD) => Single(Leg::inverse(USD_TRY)),
        (USD, MXN) => Single(Leg::direct(USD_MXN)),
        (MXN, USD) => Single(Leg::inverse(USD_MXN)),
        (USD, ZAR) => Single(Leg::direct(USD_ZAR)),
        (ZAR, USD) => Single(Leg::inverse(USD_ZAR)),
        // Crosses composed from two USD feeds
        (EUR, JPY) => Product(Leg::direct(EUR_USD), Leg::direct(USD_JPY)),
        (JPY, EUR) => Product(Leg::inverse(USD_JPY), Leg::inverse(EUR_USD)),
        (EUR, GBP) => Product(Leg::direct(EUR_USD), Leg::inverse(GBP_USD)),
        (GBP, EUR) => Product(Leg::direct(GBP_USD), Leg::inverse(EUR_USD)),
        // Crosses with their own feed
        (EUR, CHF) => Single(Leg::direct(EUR_CHF)),
        (CHF, EUR) => Single(Leg::inverse(EUR_CHF)),
        (GBP, JPY) => Single(Leg::direct(GBP_JPY)),
        (JPY, GBP) => Single(Leg::inverse(GBP_JPY)),
        (GBP, CHF) => Single(Leg::direct(GBP_CHF)),
        (CHF, GBP) => Single(Leg::inverse(GBP_CHF)),
        _ => return None,
    };
    Some(route)
}

/// Leg converting one unit of the currency into USD, where a feed exists
fn to_usd_leg(currency: CurrencyCode) -> Option<Leg> {
    let leg = match currency {
        EUR => Leg::direct(EUR_USD),
        GBP => Leg::direct(GBP_USD),
        JPY => Leg::inverse(USD_JPY),
        CHF => Leg::inverse(USD_CHF),
        BRL => Leg::inverse(USD_BRL),
        TRY => Leg::inverse(USD_TRY),
        MXN => Leg::inverse(USD_MXN),
        ZAR => Leg::inverse(USD_ZAR),
        // USD is covered by the direct-feed routes; NGN and IDR have no feed
        USD | NGN | IDR => return None,
    };
    Some(leg)
}

/// Generic two-hop route FROM -> USD -> TO
fn build_hub_route(from: CurrencyCode, to: CurrencyCode) -> Option<RouteSpec> {
    if from == USD || to == USD {
        return None;
    }
    let from_to_usd = to_usd_leg(from)?;
    let to_to_usd = to_usd_leg(to)?;
    // USD -> TO is the inverse of the TO -> USD leg
    let usd_to_to = Leg {
        feed: to_to_usd.feed,
        invert: !to_to_usd.invert,
    };
    Some(RouteSpec::Product(from_to_usd, usd_to_to))
}
