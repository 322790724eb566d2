//! Tick-to-candle aggregator
//!
//! Buckets a live price-tick stream into bounded multi-timeframe OHLC
//! series. The oracle stream only delivers latest prices, so candles
//! accumulate from session start; there is no historical backfill.
//! Single-writer: callers serialize writes per pair externally.

use std::collections::{HashMap, VecDeque};

use crate::types::{Candle, Timeframe};

pub const DEFAULT_MAX_CANDLES: usize = 200;

/// Aggregates price ticks into bounded OHLC candle series per
/// (pair, timeframe)
pub struct OhlcAggregator {
    series: HashMap<(String, Timeframe), VecDeque<Candle>>,
    /// Maximum candles retained per series; oldest evicted on overflow
    max_candles: usize,
}

impl OhlcAggregator {
    pub fn new(max_candles: usize) -> Self {
        Self {
            series: HashMap::new(),
            max_candles,
        }
    }

    /// Feed a new price tick into every configured timeframe
    ///
    /// A tick whose bucket matches the series' last candle updates it in
    /// place; otherwise a new candle is appended. Ticks for past buckets
    /// are not reconciled — arrival order is assumed monotonic.
    pub fn add_tick(&mut self, pair: &str, price: f64, timestamp_secs: i64) {
        for timeframe in Timeframe::ALL {
            let bucket_start = (timestamp_secs / timeframe.secs()) * timeframe.secs();
            let series = self
                .series
                .entry((pair.to_string(), timeframe))
                .or_default();

            match series.back_mut() {
                Some(last) if last.time == bucket_start => {
                    last.high = last.high.max(price);
                    last.low = last.low.min(price);
                    last.close = price;
                }
                _ => {
                    series.push_back(Candle {
                        time: bucket_start,
                        open: price,
                        high: price,
                        low: price,
                        close: price,
                    });
                    while series.len() > self.max_candles {
                        series.pop_front();
                    }
                }
            }
        }
    }

    /// Snapshot of the candle series for a pair and timeframe
    pub fn get_candles(&self, pair: &str, timeframe: Timeframe) -> Vec<Candle> {
        self.series
            .get(&(pair.to_string(), timeframe))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// True when any timeframe has candles for the pair
    pub fn has_data(&self, pair: &str) -> bool {
        Timeframe::ALL.iter().any(|tf| {
            self.series
                .get(&(pair.to_string(), *tf))
                .map(|s| !s.is_empty())
                .unwrap_or(false)
        })
    }
}

impl Default for OhlcAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDLES)
    }
}
