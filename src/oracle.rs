//! Oracle feed provider
//!
//! Fetches published FX prices from a Hermes-style price service and
//! normalizes the fixed-point feed values. Also exposes an SSE stream
//! for live ticks, feeding the candle aggregator.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::routing::{self, FeedId};
use crate::types::OraclePrice;

pub const DEFAULT_HERMES_URL: &str = "https://hermes.pyth.network";

const STREAM_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Hex feed ids on the price service, one per supported currency pair
const FEED_IDS: &[(FeedId, &str)] = &[
    (routing::EUR_USD, "a995d00bb36a63cef7fd2c287dc105fc8f3d93779f062f09551b0af3e81ec30b"),
    (routing::USD_JPY, "ef2c98c804ba503c6a707e38be4dfbb16683775f195b091252bf24693042fd52"),
    (routing::GBP_USD, "84c2dde9633d93d1bcad84e7dc41c9d56578b7ec52fabedc1f335d673df0a7c1"),
    (routing::USD_CHF, "0b1e3297e69f162877b577b0d6a47a0d63b2392bc8499e6540da4187a63e28f8"),
    (routing::USD_BRL, "d2db4dbf1aea74e0f666b0e8f73b9580d407f5e5cf931940b06dc633d7a95906"),
    (routing::USD_TRY, "032a2eba1c2635bf973e95d8f1ad6a74ab7bded8342d1d6847a6eadb74a87a31"),
    (routing::USD_MXN, "e13b1c1ffb32f34e1be9545583f01ef385fde7f42ee66049d30570dc866b77ca"),
    (routing::USD_ZAR, "389d889017db82bf42141f23b61b8de938a4e2d156e36312175bebf797f493f1"),
    (routing::EUR_CHF, "102b7c5b63b48e0b5b5e9f5e0e1f7cfc0d0a68b9a1b3e2bd9fc9b3f7b0487cbb"),
    (routing::GBP_JPY, "58c85dc7eb2b3ebba6d639dc40a3b6b08e73eeb2eb2f6b4e9aa70b2bbef6be56"),
    (routing::GBP_CHF, "9b5729efe3d68e537cdcb2ca70444dea5f06e1660b562632609757076d0b9448"),
];

fn feed_hex_id(feed: FeedId) -> Result<&'static str> {
    FEED_IDS
        .iter()
        .find(|(f, _)| *f == feed)
        .map(|(_, id)| *id)
        .with_context(|| format!("No price-service feed id for pair: {feed}"))
}

fn feed_for_hex_id(hex: &str) -> Option<FeedId> {
    let hex = hex.trim_start_matches("0x");
    FEED_IDS
        .iter()
        .find(|(_, id)| *id == hex)
        .map(|(f, _)| *f)
}

/// Oracle price provider for named currency-pair feeds
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OracleProvider: Send + Sync {
    /// Latest published price for one feed
    async fn latest_price(&self, feed: FeedId) -> Result<OraclePrice>;

    /// Latest published prices for a batch of feeds
    async fn latest_prices(&self, feeds: &[FeedId]) -> Result<HashMap<FeedId, OraclePrice>>;
}

// Wire shape of the price service response
#[derive(Debug, Deserialize)]
struct PriceUpdateResponse {
    parsed: Option<Vec<ParsedUpdate>>,
}

#[derive(Debug, Deserialize)]
struct ParsedUpdate {
    id: String,
    price: RawPrice,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    price: String,
    conf: String,
    expo: i32,
    publish_time: i64,
}

/// Scale a fixed-point feed value into a float price
fn normalize_price(raw: &RawPrice) -> Result<OraclePrice> {
    let price: f64 = raw
        .price
        .parse()
        .with_context(|| format!("Invalid feed price: {}", raw.price))?;
    let conf: f64 = raw
        .conf
        .parse()
        .with_context(|| format!("Invalid feed confidence: {}", raw.conf))?;
    let multiplier = 10f64.powi(raw.expo);
    Ok(OraclePrice {
        price: price * multiplier,
        confidence: conf * multiplier,
        expo: raw.expo,
        publish_time: raw.publish_time,
    })
}

/// HTTP client for the Hermes price service
pub struct HermesClient {
    client: reqwest::Client,
    base_url: String,
}

impl HermesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn latest_url(&self, feeds: &[FeedId]) -> Result<String> {
        let mut params: Vec<String> = Vec::with_capacity(feeds.len() + 1);
        for feed in feeds {
            params.push(format!("ids[]={}", feed_hex_id(*feed)?));
        }
        params.push("parsed=true".to_string());
        Ok(format!(
            "{}/v2/updates/price/latest?{}",
            self.base_url,
            params.join("&")
        ))
    }

    async fn fetch_updates(&self, feeds: &[FeedId]) -> Result<Vec<ParsedUpdate>> {
        let url = self.latest_url(feeds)?;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch oracle prices")?;

        if !response.status().is_success() {
            bail!("Price service returned error: {}", response.status());
        }

        let body: PriceUpdateResponse = response
            .json()
            .await
            .context("Failed to parse price service response")?;
        Ok(body.parsed.unwrap_or_default())
    }

    /// Spawn a live SSE price stream for the given feeds
    ///
    /// Reconnects after a short delay on any stream error; drops out
    /// when the receiver side is closed.
    pub fn stream_prices(&self, feeds: Vec<FeedId>) -> mpsc::Receiver<(FeedId, OraclePrice)> {
        let (tx, rx) = mpsc::channel(256);
        let client = self.client.clone();
        let base_url = self.base_url.clone();

        tokio::spawn(async move {
            loop {
                match stream_once(&client, &base_url, &feeds, &tx).await {
                    Ok(()) => {
                        // Receiver closed, stop for good
                        if tx.is_closed() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Oracle price stream dropped, reconnecting");
                    }
                }
                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(STREAM_RECONNECT_DELAY).await;
            }
        });

        rx
    }
}

async fn stream_once(
    client: &reqwest::Client,
    base_url: &str,
    feeds: &[FeedId],
    tx: &mpsc::Sender<(FeedId, OraclePrice)>,
) -> Result<()> {
    let mut params: Vec<String> = Vec::with_capacity(feeds.len() + 1);
    for feed in feeds {
        params.push(format!("ids[]={}", feed_hex_id(*feed)?));
    }
    params.push("parsed=true".to_string());
    let url = format!("{}/v2/updates/price/stream?{}", base_url, params.join("&"));

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to open oracle price stream")?;
    if !response.status().is_success() {
        bail!("Price stream returned error: {}", response.status());
    }

    let mut body = response.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.context("Price stream read failed")?;
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        // SSE frames are newline-delimited; keep the trailing partial line
        while let Some(pos) = buffer.find('\n') {
            let line = buffer[..pos].trim().to_string();
            buffer.drain(..=pos);

            let Some(payload) = line.strip_prefix("data:") else {
                continue;
            };
            let Ok(update) = serde_json::from_str::<PriceUpdateResponse>(payload.trim()) else {
                // Skip malformed SSE messages
                continue;
            };
            for parsed in update.parsed.unwrap_or_default() {
                let Some(feed) = feed_for_hex_id(&parsed.id) else {
                    continue;
                };
                let Ok(price) = normalize_price(&parsed.price) else {
                    continue;
                };
                if tx.send((feed, price)).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    Ok(())
}

#[async_trait]
impl OracleProvider for HermesClient {
    async fn latest_price(&self, feed: FeedId) -> Result<OraclePrice> {
        let updates = self.fetch_updates(&[feed]).await?;
        let parsed = updates
            .first()
            .with_context(|| format!("No price data returned for {feed}"))?;
        normalize_price(&parsed.price)
    }

    async fn latest_prices(&self, feeds: &[FeedId]) -> Result<HashMap<FeedId, OraclePrice>> {
        if feeds.is_empty() {
            return Ok(HashMap::new());
        }
        let updates = self.fetch_updates(feeds).await?;

        let mut result = HashMap::with_capacity(feeds.len());
        for parsed in &updates {
            if let Some(feed) = feed_for_hex_id(&parsed.id) {
                result.insert(feed, normalize_price(&parsed.price)?);
            }
        }
        for feed in feeds {
            if !result.contains_key(feed) {
                bail!("No price data returned for {feed}");
            }
        }
        Ok(result)
    }
}
