//! DEX quote provider
//!
//! Thin HTTP wrapper over a Jupiter Ultra-style aggregator API. The
//! engine only reads quotes; order execution is a passthrough for
//! callers that sign transactions themselves.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ULTRA_URL: &str = "https://lite-api.jup.ag/ultra/v1";

/// Quote request for a raw-amount swap between two mints
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub input_mint: String,
    pub output_mint: String,
    /// Amount in the input token's smallest units
    pub amount: String,
    /// Optional taker address for an executable payload
    pub taker: Option<String>,
}

/// Executable quote returned by the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub in_amount: String,
    pub out_amount: String,
    pub request_id: String,
    /// Base64 transaction, present when a taker was supplied
    #[serde(default)]
    pub transaction: Option<String>,
}

/// Execution request: a signed transaction plus the quote's request id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub signed_transaction: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub status: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Executable DEX quote source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse>;
}

/// REST client for the Ultra aggregator API
pub struct UltraClient {
    client: reqwest::Client,
    base_url: String,
}

impl UltraClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&key).context("Invalid DEX API key")?;
            headers.insert("x-api-key", value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit a signed order for execution (passthrough, never called by
    /// the comparison engine)
    pub async fn execute_order(&self, request: &ExecuteRequest) -> Result<ExecuteResponse> {
        let url = format!("{}/execute", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to submit order for execution")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("DEX execute error {status}: {body}");
        }

        response
            .json()
            .await
            .context("Failed to parse execute response")
    }
}

#[async_trait]
impl QuoteProvider for UltraClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse> {
        let mut query: Vec<(&str, &str)> = vec![
            ("inputMint", request.input_mint.as_str()),
            ("outputMint", request.output_mint.as_str()),
            ("amount", request.amount.as_str()),
        ];
        if let Some(taker) = &request.taker {
            query.push(("taker", taker.as_str()));
        }

        let url = format!("{}/order", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Failed to fetch DEX quote")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("DEX API error {status}: {body}");
        }

        response.json().await.context("Failed to parse DEX quote")
    }
}
