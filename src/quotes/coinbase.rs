//! Coinbase spot-price integration.
//!
//! Fetches buy and sell prices for a single currency pair from the
//! public Coinbase v2 prices API. No authentication required.
//!
//! API shape: `GET {base}/{pair}/{side}` where side is `buy` or `sell`,
//! returning `{"data": {"base": "BTC", "currency": "USD", "amount": "50000.00"}}`.
//! The amount is a decimal string and must be parsed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::QuoteSource;
use crate::types::PriceQuote;

// ---------------------------------------------------------------------------
// API response types (Coinbase JSON → Rust)
// ---------------------------------------------------------------------------

/// Envelope returned by the prices endpoint. We only deserialize the
/// fields we need.
#[derive(Debug, Deserialize)]
struct SpotPriceResponse {
    data: SpotPrice,
}

#[derive(Debug, Deserialize)]
struct SpotPrice {
    /// Price as a decimal string, e.g. "50000.00".
    amount: String,
}

impl SpotPrice {
    fn parse_amount(&self) -> Result<f64> {
        self.amount
            .parse::<f64>()
            .with_context(|| format!("Invalid amount in price response: {:?}", self.amount))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Coinbase spot-price client for one currency pair.
pub struct CoinbaseClient {
    http: Client,
    base_url: String,
    pair: String,
}

impl CoinbaseClient {
    /// Create a new client for the given pair, e.g. "BTC-USD".
    pub fn new(base_url: &str, pair: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("vigil/0.1.0")
            .build()
            .context("Failed to build HTTP client for Coinbase")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            pair: pair.to_string(),
        })
    }

    /// Fetch one side ("buy" or "sell") of the configured pair.
    async fn spot(&self, side: &str) -> Result<f64> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(&self.pair),
            side,
        );

        debug!(url = %url, "Fetching Coinbase spot price");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Coinbase price request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Coinbase API error {status}: {body}");
        }

        let parsed: SpotPriceResponse = resp
            .json()
            .await
            .context("Failed to parse Coinbase price response")?;

        parsed.data.parse_amount()
    }
}

#[async_trait]
impl QuoteSource for CoinbaseClient {
    async fn fetch(&self) -> Result<PriceQuote> {
        info!(pair = %self.pair, "Fetching prices from Coinbase");

        let buy = self.spot("buy").await?;
        let sell = self.spot("sell").await?;

        let quote = PriceQuote {
            pair: self.pair.clone(),
            buy,
            sell,
        };
        info!(pair = %quote.pair, buy = quote.buy, sell = quote.sell, "Current prices");

        Ok(quote)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
