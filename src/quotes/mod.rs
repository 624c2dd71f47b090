//! Price quote sources.
//!
//! Defines the `QuoteSource` trait and provides the Coinbase
//! implementation used in production.

pub mod coinbase;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::PriceQuote;

pub use coinbase::CoinbaseClient;

/// Abstraction over spot-price providers.
///
/// Implementors are constructed around a fixed currency pair and fetch
/// its current buy and sell price in a single call. Any network, HTTP,
/// or decode failure is an error; there is no partial result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the current buy/sell prices for the configured pair.
    async fn fetch(&self) -> Result<PriceQuote>;
}
