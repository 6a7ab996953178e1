//! Coinbase price providers.
//!
//! Two independent upstreams form the default chain: the Exchange ticker API
//! first, then the Retail spot API as fallback. Both quote `{ASSET}-USD`
//! pairs and return prices as decimal strings.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use valex_shared::Currency;

use crate::provider::{PriceProvider, ProviderError, parse_price};

const EXCHANGE_API: &str = "https://api.exchange.coinbase.com";
const RETAIL_API: &str = "https://api.coinbase.com";
const USER_AGENT: &str = concat!("valex-rates/", env!("CARGO_PKG_VERSION"));

fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Coinbase Exchange ticker API (`/products/{SYM}-USD/ticker`).
#[derive(Debug, Clone)]
pub struct CoinbaseExchange {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
}

impl CoinbaseExchange {
    /// Creates the provider with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl PriceProvider for CoinbaseExchange {
    fn name(&self) -> &'static str {
        "coinbase-exchange"
    }

    async fn price_usd(&self, asset: Currency) -> Result<Decimal, ProviderError> {
        let url = format!("{EXCHANGE_API}/products/{}-USD/ticker", asset.code());
        let ticker: TickerResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_price(self.name(), asset, &ticker.price)
    }
}

/// Coinbase Retail spot API (`/v2/prices/{SYM}-USD/spot`).
#[derive(Debug, Clone)]
pub struct CoinbaseRetail {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SpotResponse {
    data: SpotData,
}

#[derive(Debug, Deserialize)]
struct SpotData {
    amount: String,
}

impl CoinbaseRetail {
    /// Creates the provider with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl PriceProvider for CoinbaseRetail {
    fn name(&self) -> &'static str {
        "coinbase-retail"
    }

    async fn price_usd(&self, asset: Currency) -> Result<Decimal, ProviderError> {
        let url = format!("{RETAIL_API}/v2/prices/{}-USD/spot", asset.code());
        let spot: SpotResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_price(self.name(), asset, &spot.data.amount)
    }
}
