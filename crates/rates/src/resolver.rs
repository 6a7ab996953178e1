//! Rate resolution across the provider chain.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use valex_shared::Currency;
use valex_shared::config::RatesConfig;

use crate::coinbase::{CoinbaseExchange, CoinbaseRetail};
use crate::provider::PriceProvider;

/// Errors surfaced by rate resolution.
#[derive(Debug, Error)]
pub enum RateError {
    /// Every provider in the chain failed or returned an unusable price.
    #[error("no provider returned a usable USD price for {0}")]
    Unavailable(Currency),
}

/// Resolves conversion rates between supported currencies.
///
/// `resolve(from, to)` returns `rate` such that
/// `amount_to = amount_from * rate`. Stablecoins (USD-pegged assets) are
/// treated as 1:1 among themselves; everything else is derived from USD spot
/// prices fetched through the ordered provider chain.
pub struct RateResolver {
    providers: Vec<Arc<dyn PriceProvider>>,
    price_cache: Cache<Currency, Decimal>,
}

impl std::fmt::Debug for RateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateResolver")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl RateResolver {
    /// Builds the default Coinbase chain from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an underlying HTTP client cannot be constructed.
    pub fn from_config(config: &RatesConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.provider_timeout_secs);
        let providers: Vec<Arc<dyn PriceProvider>> = vec![
            Arc::new(CoinbaseExchange::new(timeout)?),
            Arc::new(CoinbaseRetail::new(timeout)?),
        ];

        Ok(Self::with_providers(
            providers,
            Duration::from_secs(config.price_cache_ttl_secs),
        ))
    }

    /// Builds a resolver over an explicit provider chain.
    ///
    /// Providers are tried in order; the first usable price wins.
    #[must_use]
    pub fn with_providers(
        providers: Vec<Arc<dyn PriceProvider>>,
        price_ttl: Duration,
    ) -> Self {
        let price_cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(price_ttl)
            .build();

        Self {
            providers,
            price_cache,
        }
    }

    /// Resolves the conversion rate from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `RateError::Unavailable` when a required USD price cannot be
    /// obtained from any provider.
    pub async fn resolve(&self, from: Currency, to: Currency) -> Result<Decimal, RateError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        // USD-pegged assets convert 1:1 among themselves.
        if from.is_stable() && to.is_stable() {
            return Ok(Decimal::ONE);
        }

        if from.is_stable() {
            let price = self.price_usd(to).await?;
            return Ok(Decimal::ONE / price);
        }

        if to.is_stable() {
            return self.price_usd(from).await;
        }

        // Crypto to crypto: fetch both legs concurrently so latency is
        // bounded by the slower leg, not the sum.
        let (price_from, price_to) =
            tokio::try_join!(self.price_usd(from), self.price_usd(to))?;

        Ok(price_from / price_to)
    }

    /// Fetches the USD spot price of `asset` through the provider chain,
    /// consulting the short-lived cache first.
    async fn price_usd(&self, asset: Currency) -> Result<Decimal, RateError> {
        if let Some(price) = self.price_cache.get(&asset).await {
            return Ok(price);
        }

        for provider in &self.providers {
            match provider.price_usd(asset).await {
                Ok(price) if price > Decimal::ZERO => {
                    debug!(provider = provider.name(), %asset, %price, "fetched USD price");
                    self.price_cache.insert(asset, price).await;
                    return Ok(price);
                }
                Ok(price) => {
                    warn!(
                        provider = provider.name(),
                        %asset,
                        %price,
                        "provider returned non-positive price, trying next"
                    );
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        %asset,
                        error = %e,
                        "provider failed, trying next"
                    );
                }
            }
        }

        Err(RateError::Unavailable(asset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticProvider {
        prices: HashMap<Currency, Decimal>,
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn new(prices: &[(Currency, Decimal)]) -> Arc<Self> {
            Arc::new(Self {
                prices: prices.iter().copied().collect(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceProvider for StaticProvider {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn price_usd(&self, asset: Currency) -> Result<Decimal, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prices
                .get(&asset)
                .copied()
                .ok_or(ProviderError::InvalidPrice {
                    provider: "static",
                    asset,
                    detail: "no price configured".to_string(),
                })
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl PriceProvider for BrokenProvider {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn price_usd(&self, asset: Currency) -> Result<Decimal, ProviderError> {
            Err(ProviderError::InvalidPrice {
                provider: "broken",
                asset,
                detail: "always down".to_string(),
            })
        }
    }

    fn broken() -> Arc<dyn PriceProvider> {
        Arc::new(BrokenProvider)
    }

    fn resolver(providers: Vec<Arc<dyn PriceProvider>>) -> RateResolver {
        RateResolver::with_providers(providers, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_same_currency_is_one() {
        let r = resolver(vec![broken()]);
        assert_eq!(
            r.resolve(Currency::Btc, Currency::Btc).await.unwrap(),
            Decimal::ONE
        );
    }

    #[tokio::test]
    async fn test_stable_pair_is_one() {
        // No provider is consulted for USD-pegged pairs.
        let r = resolver(vec![broken()]);
        assert_eq!(
            r.resolve(Currency::Usd, Currency::Usdt).await.unwrap(),
            Decimal::ONE
        );
        assert_eq!(
            r.resolve(Currency::Usdt, Currency::Usd).await.unwrap(),
            Decimal::ONE
        );
        assert_eq!(
            r.resolve(Currency::Usdt, Currency::Usdc).await.unwrap(),
            Decimal::ONE
        );
    }

    #[tokio::test]
    async fn test_stable_to_crypto_inverts_price() {
        let provider = StaticProvider::new(&[(Currency::Btc, dec!(50000))]);
        let r = resolver(vec![provider]);

        let rate = r.resolve(Currency::Usdt, Currency::Btc).await.unwrap();
        assert_eq!(rate, Decimal::ONE / dec!(50000));
    }

    #[tokio::test]
    async fn test_crypto_to_stable_is_price() {
        let provider = StaticProvider::new(&[(Currency::Btc, dec!(50000))]);
        let r = resolver(vec![provider]);

        let rate = r.resolve(Currency::Btc, Currency::Usdc).await.unwrap();
        assert_eq!(rate, dec!(50000));
    }

    #[tokio::test]
    async fn test_cross_rate_divides_both_legs() {
        let provider = StaticProvider::new(&[
            (Currency::Btc, dec!(50000)),
            (Currency::Eth, dec!(2500)),
        ]);
        let r = resolver(vec![provider]);

        let rate = r.resolve(Currency::Btc, Currency::Eth).await.unwrap();
        assert_eq!(rate, dec!(20));
    }

    #[tokio::test]
    async fn test_fallback_to_secondary_provider() {
        let secondary = StaticProvider::new(&[(Currency::Ton, dec!(5.25))]);
        let r = resolver(vec![broken(), secondary.clone()]);

        let rate = r.resolve(Currency::Ton, Currency::Usdt).await.unwrap();
        assert_eq!(rate, dec!(5.25));
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_positive_price_falls_through() {
        let bad = StaticProvider::new(&[(Currency::Ton, dec!(0))]);
        let good = StaticProvider::new(&[(Currency::Ton, dec!(5.25))]);
        let r = resolver(vec![bad, good]);

        let rate = r.resolve(Currency::Ton, Currency::Usd).await.unwrap();
        assert_eq!(rate, dec!(5.25));
    }

    #[tokio::test]
    async fn test_all_providers_failing_is_unavailable() {
        let r = resolver(vec![broken(), broken()]);

        let err = r.resolve(Currency::Btc, Currency::Usdt).await.unwrap_err();
        assert!(matches!(err, RateError::Unavailable(Currency::Btc)));
    }

    #[tokio::test]
    async fn test_price_cache_avoids_refetch() {
        let provider = StaticProvider::new(&[(Currency::Btc, dec!(50000))]);
        let r = resolver(vec![provider.clone()]);

        r.resolve(Currency::Btc, Currency::Usd).await.unwrap();
        r.resolve(Currency::Btc, Currency::Usd).await.unwrap();
        r.resolve(Currency::Usd, Currency::Btc).await.unwrap();

        assert_eq!(provider.calls(), 1);
    }
}
