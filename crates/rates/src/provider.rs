//! Price provider abstraction.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use valex_shared::Currency;

/// Errors a single provider attempt can produce.
///
/// Every variant is treated the same way by the resolver: log and fall
/// through to the next provider in the chain.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, non-2xx, body decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered but the price was unusable.
    #[error("invalid price from {provider} for {asset}: {detail}")]
    InvalidPrice {
        /// Provider that produced the value.
        provider: &'static str,
        /// Asset that was being priced.
        asset: Currency,
        /// What was wrong with it.
        detail: String,
    },
}

/// A single upstream source of USD spot prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Fetches the USD price of one unit of `asset`.
    ///
    /// Implementations must return `ProviderError::InvalidPrice` rather than
    /// a zero, negative, or unparseable value.
    async fn price_usd(&self, asset: Currency) -> Result<Decimal, ProviderError>;
}

/// Parses a provider's decimal string into a validated, strictly positive price.
///
/// # Errors
///
/// Returns `ProviderError::InvalidPrice` when the string does not parse or
/// the parsed value is not strictly positive.
pub fn parse_price(
    provider: &'static str,
    asset: Currency,
    raw: &str,
) -> Result<Decimal, ProviderError> {
    let price: Decimal = raw.parse().map_err(|_| ProviderError::InvalidPrice {
        provider,
        asset,
        detail: format!("unparseable price {raw:?}"),
    })?;

    if price <= Decimal::ZERO {
        return Err(ProviderError::InvalidPrice {
            provider,
            asset,
            detail: format!("non-positive price {price}"),
        });
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_valid_price() {
        let price = parse_price("test", Currency::Btc, "65432.10").unwrap();
        assert_eq!(price, dec!(65432.10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_price("test", Currency::Btc, "NaN").is_err());
        assert!(parse_price("test", Currency::Btc, "").is_err());
        assert!(parse_price("test", Currency::Btc, "1e3y").is_err());
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert!(parse_price("test", Currency::Btc, "0").is_err());
        assert!(parse_price("test", Currency::Btc, "-12.5").is_err());
    }
}
