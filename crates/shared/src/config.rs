//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Exchange engine configuration.
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Rate resolution configuration.
    #[serde(default)]
    pub rates: RatesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Exchange engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Fee rate applied to the debit side of an exchange.
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
    /// Wallets opened for every new account.
    #[serde(default = "default_wallet_currencies")]
    pub default_wallet_currencies: Vec<Currency>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
            default_wallet_currencies: default_wallet_currencies(),
        }
    }
}

fn default_fee_rate() -> Decimal {
    // 0.5%
    Decimal::new(5, 3)
}

fn default_wallet_currencies() -> Vec<Currency> {
    vec![Currency::Btc, Currency::Usdt]
}

/// Rate resolution configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Timeout per upstream provider attempt, in seconds.
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
    /// How long a fetched USD spot price stays cached, in seconds.
    #[serde(default = "default_price_cache_ttl")]
    pub price_cache_ttl_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_provider_timeout(),
            price_cache_ttl_secs: default_price_cache_ttl(),
        }
    }
}

fn default_provider_timeout() -> u64 {
    8
}

fn default_price_cache_ttl() -> u64 {
    5
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VALEX").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exchange_defaults() {
        let exchange = ExchangeConfig::default();
        assert_eq!(exchange.fee_rate, dec!(0.005));
        assert_eq!(
            exchange.default_wallet_currencies,
            vec![Currency::Btc, Currency::Usdt]
        );
    }

    #[test]
    fn test_rates_defaults() {
        let rates = RatesConfig::default();
        assert_eq!(rates.provider_timeout_secs, 8);
        assert_eq!(rates.price_cache_ttl_secs, 5);
    }
}
