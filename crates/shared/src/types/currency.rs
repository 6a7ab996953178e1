//! Supported currency registry.
//!
//! Every currency the ledger can hold is enumerated here, together with its
//! precision, minimum deposit, and stablecoin-equivalence flag. Components
//! must never match on raw code strings; they go through this registry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currencies supported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Bitcoin
    Btc,
    /// Ethereum
    Eth,
    /// Toncoin
    Ton,
    /// Solana
    Sol,
    /// Tether (TRC20)
    Usdt,
    /// USD Coin
    Usdc,
    /// US Dollar
    Usd,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 7] = [
        Self::Btc,
        Self::Eth,
        Self::Ton,
        Self::Sol,
        Self::Usdt,
        Self::Usdc,
        Self::Usd,
    ];

    /// Ticker code used in storage and over the wire.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Ton => "TON",
            Self::Sol => "SOL",
            Self::Usdt => "USDT",
            Self::Usdc => "USDC",
            Self::Usd => "USD",
        }
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Btc => "Bitcoin",
            Self::Eth => "Ethereum",
            Self::Ton => "Toncoin",
            Self::Sol => "Solana",
            Self::Usdt => "Tether TRC20",
            Self::Usdc => "USD Coin",
            Self::Usd => "US Dollar",
        }
    }

    /// Number of decimal places balances are kept at.
    #[must_use]
    pub const fn decimals(self) -> u32 {
        match self {
            Self::Btc => 8,
            Self::Eth => 18,
            Self::Ton => 9,
            Self::Sol => 9,
            Self::Usdt | Self::Usdc => 6,
            Self::Usd => 2,
        }
    }

    /// Minimum accepted deposit amount.
    #[must_use]
    pub fn min_deposit(self) -> Decimal {
        match self {
            Self::Btc | Self::Eth => Decimal::new(1, 4),
            Self::Ton => Decimal::ONE,
            Self::Sol => Decimal::new(1, 2),
            Self::Usdt | Self::Usdc | Self::Usd => Decimal::new(10, 0),
        }
    }

    /// Whether this currency is in the USD-pegged equivalence set.
    ///
    /// Stablecoins convert 1:1 among themselves and are never priced
    /// against an upstream provider.
    #[must_use]
    pub const fn is_stable(self) -> bool {
        matches!(self, Self::Usdt | Self::Usdc | Self::Usd)
    }

    /// Settlement network label reported alongside deposit addresses.
    #[must_use]
    pub const fn network(self) -> &'static str {
        match self {
            Self::Btc => "bitcoin",
            Self::Eth => "ethereum",
            Self::Ton => "ton",
            Self::Sol => "solana",
            Self::Usdt => "tron",
            Self::Usdc => "ethereum",
            Self::Usd => "fiat",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BTC" => Ok(Self::Btc),
            "ETH" => Ok(Self::Eth),
            "TON" => Ok(Self::Ton),
            "SOL" => Ok(Self::Sol),
            "USDT" => Ok(Self::Usdt),
            "USDC" => Ok(Self::Usdc),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("BTC", Currency::Btc)]
    #[case("btc", Currency::Btc)]
    #[case("Usdt", Currency::Usdt)]
    #[case("USD", Currency::Usd)]
    #[case("ton", Currency::Ton)]
    fn test_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!(Currency::from_str("DOGE").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for currency in Currency::ALL {
            assert_eq!(
                Currency::from_str(&currency.to_string()).unwrap(),
                currency
            );
        }
    }

    #[test]
    fn test_stable_set() {
        let stable: Vec<Currency> = Currency::ALL
            .into_iter()
            .filter(|c| c.is_stable())
            .collect();
        assert_eq!(stable, vec![Currency::Usdt, Currency::Usdc, Currency::Usd]);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(Currency::Btc.decimals(), 8);
        assert_eq!(Currency::Usdt.decimals(), 6);
        assert_eq!(Currency::Usd.decimals(), 2);
    }

    #[test]
    fn test_min_deposit_positive() {
        for currency in Currency::ALL {
            assert!(currency.min_deposit() > Decimal::ZERO);
        }
    }
}
