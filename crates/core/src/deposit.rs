//! Static deposit-address directory.
//!
//! Address issuance is owned by an external custody collaborator; the ledger
//! only exposes a fixed per-currency directory. Fiat and unsupported assets
//! have no on-chain destination and return `None`.

use valex_shared::Currency;

/// A deposit destination for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositAddress {
    /// Currency this address accepts.
    pub currency: Currency,
    /// On-chain destination address.
    pub address: &'static str,
    /// Settlement network label.
    pub network: &'static str,
}

/// Looks up the deposit address for a currency.
#[must_use]
pub fn deposit_address(currency: Currency) -> Option<DepositAddress> {
    let address = match currency {
        Currency::Btc => "bc1q8sx8j787xcdulwpw589qyvjtdxe68qnw8urerp",
        Currency::Usdt => "TBWCCq2qrU87a3tXLciFLCRu41XW6ZH7EZ",
        Currency::Ton => "UQB2pX-OpWmUKPiAoWF9UsnOUS_WylaZ9SPCa_3nN5je8j1D",
        Currency::Eth => "0x1482ca50aB7d38480339748319A9Cc8D7C250670",
        Currency::Sol => "6yKHeJJ1KPiAoWF9UsnQ2sBTkW6b3hXWmUKRu41XWaZ9",
        Currency::Usdc | Currency::Usd => return None,
    };

    Some(DepositAddress {
        currency,
        address,
        network: currency.network(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_currencies_have_addresses() {
        for currency in [
            Currency::Btc,
            Currency::Eth,
            Currency::Ton,
            Currency::Sol,
            Currency::Usdt,
        ] {
            let deposit = deposit_address(currency).unwrap();
            assert!(!deposit.address.is_empty());
            assert_eq!(deposit.network, currency.network());
        }
    }

    #[test]
    fn test_fiat_has_no_address() {
        assert!(deposit_address(Currency::Usd).is_none());
    }
}
