//! Exchange quote computation.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use valex_shared::Currency;

use super::conversion::convert_amount;

/// Errors produced while computing a quote.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// Exchange amount must be strictly positive.
    #[error("amount must be positive")]
    NonPositiveAmount,

    /// Source and destination currencies must differ.
    #[error("from and to currencies must be different")]
    SameCurrency,

    /// A usable rate is strictly positive.
    #[error("rate must be positive")]
    NonPositiveRate,
}

/// A fully computed exchange quote.
///
/// The quote fixes every number the atomic commit will apply: the rate is
/// captured once and never re-resolved mid-transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeQuote {
    /// Currency being sold.
    pub from: Currency,
    /// Currency being bought.
    pub to: Currency,
    /// Amount sold, in the source currency.
    pub amount: Decimal,
    /// Rate captured for this quote (`converted = amount * rate` before rounding).
    pub rate: Decimal,
    /// Fee charged on the debit side, in the source currency.
    pub fee: Decimal,
    /// Total debited from the source wallet (`amount + fee`).
    pub debit_total: Decimal,
    /// Amount credited to the destination wallet, in the destination currency.
    pub converted: Decimal,
}

impl ExchangeQuote {
    /// Computes a quote for selling `amount` of `from` into `to` at `rate`.
    ///
    /// The fee is `amount * fee_rate`, rounded to the source currency's
    /// precision; the converted amount is rounded to the destination
    /// currency's precision. Both use banker's rounding.
    ///
    /// # Errors
    ///
    /// Returns a `QuoteError` when the amount or rate is not strictly
    /// positive, or when both currencies are the same.
    pub fn compute(
        from: Currency,
        to: Currency,
        amount: Decimal,
        rate: Decimal,
        fee_rate: Decimal,
    ) -> Result<Self, QuoteError> {
        if from == to {
            return Err(QuoteError::SameCurrency);
        }
        if amount <= Decimal::ZERO {
            return Err(QuoteError::NonPositiveAmount);
        }
        if rate <= Decimal::ZERO {
            return Err(QuoteError::NonPositiveRate);
        }

        let fee = (amount * fee_rate)
            .round_dp_with_strategy(from.decimals(), RoundingStrategy::MidpointNearestEven);
        let converted = convert_amount(amount, rate, to.decimals());

        Ok(Self {
            from,
            to,
            amount,
            rate,
            fee,
            debit_total: amount + fee,
            converted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_usdt_to_btc() {
        // 50 USDT at 0.00002 with a 0.5% fee: debit 50.25, credit 0.001 BTC
        let quote = ExchangeQuote::compute(
            Currency::Usdt,
            Currency::Btc,
            dec!(50),
            dec!(0.00002),
            dec!(0.005),
        )
        .unwrap();

        assert_eq!(quote.fee, dec!(0.25));
        assert_eq!(quote.debit_total, dec!(50.25));
        assert_eq!(quote.converted, dec!(0.001));
    }

    #[test]
    fn test_quote_full_balance_overshoots() {
        // Selling all 100 USDT needs 100.5 to cover the fee
        let quote = ExchangeQuote::compute(
            Currency::Usdt,
            Currency::Btc,
            dec!(100),
            dec!(0.00002),
            dec!(0.005),
        )
        .unwrap();

        assert_eq!(quote.debit_total, dec!(100.5));
        assert!(quote.debit_total > dec!(100));
    }

    #[test]
    fn test_quote_rejects_same_currency() {
        let result = ExchangeQuote::compute(
            Currency::Btc,
            Currency::Btc,
            dec!(1),
            dec!(1),
            dec!(0.005),
        );
        assert_eq!(result, Err(QuoteError::SameCurrency));
    }

    #[test]
    fn test_quote_rejects_non_positive_amount() {
        for amount in [dec!(0), dec!(-5)] {
            let result = ExchangeQuote::compute(
                Currency::Usdt,
                Currency::Btc,
                amount,
                dec!(0.00002),
                dec!(0.005),
            );
            assert_eq!(result, Err(QuoteError::NonPositiveAmount));
        }
    }

    #[test]
    fn test_quote_rejects_non_positive_rate() {
        let result = ExchangeQuote::compute(
            Currency::Usdt,
            Currency::Btc,
            dec!(10),
            dec!(0),
            dec!(0.005),
        );
        assert_eq!(result, Err(QuoteError::NonPositiveRate));
    }

    #[test]
    fn test_converted_respects_destination_precision() {
        // USD keeps 2 decimals
        let quote = ExchangeQuote::compute(
            Currency::Btc,
            Currency::Usd,
            dec!(0.015),
            dec!(65432.10987),
            dec!(0.005),
        )
        .unwrap();
        assert_eq!(quote.converted, dec!(981.48));
    }

    proptest! {
        /// The debit always covers at least the amount sold, and the fee is
        /// never negative for a non-negative fee rate.
        #[test]
        fn prop_debit_covers_amount(
            amount_minor in 1i64..1_000_000_000i64,
            fee_rate_bps in 0i64..1_000i64,
        ) {
            let amount = Decimal::new(amount_minor, 6);
            let fee_rate = Decimal::new(fee_rate_bps, 4);

            let quote = ExchangeQuote::compute(
                Currency::Usdt,
                Currency::Btc,
                amount,
                dec!(0.00002),
                fee_rate,
            )
            .unwrap();

            prop_assert!(quote.fee >= Decimal::ZERO);
            prop_assert!(quote.debit_total >= amount);
            prop_assert_eq!(quote.debit_total, amount + quote.fee);
        }

        /// Converted amounts never exceed the destination currency's scale.
        #[test]
        fn prop_converted_scale_bounded(
            amount_minor in 1i64..1_000_000_000i64,
            rate_minor in 1i64..10_000_000i64,
        ) {
            let amount = Decimal::new(amount_minor, 6);
            let rate = Decimal::new(rate_minor, 8);

            let quote = ExchangeQuote::compute(
                Currency::Usdt,
                Currency::Btc,
                amount,
                rate,
                dec!(0.005),
            )
            .unwrap();

            prop_assert!(quote.converted.scale() <= Currency::Btc.decimals());
        }
    }
}
