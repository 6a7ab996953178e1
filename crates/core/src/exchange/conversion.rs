//! Currency conversion helper.
//!
//! CRITICAL: rounding strategy for multi-currency:
//! - Always round to the target currency's decimal places
//! - Use banker's rounding (round half to even)

use rust_decimal::{Decimal, RoundingStrategy};

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    let converted = amount * rate;
    converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_amount() {
        // 50 USDT * 0.00002 = 0.001 BTC
        let result = convert_amount(dec!(50), dec!(0.00002), 8);
        assert_eq!(result, dec!(0.001));
    }

    #[test]
    fn test_convert_rounds_to_target_precision() {
        // 1 BTC * 65123.456789 USDT, kept at 6 decimals
        let result = convert_amount(dec!(1), dec!(65123.4567891234), 6);
        assert_eq!(result, dec!(65123.456789));
    }

    #[test]
    fn test_bankers_rounding() {
        // round half to even: 2.5 -> 2, 3.5 -> 4
        assert_eq!(convert_amount(dec!(1), dec!(2.5), 0), dec!(2));
        assert_eq!(convert_amount(dec!(1), dec!(3.5), 0), dec!(4));
    }
}
