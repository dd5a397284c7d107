//! Conversion between human decimal amounts and raw on-chain integers.
//!
//! Raw amounts are `human * 10^decimals`, truncated toward zero. Prices on the
//! order book use a fixed 10^6 multiplier regardless of token decimals.

use crate::constants::{MAX_TOKEN_DECIMALS, PRICE_MULTIPLIER};
use crate::error::{DomainError, Result};
use crate::value_objects::{Price, TokenAmount};
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

fn check_decimals(decimals: u8) -> Result<()> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(DomainError::InvalidDecimals(decimals));
    }
    Ok(())
}

fn pow10(decimals: u8) -> Decimal {
    Decimal::from(10u64.pow(u32::from(decimals)))
}

/// Converts a human amount to raw units, flooring any sub-unit remainder.
///
/// # Errors
/// * [`DomainError::InvalidDecimals`] when `decimals` exceeds 18.
/// * [`DomainError::InvalidAmount`] for negative input.
/// * [`DomainError::Overflow`] when the scaled value does not fit.
pub fn to_raw_units(human: Decimal, decimals: u8) -> Result<TokenAmount> {
    check_decimals(decimals)?;
    if human.is_sign_negative() && !human.is_zero() {
        return Err(DomainError::InvalidAmount(format!(
            "negative amount: {human}"
        )));
    }
    let scaled = human
        .checked_mul(pow10(decimals))
        .ok_or(DomainError::Overflow)?
        .trunc();
    let raw = scaled.to_u128().ok_or(DomainError::Overflow)?;
    Ok(TokenAmount(U256::from(raw)))
}

/// Parses user text and converts it to raw units.
///
/// # Errors
/// [`DomainError::InvalidAmount`] for non-numeric text, otherwise as [`to_raw_units`].
pub fn parse_raw_units(input: &str, decimals: u8) -> Result<TokenAmount> {
    let trimmed = input.trim();
    let human = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| DomainError::InvalidAmount(format!("not a number: {input:?}")))?;
    to_raw_units(human, decimals)
}

/// Converts raw units back to a human amount.
///
/// # Errors
/// * [`DomainError::InvalidDecimals`] when `decimals` exceeds 18.
/// * [`DomainError::Overflow`] when the raw value exceeds what `Decimal` can hold.
pub fn to_human_units(raw: TokenAmount, decimals: u8) -> Result<Decimal> {
    check_decimals(decimals)?;
    let raw = raw.to_u128()?;
    let raw = i128::try_from(raw).map_err(|_| DomainError::Overflow)?;
    let human = Decimal::try_from_i128_with_scale(raw, u32::from(decimals))
        .map_err(|_| DomainError::Overflow)?;
    Ok(human.normalize())
}

/// Renders raw units as a human decimal string.
///
/// # Errors
/// As [`to_human_units`].
pub fn format_human_units(raw: TokenAmount, decimals: u8) -> Result<String> {
    Ok(to_human_units(raw, decimals)?.to_string())
}

/// Scales a human price by 10^6 for the order book, flooring the remainder.
///
/// # Errors
/// [`DomainError::InvalidAmount`] for negative prices, [`DomainError::Overflow`]
/// when the result does not fit in `u64`.
pub fn scale_price(price: Decimal) -> Result<u64> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::InvalidAmount(format!(
            "negative price: {price}"
        )));
    }
    price
        .checked_mul(Decimal::from(PRICE_MULTIPLIER))
        .ok_or(DomainError::Overflow)?
        .floor()
        .to_u64()
        .ok_or(DomainError::Overflow)
}

/// Inverse of [`scale_price`].
pub fn unscale_price(raw: u64) -> Price {
    Price((Decimal::from(raw) / Decimal::from(PRICE_MULTIPLIER)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_raw_units() {
        let raw = to_raw_units(dec!(1.5), 8).unwrap();
        assert_eq!(raw, TokenAmount::from(150_000_000u64));

        let usdc = to_raw_units(dec!(12.345678), 6).unwrap();
        assert_eq!(usdc, TokenAmount::from(12_345_678u64));
    }

    #[test]
    fn test_to_raw_units_truncates() {
        // 1.2345678 at 6 decimals leaves 0.8 of a raw unit behind
        let raw = to_raw_units(dec!(1.2345678), 6).unwrap();
        assert_eq!(raw, TokenAmount::from(1_234_567u64));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            to_raw_units(dec!(-1), 8),
            Err(DomainError::InvalidAmount(_))
        ));
        assert_eq!(
            to_raw_units(dec!(1), 19),
            Err(DomainError::InvalidDecimals(19))
        );
        assert!(matches!(
            parse_raw_units("abc", 8),
            Err(DomainError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            to_raw_units(Decimal::MAX, 18),
            Err(DomainError::Overflow)
        );
        let huge = TokenAmount(U256::MAX);
        assert_eq!(to_human_units(huge, 8), Err(DomainError::Overflow));
    }

    #[test]
    fn test_parse_raw_units() {
        assert_eq!(
            parse_raw_units(" 0.25 ", 8).unwrap(),
            TokenAmount::from(25_000_000u64)
        );
        assert_eq!(parse_raw_units("0", 6).unwrap(), TokenAmount::zero());
    }

    #[test]
    fn test_to_human_units() {
        let human = to_human_units(TokenAmount::from(150_000_000u64), 8).unwrap();
        assert_eq!(human, dec!(1.5));
        assert_eq!(
            format_human_units(TokenAmount::from(1_000_000u64), 6).unwrap(),
            "1"
        );
    }

    #[test]
    fn test_scale_price() {
        assert_eq!(scale_price(dec!(12.45)).unwrap(), 12_450_000);
        assert_eq!(scale_price(dec!(1.0000009)).unwrap(), 1_000_000);
        assert_eq!(unscale_price(12_450_000).value(), dec!(12.45));
    }

    proptest! {
        #[test]
        fn prop_raw_round_trip(raw in any::<u64>(), decimals in 0u8..=18) {
            let amount = TokenAmount::from(raw);
            let human = to_human_units(amount, decimals).unwrap();
            prop_assert_eq!(to_raw_units(human, decimals).unwrap(), amount);
        }

        #[test]
        fn prop_human_round_trip_within_one_unit(
            mantissa in 0i64..1_000_000_000,
            scale in 0u32..=12,
            decimals in 0u8..=18,
        ) {
            let human = Decimal::new(mantissa, scale);
            let raw = to_raw_units(human, decimals).unwrap();
            let back = to_human_units(raw, decimals).unwrap();
            let unit = Decimal::new(1, u32::from(decimals));
            prop_assert!(back <= human);
            prop_assert!(human - back < unit);
        }
    }
}
