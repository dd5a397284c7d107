use crate::constants::BPS_DENOMINATOR;
use crate::error::{DomainError, Result};
use crate::value_objects::TokenAmount;
use primitive_types::U256;
use rust_decimal::Decimal;

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * dx / (x + dx)
/// taking fee into account: dy = y * (dx * (1 - fee)) / (x + (dx * (1 - fee)))
///
/// Only used for local estimates; the AMM quote view is authoritative.
pub fn calculate_out_amount(
    amount_in: TokenAmount,
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
    fee_bps: u32,
) -> Result<TokenAmount> {
    let amount_in = amount_in.0;
    let reserve_in = reserve_in.0;
    let reserve_out = reserve_out.0;

    if amount_in.is_zero() {
        return Ok(TokenAmount::zero());
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DomainError::InvalidAmount(
            "reserves must be non-zero".to_string(),
        ));
    }
    if fee_bps >= BPS_DENOMINATOR {
        return Err(DomainError::UnsupportedFeeTier(fee_bps));
    }

    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(BPS_DENOMINATOR - fee_bps))
        .ok_or(DomainError::Overflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(DomainError::Overflow)?;
    let denominator = reserve_in
        .checked_mul(U256::from(BPS_DENOMINATOR))
        .ok_or(DomainError::Overflow)?
        .checked_add(amount_in_with_fee)
        .ok_or(DomainError::Overflow)?;

    Ok(TokenAmount(numerator / denominator))
}

/// Price impact of a trade in percent: how far the execution price falls
/// short of the pre-trade spot price, fees excluded.
pub fn calculate_price_impact(
    amount_in: TokenAmount,
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
) -> Result<Decimal> {
    let out = calculate_out_amount(amount_in, reserve_in, reserve_out, 0)?;
    if out.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let to_dec = |v: U256| -> Result<Decimal> {
        let v = TokenAmount(v).to_u128()?;
        let v = i128::try_from(v).map_err(|_| DomainError::Overflow)?;
        Decimal::try_from_i128_with_scale(v, 0).map_err(|_| DomainError::Overflow)
    };
    let spot = to_dec(reserve_out.0)?
        .checked_div(to_dec(reserve_in.0)?)
        .filter(|s| !s.is_zero())
        .ok_or(DomainError::Overflow)?;
    let exec = to_dec(out.0)?
        .checked_div(to_dec(amount_in.0)?)
        .ok_or(DomainError::Overflow)?;
    (spot - exec)
        .checked_div(spot)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(DomainError::Overflow)
}

/// Expected LP units for a deposit: `floor(sqrt(amount_x * amount_y))`.
pub fn expected_lp_tokens(amount_x: TokenAmount, amount_y: TokenAmount) -> Result<TokenAmount> {
    let product = amount_x
        .0
        .checked_mul(amount_y.0)
        .ok_or(DomainError::Overflow)?;
    Ok(TokenAmount(product.integer_sqrt()))
}
