//! Route selection and swap payload construction.
//!
//! Pool calls always carry their type arguments in canonical order, so the
//! swap direction is derived from the input token: `x_to_y` is true exactly
//! when the input token is the canonical x of the pool.

use hybrid_dex_domain::entities::{PoolKey, Token};
use hybrid_dex_domain::enums::{FeeTier, OrderSide};
use hybrid_dex_domain::error::DomainError;
use hybrid_dex_domain::math::units;
use hybrid_dex_domain::value_objects::{Percentage, TokenAmount};
use hybrid_dex_pricing::arbitrage::{ArbitrageDirection, ArbitrageOpportunity};
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::payload::TransactionRequest;
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No positive output quote; a minimum output cannot be derived.
    #[error("no output quote available")]
    MissingQuote,

    #[error("input amount is zero")]
    ZeroAmount,

    /// Slippage leaves no minimum output; the trade would be unguarded.
    #[error("minimum output rounds to zero")]
    ZeroMinOut,

    #[error("input and output token are the same: {0}")]
    IdenticalTokens(String),

    /// Split share outside `0..=1`.
    #[error("invalid AMM share: {0}")]
    InvalidShare(Decimal),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// How a swap is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteMode {
    /// Straight to the AMM module.
    AmmDirect,
    /// Through the router, one pool.
    RouterSingleHop,
    /// Through the router via an intermediate token.
    RouterMultiHop {
        intermediate: Token,
        second_fee_tier: FeeTier,
    },
    /// Part through the AMM, the rest against the CLOB.
    SplitExecution {
        /// Fraction of the input sent to the AMM, `0..=1`.
        amm_share: Decimal,
        /// CLOB limit price, quote per base.
        clob_price: Decimal,
    },
}

/// A user swap intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub token_in: Token,
    pub token_out: Token,
    /// Input amount in human units of `token_in`.
    pub amount_in: Decimal,
    /// Fee tier of the (first) pool.
    pub fee_tier: FeeTier,
    pub slippage: Percentage,
    /// Expected output in raw units of `token_out`, from a quote view.
    pub quote: Option<TokenAmount>,
    pub mode: RouteMode,
}

/// A fully resolved route, ready to become a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteDescriptor {
    AmmDirect {
        pool: PoolKey,
        amount_in: TokenAmount,
        min_amount_out: TokenAmount,
        x_to_y: bool,
    },
    RouterSingleHop {
        pool: PoolKey,
        amount_in: TokenAmount,
        min_amount_out: TokenAmount,
        x_to_y: bool,
    },
    RouterMultiHop {
        /// Input, intermediate and output token, in that order.
        path: [String; 3],
        fee_tiers: [FeeTier; 2],
        amount_in: TokenAmount,
        min_amount_out: TokenAmount,
    },
    SplitExecution {
        token_in: String,
        token_out: String,
        total_amount: TokenAmount,
        amm_amount: TokenAmount,
        clob_amount: TokenAmount,
        fee_tier: FeeTier,
        clob_price_scaled: u64,
        min_amount_out: TokenAmount,
    },
}

/// `floor(quote * (1 - slippage / 100))`, exact in integer arithmetic.
///
/// # Errors
/// [`RoutingError::MissingQuote`] for a zero quote, [`RoutingError::ZeroMinOut`]
/// when the result floors to zero.
pub fn min_amount_out(quote: TokenAmount, slippage: Percentage) -> Result<TokenAmount, RoutingError> {
    if quote.is_zero() {
        return Err(RoutingError::MissingQuote);
    }
    let keep = Decimal::ONE_HUNDRED - slippage.0;
    let numerator = keep.mantissa().to_u128().ok_or(DomainError::Overflow)?;
    let denominator = U256::from(100u8)
        .checked_mul(U256::exp10(keep.scale() as usize))
        .ok_or(DomainError::Overflow)?;
    let scaled = quote
        .as_u256()
        .checked_mul(U256::from(numerator))
        .ok_or(DomainError::Overflow)?;
    let min_out = scaled / denominator;
    if min_out.is_zero() {
        return Err(RoutingError::ZeroMinOut);
    }
    Ok(TokenAmount(min_out))
}

/// Splits `total` into an AMM leg of `floor(total * share)` and the rest.
///
/// # Errors
/// [`RoutingError::InvalidShare`] outside `0..=1`.
pub fn split_amount(total: TokenAmount, share: Decimal) -> Result<(TokenAmount, TokenAmount), RoutingError> {
    if share.is_sign_negative() || share > Decimal::ONE {
        return Err(RoutingError::InvalidShare(share));
    }
    let numerator = share.mantissa().to_u128().ok_or(DomainError::Overflow)?;
    let denominator = U256::exp10(share.scale() as usize);
    let amm = total
        .as_u256()
        .checked_mul(U256::from(numerator))
        .ok_or(DomainError::Overflow)?
        / denominator;
    let amm = TokenAmount(amm);
    Ok((amm, total.saturating_sub(amm)))
}

/// Validates `request` and resolves it into a descriptor.
///
/// # Errors
/// Identical tokens, a zero input or a missing quote are refused before any
/// payload is built.
pub fn choose_route(request: &RouteRequest) -> Result<RouteDescriptor, RoutingError> {
    let token_in = &request.token_in;
    let token_out = &request.token_out;
    if token_in.address == token_out.address {
        return Err(RoutingError::IdenticalTokens(token_in.address.clone()));
    }

    let amount_in = units::to_raw_units(request.amount_in, token_in.decimals)?;
    if amount_in.is_zero() {
        return Err(RoutingError::ZeroAmount);
    }
    let quote = request.quote.ok_or(RoutingError::MissingQuote)?;
    let min_out = min_amount_out(quote, request.slippage)?;

    let route = match &request.mode {
        RouteMode::AmmDirect | RouteMode::RouterSingleHop => {
            let pool = PoolKey::new(&token_in.address, &token_out.address, request.fee_tier)?;
            let x_to_y = pool.x_to_y(&token_in.address).unwrap_or(true);
            if matches!(request.mode, RouteMode::AmmDirect) {
                RouteDescriptor::AmmDirect {
                    pool,
                    amount_in,
                    min_amount_out: min_out,
                    x_to_y,
                }
            } else {
                RouteDescriptor::RouterSingleHop {
                    pool,
                    amount_in,
                    min_amount_out: min_out,
                    x_to_y,
                }
            }
        }
        RouteMode::RouterMultiHop {
            intermediate,
            second_fee_tier,
        } => {
            // Both legs must be real pools.
            PoolKey::new(&token_in.address, &intermediate.address, request.fee_tier)?;
            PoolKey::new(&intermediate.address, &token_out.address, *second_fee_tier)?;
            RouteDescriptor::RouterMultiHop {
                path: [
                    token_in.address.clone(),
                    intermediate.address.clone(),
                    token_out.address.clone(),
                ],
                fee_tiers: [request.fee_tier, *second_fee_tier],
                amount_in,
                min_amount_out: min_out,
            }
        }
        RouteMode::SplitExecution {
            amm_share,
            clob_price,
        } => {
            let (amm_amount, clob_amount) = split_amount(amount_in, *amm_share)?;
            RouteDescriptor::SplitExecution {
                token_in: token_in.address.clone(),
                token_out: token_out.address.clone(),
                total_amount: amount_in,
                amm_amount,
                clob_amount,
                fee_tier: request.fee_tier,
                clob_price_scaled: units::scale_price(*clob_price)?,
                min_amount_out: min_out,
            }
        }
    };
    debug!(
        token_in = %token_in.symbol,
        token_out = %token_out.symbol,
        amount_in = %amount_in,
        min_out = %min_out,
        "Route resolved"
    );
    Ok(route)
}

impl RouteDescriptor {
    #[must_use]
    pub fn to_transaction(&self, addresses: &ContractAddresses) -> TransactionRequest {
        match self {
            RouteDescriptor::AmmDirect {
                pool,
                amount_in,
                min_amount_out,
                x_to_y,
            } => addresses
                .amm()
                .swap_exact_in(pool, *amount_in, *min_amount_out, *x_to_y),
            RouteDescriptor::RouterSingleHop {
                pool,
                amount_in,
                min_amount_out,
                x_to_y,
            } => addresses
                .router()
                .swap_exact_input_single(pool, *amount_in, *min_amount_out, *x_to_y),
            RouteDescriptor::RouterMultiHop {
                path,
                fee_tiers,
                amount_in,
                min_amount_out,
            } => addresses.router().swap_exact_input_multihop(
                [path[0].as_str(), path[1].as_str(), path[2].as_str()],
                *fee_tiers,
                *amount_in,
                *min_amount_out,
            ),
            RouteDescriptor::SplitExecution {
                token_in,
                token_out,
                total_amount,
                amm_amount,
                fee_tier,
                clob_price_scaled,
                min_amount_out,
                ..
            } => addresses.router().split_order_execution(
                token_in,
                token_out,
                *total_amount,
                *amm_amount,
                *fee_tier,
                *clob_price_scaled,
                *min_amount_out,
            ),
        }
    }

    pub fn min_amount_out(&self) -> TokenAmount {
        match self {
            RouteDescriptor::AmmDirect { min_amount_out, .. }
            | RouteDescriptor::RouterSingleHop { min_amount_out, .. }
            | RouteDescriptor::RouterMultiHop { min_amount_out, .. }
            | RouteDescriptor::SplitExecution { min_amount_out, .. } => *min_amount_out,
        }
    }
}

/// CLOB leg of an arbitrage: sell into bids after buying on the AMM, buy
/// from asks otherwise.
pub fn clob_side(direction: ArbitrageDirection) -> OrderSide {
    match direction {
        ArbitrageDirection::BuyAmmSellClob => OrderSide::Sell,
        ArbitrageDirection::BuyClobSellAmm => OrderSide::Buy,
    }
}

/// Router call executing `opportunity` against the pool in `fee_tier`.
///
/// Type arguments are the market's base and quote.
///
/// # Errors
/// [`RoutingError::ZeroAmount`] when nothing is recommended, or a scaling
/// error for the CLOB price.
pub fn arbitrage_transaction(
    opportunity: &ArbitrageOpportunity,
    fee_tier: FeeTier,
    addresses: &ContractAddresses,
) -> Result<TransactionRequest, RoutingError> {
    if opportunity.recommended_amount_raw.is_zero() {
        return Err(RoutingError::ZeroAmount);
    }
    let price_scaled = units::scale_price(opportunity.clob_price.value())?;
    Ok(addresses.router().arbitrage_amm_clob(
        &opportunity.base.address,
        &opportunity.quote.address,
        fee_tier,
        clob_side(opportunity.direction),
        price_scaled,
        opportunity.recommended_amount_raw,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_dex_domain::value_objects::Price;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn token(address: &str, symbol: &str, decimals: u8) -> Token {
        Token::new(address, symbol, symbol, decimals)
    }

    fn request(token_in: Token, token_out: Token, mode: RouteMode) -> RouteRequest {
        RouteRequest {
            token_in,
            token_out,
            amount_in: dec!(1.5),
            fee_tier: FeeTier::Low,
            slippage: Percentage::new(dec!(0.5)).unwrap(),
            quote: Some(TokenAmount::from(1_000_000u64)),
            mode,
        }
    }

    #[test]
    fn test_min_amount_out_floors() {
        let slip = Percentage::new(dec!(0.5)).unwrap();
        assert_eq!(
            min_amount_out(TokenAmount::from(1_000_000u64), slip).unwrap(),
            TokenAmount::from(995_000u64)
        );
        // 333 * 0.995 = 331.335
        assert_eq!(
            min_amount_out(TokenAmount::from(333u64), slip).unwrap(),
            TokenAmount::from(331u64)
        );
        assert_eq!(
            min_amount_out(TokenAmount::zero(), slip),
            Err(RoutingError::MissingQuote)
        );
    }

    #[test]
    fn test_direction_follows_canonical_order() {
        let aaa = token("0xAAA", "AAA", 8);
        let bbb = token("0xBBB", "BBB", 8);

        let forward = choose_route(&request(aaa.clone(), bbb.clone(), RouteMode::AmmDirect)).unwrap();
        let backward = choose_route(&request(bbb, aaa, RouteMode::AmmDirect)).unwrap();
        match (forward, backward) {
            (
                RouteDescriptor::AmmDirect {
                    pool: p1, x_to_y: d1, ..
                },
                RouteDescriptor::AmmDirect {
                    pool: p2, x_to_y: d2, ..
                },
            ) => {
                assert_eq!(p1, p2);
                assert!(d1);
                assert!(!d2);
            }
            other => panic!("unexpected routes: {other:?}"),
        }
    }

    #[test]
    fn test_amm_direct_payload() {
        let addrs = ContractAddresses::default();
        let route = choose_route(&request(
            token("0xBBB", "BBB", 8),
            token("0xAAA", "AAA", 8),
            RouteMode::AmmDirect,
        ))
        .unwrap();
        let tx = route.to_transaction(&addrs);
        assert_eq!(tx.function_name(), "swap_exact_in");
        assert_eq!(tx.type_arguments, vec!["0xAAA", "0xBBB"]);
        assert_eq!(
            tx.function_arguments,
            vec![json!(5), json!("150000000"), json!("995000"), json!(false)]
        );
    }

    #[test]
    fn test_rejections() {
        let aaa = token("0xAAA", "AAA", 8);
        assert!(matches!(
            choose_route(&request(aaa.clone(), aaa.clone(), RouteMode::AmmDirect)),
            Err(RoutingError::IdenticalTokens(_))
        ));

        let mut zero = request(aaa.clone(), token("0xBBB", "BBB", 8), RouteMode::AmmDirect);
        zero.amount_in = Decimal::ZERO;
        assert_eq!(choose_route(&zero), Err(RoutingError::ZeroAmount));

        let mut unquoted = request(aaa, token("0xBBB", "BBB", 8), RouteMode::RouterSingleHop);
        unquoted.quote = None;
        assert_eq!(choose_route(&unquoted), Err(RoutingError::MissingQuote));
    }

    #[test]
    fn test_zero_minimum_output_is_refused() {
        let half = Percentage::new(dec!(0.5)).unwrap();
        let all = Percentage::new(dec!(100)).unwrap();
        assert_eq!(
            min_amount_out(TokenAmount::from(1u64), half),
            Err(RoutingError::ZeroMinOut)
        );
        assert_eq!(
            min_amount_out(TokenAmount::from(1_000_000u64), all),
            Err(RoutingError::ZeroMinOut)
        );

        let mut dust = request(token("0xAAA", "AAA", 8), token("0xBBB", "BBB", 8), RouteMode::AmmDirect);
        dust.quote = Some(TokenAmount::from(1u64));
        assert_eq!(choose_route(&dust), Err(RoutingError::ZeroMinOut));

        let mut reckless = request(token("0xAAA", "AAA", 8), token("0xBBB", "BBB", 8), RouteMode::RouterSingleHop);
        reckless.slippage = all;
        assert_eq!(choose_route(&reckless), Err(RoutingError::ZeroMinOut));
    }

    #[test]
    fn test_multihop_path_order() {
        let mode = RouteMode::RouterMultiHop {
            intermediate: token("0xAAA", "AAA", 8),
            second_fee_tier: FeeTier::High,
        };
        let route = choose_route(&request(
            token("0xCCC", "CCC", 8),
            token("0xBBB", "BBB", 8),
            mode,
        ))
        .unwrap();
        let tx = route.to_transaction(&ContractAddresses::default());
        assert_eq!(tx.function_name(), "swap_exact_input_multihop");
        assert_eq!(tx.type_arguments, vec!["0xCCC", "0xAAA", "0xBBB"]);
    }

    #[test]
    fn test_split_amounts() {
        let mode = RouteMode::SplitExecution {
            amm_share: dec!(0.333),
            clob_price: dec!(12.45),
        };
        let route = choose_route(&request(
            token("0xAAA", "AAA", 8),
            token("0xBBB", "BBB", 6),
            mode,
        ))
        .unwrap();
        match route {
            RouteDescriptor::SplitExecution {
                total_amount,
                amm_amount,
                clob_amount,
                clob_price_scaled,
                ..
            } => {
                assert_eq!(total_amount, TokenAmount::from(150_000_000u64));
                assert_eq!(amm_amount, TokenAmount::from(49_950_000u64));
                assert_eq!(clob_amount, TokenAmount::from(100_050_000u64));
                assert_eq!(clob_price_scaled, 12_450_000);
            }
            other => panic!("unexpected route: {other:?}"),
        }
        assert_eq!(
            split_amount(TokenAmount::from(10u64), dec!(1.5)),
            Err(RoutingError::InvalidShare(dec!(1.5)))
        );
    }

    #[test]
    fn test_arbitrage_transaction() {
        let apt = token("0x1::aptos_coin::AptosCoin", "APT", 8);
        let usdc = token("0xbae2::usdc::USDC", "USDC", 6);
        let opp = ArbitrageOpportunity {
            base: apt,
            quote: usdc,
            fee_tier: FeeTier::Low,
            amm_price: Price::new(dec!(12.45)),
            clob_price: Price::new(dec!(12.475)),
            margin_percent: dec!(0.2008),
            direction: ArbitrageDirection::BuyAmmSellClob,
            profit_potential: dec!(0.2),
            recommended_amount: dec!(5),
            recommended_amount_raw: TokenAmount::from(500_000_000u64),
        };
        let tx = arbitrage_transaction(&opp, FeeTier::Low, &ContractAddresses::default()).unwrap();
        assert_eq!(tx.function_name(), "arbitrage_amm_clob");
        assert_eq!(
            tx.function_arguments,
            vec![json!(5), json!(1), json!("12475000"), json!("500000000")]
        );
        assert_eq!(clob_side(ArbitrageDirection::BuyClobSellAmm), OrderSide::Buy);
    }
}
