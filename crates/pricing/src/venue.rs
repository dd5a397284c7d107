//! Mid prices for both venues behind one tagged type.

use hybrid_dex_domain::entities::{OrderBookSnapshot, PoolSnapshot};
use hybrid_dex_domain::enums::Venue;
use hybrid_dex_domain::math::{constant_product, units};
use hybrid_dex_domain::value_objects::{Price, TokenAmount};
use rust_decimal::Decimal;
use tracing::debug;

/// Price of `token` in units of the other pool token, decimals adjusted.
///
/// `None` when `token` is not in the pool, a reserve is empty, or the
/// reserves cannot be represented as decimals.
pub fn pool_price_of(pool: &PoolSnapshot, token: &str) -> Option<Price> {
    let (reserve_in, reserve_out) = pool.reserves_for(token)?;
    let (dec_in, dec_out) = if token == pool.token_x.address {
        (pool.token_x.decimals, pool.token_y.decimals)
    } else {
        (pool.token_y.decimals, pool.token_x.decimals)
    };
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return None;
    }
    let human_in = units::to_human_units(reserve_in, dec_in).ok()?;
    let human_out = units::to_human_units(reserve_out, dec_out).ok()?;
    match human_out.checked_div(human_in) {
        Some(p) => Some(Price(p)),
        None => {
            debug!(pool = %pool.key(), "pool price overflow");
            None
        }
    }
}

/// Pool mid price: token_y per token_x.
pub fn pool_mid_price(pool: &PoolSnapshot) -> Option<Price> {
    pool_price_of(pool, &pool.token_x.address)
}

/// Order book mid price; requires both sides.
pub fn book_mid_price(book: &OrderBookSnapshot) -> Option<Price> {
    let bid = book.best_bid()?.price;
    let ask = book.best_ask()?.price;
    Some(Price::midpoint(bid, ask))
}

/// A price source on either venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenuePrice {
    Amm(PoolSnapshot),
    Clob(OrderBookSnapshot),
}

impl VenuePrice {
    /// Quote per base mid price. For a pool, base is the canonical x token.
    #[must_use]
    pub fn mid_price(&self) -> Option<Price> {
        match self {
            VenuePrice::Amm(pool) => pool_mid_price(pool),
            VenuePrice::Clob(book) => book_mid_price(book),
        }
    }

    #[must_use]
    pub fn venue(&self) -> Venue {
        match self {
            VenuePrice::Amm(_) => Venue::Amm,
            VenuePrice::Clob(_) => Venue::Clob,
        }
    }

}

/// Local constant-product estimate for a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapEstimate {
    /// Raw units of the other pool token, after the pool fee.
    pub amount_out: TokenAmount,
    /// Shortfall of the execution price against spot, in percent, fees excluded.
    pub price_impact: Decimal,
}

/// Estimates selling `amount_in` raw units of `token_in` into `pool`.
///
/// `None` when `token_in` is not in the pool, a reserve is empty, or the
/// arithmetic overflows.
pub fn estimate_swap(pool: &PoolSnapshot, token_in: &str, amount_in: TokenAmount) -> Option<SwapEstimate> {
    let (reserve_in, reserve_out) = pool.reserves_for(token_in)?;
    let estimate = constant_product::calculate_out_amount(amount_in, reserve_in, reserve_out, pool.fee_tier.bps())
        .and_then(|amount_out| {
            let price_impact = constant_product::calculate_price_impact(amount_in, reserve_in, reserve_out)?;
            Ok(SwapEstimate {
                amount_out,
                price_impact,
            })
        });
    match estimate {
        Ok(e) => Some(e),
        Err(e) => {
            debug!(pool = %pool.key(), error = %e, "No local swap estimate");
            None
        }
    }
}
