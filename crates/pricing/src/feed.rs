//! Snapshot sources for opportunity discovery.
//!
//! [`SyntheticFeed`] perturbs reference prices with a log-normal shock per
//! tick. It stands in until a real price oracle is wired up.

use async_trait::async_trait;
use hybrid_dex_domain::entities::{BookLevel, OrderBookSnapshot, PoolSnapshot, Token};
use hybrid_dex_domain::enums::FeeTier;
use hybrid_dex_domain::error::DomainError;
use hybrid_dex_domain::math::units;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Pool/book pairs for one refresh cycle.
pub type MarketPairs = Vec<(PoolSnapshot, OrderBookSnapshot)>;

/// Anything that can produce paired venue snapshots.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<MarketPairs, FeedError>;
}

/// Static description of one synthetic market.
#[derive(Debug, Clone)]
pub struct SyntheticMarket {
    pub base: Token,
    pub quote: Token,
    pub fee_tier: FeeTier,
    /// Centre price, quote per base.
    pub reference_price: Decimal,
    /// Pool base reserve in human units.
    pub pool_base_reserve: Decimal,
    /// CLOB spread in basis points.
    pub spread_bps: u32,
    pub depth_levels: usize,
    /// Base size per level.
    pub level_size: Decimal,
}

pub struct SyntheticFeed {
    markets: Vec<SyntheticMarket>,
    /// Per-tick log-price standard deviation.
    volatility: f64,
}

impl SyntheticFeed {
    pub fn new(markets: Vec<SyntheticMarket>, volatility: f64) -> Self {
        Self {
            markets,
            volatility,
        }
    }

    pub fn markets(&self) -> &[SyntheticMarket] {
        &self.markets
    }

    fn shocked(price: Decimal, z: f64) -> Result<Decimal, FeedError> {
        let base = price
            .to_f64()
            .ok_or_else(|| FeedError::Unavailable("reference price out of range".into()))?;
        Decimal::from_f64(base * z.exp())
            .map(|p| p.round_dp(6))
            .ok_or_else(|| FeedError::Unavailable("shocked price out of range".into()))
    }

    fn build_pair(
        market: &SyntheticMarket,
        amm_price: Decimal,
        clob_mid: Decimal,
    ) -> Result<(PoolSnapshot, OrderBookSnapshot), FeedError> {
        let reserve_base = units::to_raw_units(market.pool_base_reserve, market.base.decimals)?;
        let reserve_quote =
            units::to_raw_units(market.pool_base_reserve * amm_price, market.quote.decimals)?;
        let pool = PoolSnapshot::new(
            market.base.clone(),
            market.quote.clone(),
            market.fee_tier,
            reserve_base,
            reserve_quote,
        )?;

        // levels sit on the 10^-6 price grid, at least one tick apart
        let tick = Decimal::new(1, 6);
        let step = (clob_mid * Decimal::from(market.spread_bps.max(1)) / Decimal::from(10_000))
            .round_dp(6)
            .max(tick);
        let half = step / Decimal::TWO;
        let best_bid = (clob_mid - half).round_dp_with_strategy(6, RoundingStrategy::ToNegativeInfinity);
        let best_ask = (clob_mid + half)
            .round_dp_with_strategy(6, RoundingStrategy::ToPositiveInfinity)
            .max(best_bid + tick);
        let levels = market.depth_levels.max(1);
        let mut bids = Vec::with_capacity(levels);
        let mut asks = Vec::with_capacity(levels);
        for i in 0..levels {
            let offset = step * Decimal::from(i);
            let bid = best_bid - offset;
            if bid > Decimal::ZERO {
                bids.push(BookLevel::new(bid, market.level_size));
            }
            asks.push(BookLevel::new(best_ask + offset, market.level_size));
        }
        let book = OrderBookSnapshot::new(market.base.clone(), market.quote.clone(), bids, asks)?;
        Ok((pool, book))
    }

    /// Produces one round of snapshots.
    pub fn generate(&self) -> Result<MarketPairs, FeedError> {
        let normal = Normal::new(0.0, self.volatility)
            .map_err(|e| FeedError::Unavailable(format!("invalid volatility: {e}")))?;
        let mut rng = rand::rng();

        self.markets
            .iter()
            .map(|market| {
                let amm_price = Self::shocked(market.reference_price, normal.sample(&mut rng))?;
                let clob_mid = Self::shocked(market.reference_price, normal.sample(&mut rng))?;
                debug!(
                    base = %market.base.symbol,
                    quote = %market.quote.symbol,
                    amm = %amm_price,
                    clob = %clob_mid,
                    "Synthetic tick"
                );
                Self::build_pair(market, amm_price, clob_mid)
            })
            .collect()
    }
}

#[async_trait]
impl SnapshotSource for SyntheticFeed {
    async fn fetch(&self) -> Result<MarketPairs, FeedError> {
        self.generate()
    }
}

/// A fixed set of snapshots, returned on every fetch.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pairs: MarketPairs,
}

impl StaticSource {
    pub fn new(pairs: MarketPairs) -> Self {
        Self { pairs }
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn fetch(&self) -> Result<MarketPairs, FeedError> {
        Ok(self.pairs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::{book_mid_price, pool_mid_price};
    use rust_decimal_macros::dec;

    fn market() -> SyntheticMarket {
        SyntheticMarket {
            base: Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8),
            quote: Token::new("0xbae2::usdc::USDC", "USDC", "USD Coin", 6),
            fee_tier: FeeTier::Low,
            reference_price: dec!(12.45),
            pool_base_reserve: dec!(1000),
            spread_bps: 10,
            depth_levels: 5,
            level_size: dec!(2),
        }
    }

    #[test]
    fn test_zero_volatility_is_flat() {
        let feed = SyntheticFeed::new(vec![market()], 0.0);
        let pairs = feed.generate().unwrap();
        assert_eq!(pairs.len(), 1);
        let (pool, book) = &pairs[0];
        assert_eq!(pool_mid_price(pool).unwrap().value(), dec!(12.45));
        assert_eq!(book.bids().len(), 5);
        assert_eq!(book_mid_price(book).unwrap().value().round_dp(4), dec!(12.45));
    }

    #[tokio::test]
    async fn test_books_are_never_crossed() {
        let feed = SyntheticFeed::new(vec![market(), market()], 0.05);
        for _ in 0..20 {
            let pairs = feed.fetch().await.unwrap();
            for (_, book) in &pairs {
                let bid = book.best_bid().unwrap().price;
                let ask = book.best_ask().unwrap().price;
                assert!(bid < ask);
            }
        }
    }

    #[test]
    fn test_sub_tick_spread_keeps_book_uncrossed() {
        let cheap = SyntheticMarket {
            reference_price: dec!(0.0005),
            ..market()
        };
        let pairs = SyntheticFeed::new(vec![cheap], 0.0).generate().unwrap();
        let book = &pairs[0].1;
        assert_eq!(book.best_bid().unwrap().price.value(), dec!(0.000499));
        assert_eq!(book.best_ask().unwrap().price.value(), dec!(0.000501));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::default();
        assert!(source.fetch().await.unwrap().is_empty());
    }
}
