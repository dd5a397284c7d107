//! AMM liquidity provision and the local position book.
//!
//! The book only changes after a confirmed receipt. Added liquidity is
//! booked at the `floor(sqrt(x * y))` estimate until [`LiquidityManager::reconcile`]
//! replaces it with venue figures.

use crate::error::{ExecutionError, Result};
use crate::routing::min_amount_out;
use chrono::Utc;
use hybrid_dex_domain::entities::{LiquidityPosition, PoolKey, Token};
use hybrid_dex_domain::enums::FeeTier;
use hybrid_dex_domain::math::{constant_product, units};
use hybrid_dex_domain::value_objects::{Percentage, TokenAmount};
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::client::{TransactionSigner, TxReceipt, submit};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Result of a confirmed liquidity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityChange {
    pub receipt: TxReceipt,
    pub pool: PoolKey,
    /// LP units added or removed.
    pub liquidity: u128,
}

pub struct LiquidityManager {
    addresses: ContractAddresses,
    positions: RwLock<Arc<Vec<LiquidityPosition>>>,
}

impl LiquidityManager {
    pub fn new(addresses: ContractAddresses) -> Self {
        Self {
            addresses,
            positions: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub async fn positions(&self) -> Arc<Vec<LiquidityPosition>> {
        Arc::clone(&*self.positions.read().await)
    }

    pub async fn position(&self, pool: &PoolKey) -> Option<LiquidityPosition> {
        self.positions.read().await.iter().find(|p| &p.pool == pool).cloned()
    }

    /// Replaces the book with positions read from the venue. Empty
    /// positions are dropped.
    pub async fn reconcile(&self, positions: Vec<LiquidityPosition>) {
        let kept: Vec<LiquidityPosition> = positions.into_iter().filter(|p| !p.is_empty()).collect();
        info!(count = kept.len(), "Positions reconciled");
        *self.positions.write().await = Arc::new(kept);
    }

    async fn book(&self, pool: &PoolKey, f: impl FnOnce(u128) -> u128) {
        let mut guard = self.positions.write().await;
        let mut next: Vec<LiquidityPosition> = guard.as_ref().clone();
        match next.iter_mut().find(|p| &p.pool == pool) {
            Some(position) => {
                position.liquidity = f(position.liquidity);
                position.updated_at = Utc::now();
            }
            None => next.push(LiquidityPosition::new(pool.clone(), f(0))),
        }
        next.retain(|p| !p.is_empty());
        *guard = Arc::new(next);
    }

    /// Deposits both tokens into the pool for the pair, in either order.
    ///
    /// The minimum LP amount is the estimate less `slippage`.
    ///
    /// # Errors
    /// Identical tokens, amounts too small to mint any LP units, or
    /// submission failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_liquidity(
        &self,
        signer: &dyn TransactionSigner,
        token_a: &Token,
        token_b: &Token,
        fee_tier: FeeTier,
        amount_a: Decimal,
        amount_b: Decimal,
        slippage: Percentage,
    ) -> Result<LiquidityChange> {
        let pool = PoolKey::new(&token_a.address, &token_b.address, fee_tier)?;
        let raw_a = units::to_raw_units(amount_a, token_a.decimals)?;
        let raw_b = units::to_raw_units(amount_b, token_b.decimals)?;
        let (amount_x, amount_y) = if pool.token_x == token_a.address {
            (raw_a, raw_b)
        } else {
            (raw_b, raw_a)
        };

        let expected = constant_product::expected_lp_tokens(amount_x, amount_y)?;
        if expected.is_zero() {
            return Err(ExecutionError::InvalidInput(
                "deposit too small to mint liquidity".into(),
            ));
        }
        let min_liquidity = min_amount_out(expected, slippage)?;
        let request = self
            .addresses
            .amm()
            .add_liquidity(&pool, amount_x, amount_y, min_liquidity);
        let receipt = submit(signer, &request).await.inspect_err(|e| {
            warn!(pool = %pool, error = %e, "Add liquidity failed");
        })?;

        let liquidity = expected.to_u128()?;
        self.book(&pool, |held| held.saturating_add(liquidity)).await;
        info!(pool = %pool, liquidity, hash = %receipt.hash, "Liquidity added");
        Ok(LiquidityChange {
            receipt,
            pool,
            liquidity,
        })
    }

    /// Withdraws `percent` of the held position, floored to whole LP units.
    ///
    /// # Errors
    /// `percent` outside `1..=100`, no position, a zero withdrawal, or
    /// submission failure.
    pub async fn remove_liquidity(
        &self,
        signer: &dyn TransactionSigner,
        pool: &PoolKey,
        percent: u8,
        min_amount_x: TokenAmount,
        min_amount_y: TokenAmount,
    ) -> Result<LiquidityChange> {
        if percent == 0 || percent > 100 {
            return Err(ExecutionError::InvalidInput(format!("percent must be 1..=100, got {percent}")));
        }
        let position = self
            .position(pool)
            .await
            .ok_or_else(|| ExecutionError::PositionNotFound(pool.to_string()))?;
        let liquidity = position.liquidity_for_percent(percent);
        if liquidity == 0 {
            return Err(ExecutionError::InvalidInput("nothing to withdraw".into()));
        }

        let request = self
            .addresses
            .amm()
            .remove_liquidity(pool, liquidity, min_amount_x, min_amount_y);
        let receipt = submit(signer, &request).await.inspect_err(|e| {
            warn!(pool = %pool, error = %e, "Remove liquidity failed");
        })?;

        self.book(pool, |held| held.saturating_sub(liquidity)).await;
        info!(pool = %pool, liquidity, percent, hash = %receipt.hash, "Liquidity removed");
        Ok(LiquidityChange {
            receipt,
            pool: pool.clone(),
            liquidity,
        })
    }
}
