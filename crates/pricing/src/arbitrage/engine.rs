use super::opportunity::{ArbitrageDirection, ArbitrageOpportunity, OpportunitySet};
use chrono::Utc;
use hybrid_dex_domain::entities::{OrderBookSnapshot, PoolSnapshot};
use hybrid_dex_domain::math::units;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::venue::{book_mid_price, pool_price_of};

/// Configuration for opportunity detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageConfig {
    /// Maximum trade value in quote units.
    pub max_notional: Decimal,
    /// Gaps at or below this margin (percent) are ignored.
    pub min_margin_percent: Decimal,
    /// Age after which a computed set is stale.
    pub stale_after: Duration,
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        Self {
            max_notional: Decimal::from(1_000),
            min_margin_percent: Decimal::ZERO,
            stale_after: Duration::from_secs(10),
        }
    }
}

/// Compares AMM pools with CLOB markets and ranks the gaps.
///
/// Detection is a pure function of its inputs: the same snapshots always
/// yield the same ranked list.
#[derive(Debug, Clone, Default)]
pub struct ArbitrageEngine {
    config: ArbitrageConfig,
}

impl ArbitrageEngine {
    pub fn new(config: ArbitrageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArbitrageConfig {
        &self.config
    }

    /// Evaluates every pair and returns the ranked set.
    ///
    /// Pairs without a two-sided market, with an empty pool, whose tokens do
    /// not match, or with no gap are skipped.
    pub fn detect_opportunities(&self, pairs: &[(PoolSnapshot, OrderBookSnapshot)]) -> OpportunitySet {
        let mut found: Vec<ArbitrageOpportunity> = pairs
            .iter()
            .filter_map(|(pool, book)| self.evaluate(pool, book))
            .collect();

        // stable: equal profits keep input order
        found.sort_by(|a, b| b.profit_potential.cmp(&a.profit_potential));

        info!(
            pairs = pairs.len(),
            opportunities = found.len(),
            "Arbitrage scan complete"
        );
        OpportunitySet::new(found, Utc::now(), self.config.stale_after)
    }

    /// Evaluates one pool/book pair.
    pub fn evaluate(&self, pool: &PoolSnapshot, book: &OrderBookSnapshot) -> Option<ArbitrageOpportunity> {
        let market = book.market();
        let key = pool.key();
        if !key.contains(&book.base.address) || !key.contains(&book.quote.address) {
            warn!(pool = %key, market = %market, "Pool and market tokens differ, skipping");
            return None;
        }

        let Some(clob_price) = book_mid_price(book) else {
            debug!(market = %market, "No two-sided market, skipping");
            return None;
        };
        let amm_price = match pool_price_of(pool, &book.base.address) {
            Some(p) if !p.value().is_zero() => p,
            _ => {
                debug!(pool = %key, "Pool has no price, skipping");
                return None;
            }
        };

        let amm = amm_price.value();
        let clob = clob_price.value();
        let Some(margin_percent) = (clob - amm)
            .abs()
            .checked_div(amm)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        else {
            debug!(pool = %key, amm = %amm, clob = %clob, "Margin overflow, skipping");
            return None;
        };
        if margin_percent.is_zero() || margin_percent <= self.config.min_margin_percent {
            return None;
        }

        let (direction, level) = if amm < clob {
            (ArbitrageDirection::BuyAmmSellClob, book.best_bid())
        } else {
            (ArbitrageDirection::BuyClobSellAmm, book.best_ask())
        };
        let level_size = level.map(|l| l.size)?;
        let cap = if clob.is_zero() {
            Decimal::ZERO
        } else {
            self.config.max_notional.checked_div(clob)?
        };
        let recommended_amount = cap.min(level_size);
        let Some(profit_potential) = recommended_amount
            .checked_mul(amm)
            .and_then(|v| v.checked_mul(margin_percent))
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        else {
            debug!(market = %market, "Profit overflow, skipping");
            return None;
        };

        let recommended_amount_raw = match units::to_raw_units(recommended_amount, book.base.decimals) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(market = %market, error = %e, "Cannot scale recommended amount, skipping");
                return None;
            }
        };

        Some(ArbitrageOpportunity {
            base: book.base.clone(),
            quote: book.quote.clone(),
            fee_tier: pool.fee_tier,
            amm_price,
            clob_price,
            margin_percent,
            direction,
            profit_potential,
            recommended_amount,
            recommended_amount_raw,
        })
    }
}

/// Runs detection with the default configuration.
pub fn detect_opportunities(pairs: &[(PoolSnapshot, OrderBookSnapshot)]) -> OpportunitySet {
    ArbitrageEngine::default().detect_opportunities(pairs)
}
