use crate::entities::pool::PoolKey;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// LP holding of the connected account in one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    /// Pool the liquidity sits in.
    pub pool: PoolKey,
    /// LP units held.
    pub liquidity: u128,
    /// Rewards accrued, in quote terms as reported by the venue.
    pub rewards: Decimal,
    /// Last confirmed change.
    pub updated_at: DateTime<Utc>,
}

impl LiquidityPosition {
    pub fn new(pool: PoolKey, liquidity: u128) -> Self {
        Self {
            pool,
            liquidity,
            rewards: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0
    }

    /// LP units corresponding to `percent` of this position, floored.
    #[must_use]
    pub fn liquidity_for_percent(&self, percent: u8) -> u128 {
        let percent = u128::from(percent.min(100));
        self.liquidity / 100 * percent + self.liquidity % 100 * percent / 100
    }
}
