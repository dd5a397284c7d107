use chrono::{DateTime, Utc};
use hybrid_dex_domain::entities::Token;
use hybrid_dex_domain::enums::FeeTier;
use hybrid_dex_domain::value_objects::{Price, TokenAmount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which venue to buy on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArbitrageDirection {
    /// AMM is cheaper: buy there, sell into CLOB bids.
    BuyAmmSellClob,
    /// CLOB is cheaper: lift CLOB asks, sell into the AMM.
    BuyClobSellAmm,
}

impl fmt::Display for ArbitrageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArbitrageDirection::BuyAmmSellClob => write!(f, "buy AMM / sell CLOB"),
            ArbitrageDirection::BuyClobSellAmm => write!(f, "buy CLOB / sell AMM"),
        }
    }
}

/// A price gap between the AMM pool and the CLOB market for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Base token of the CLOB market.
    pub base: Token,
    /// Quote token of the CLOB market.
    pub quote: Token,
    /// Fee tier of the AMM pool compared.
    pub fee_tier: FeeTier,
    /// AMM price, quote per base.
    pub amm_price: Price,
    /// CLOB mid price, quote per base.
    pub clob_price: Price,
    /// `|clob - amm| / amm * 100`.
    pub margin_percent: Decimal,
    pub direction: ArbitrageDirection,
    /// Expected gain in quote units before gas and fees.
    pub profit_potential: Decimal,
    /// Suggested trade size in base units.
    pub recommended_amount: Decimal,
    /// `recommended_amount` in raw base units.
    pub recommended_amount_raw: TokenAmount,
}

impl ArbitrageOpportunity {
    /// `BASE/QUOTE` label.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base.symbol, self.quote.symbol)
    }
}

/// Summary figures over a set of opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageStats {
    pub count: usize,
    pub total_profit: Decimal,
    pub average_margin: Decimal,
    pub best_margin: Decimal,
}

/// Ranked opportunities from one detection pass.
///
/// Opportunities are sorted by profit potential, highest first. A set older
/// than its refresh window is stale and must not be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunitySet {
    opportunities: Vec<ArbitrageOpportunity>,
    pub computed_at: DateTime<Utc>,
    pub stale_after: Duration,
}

impl OpportunitySet {
    pub(crate) fn new(
        opportunities: Vec<ArbitrageOpportunity>,
        computed_at: DateTime<Utc>,
        stale_after: Duration,
    ) -> Self {
        Self {
            opportunities,
            computed_at,
            stale_after,
        }
    }

    #[must_use]
    pub fn empty(stale_after: Duration) -> Self {
        Self::new(Vec::new(), Utc::now(), stale_after)
    }

    pub fn opportunities(&self) -> &[ArbitrageOpportunity] {
        &self.opportunities
    }

    /// Highest-ranked opportunity.
    pub fn best(&self) -> Option<&ArbitrageOpportunity> {
        self.opportunities.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.opportunities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }

    /// Whether the set has outlived its refresh window at `now`.
    #[must_use]
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match (now - self.computed_at).to_std() {
            Ok(age) => age > self.stale_after,
            // computed in the future relative to `now`
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    #[must_use]
    pub fn stats(&self) -> ArbitrageStats {
        let count = self.opportunities.len();
        let total_profit = self.opportunities.iter().map(|o| o.profit_potential).sum();
        let margin_sum: Decimal = self.opportunities.iter().map(|o| o.margin_percent).sum();
        let average_margin = if count == 0 {
            Decimal::ZERO
        } else {
            margin_sum / Decimal::from(count)
        };
        let best_margin = self
            .opportunities
            .iter()
            .map(|o| o.margin_percent)
            .max()
            .unwrap_or(Decimal::ZERO);
        ArbitrageStats {
            count,
            total_profit,
            average_margin,
            best_margin,
        }
    }
}
