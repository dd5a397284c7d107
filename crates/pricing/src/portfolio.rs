//! Wallet valuation.

use hybrid_dex_domain::entities::Token;
use hybrid_dex_domain::error::Result;
use hybrid_dex_domain::math::units;
use hybrid_dex_domain::value_objects::{Price, TokenAmount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A token balance with an optional unit price in the valuation currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub token: Token,
    pub balance: Decimal,
    pub price: Option<Price>,
}

impl Holding {
    /// # Errors
    /// Propagates unit conversion failures.
    pub fn from_raw(token: Token, raw: TokenAmount, price: Option<Price>) -> Result<Self> {
        let balance = units::to_human_units(raw, token.decimals)?;
        Ok(Self {
            token,
            balance,
            price,
        })
    }

    /// `balance * price`, `None` when unpriced.
    #[must_use]
    pub fn value(&self) -> Option<Decimal> {
        self.price.map(|p| p.value() * self.balance)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingShare {
    pub symbol: String,
    pub value: Decimal,
    /// Share of the total value in percent.
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub total_value: Decimal,
    /// Largest holding first. Unpriced holdings are left out.
    pub distribution: Vec<HoldingShare>,
}

pub fn value_portfolio(holdings: &[Holding]) -> PortfolioValuation {
    let priced: Vec<(&Holding, Decimal)> = holdings
        .iter()
        .filter_map(|h| h.value().map(|v| (h, v)))
        .collect();
    let total_value: Decimal = priced.iter().map(|(_, v)| *v).sum();

    let mut distribution: Vec<HoldingShare> = priced
        .into_iter()
        .map(|(h, value)| HoldingShare {
            symbol: h.token.symbol.clone(),
            value,
            percent: if total_value.is_zero() {
                Decimal::ZERO
            } else {
                value / total_value * Decimal::ONE_HUNDRED
            },
        })
        .collect();
    distribution.sort_by(|a, b| b.value.cmp(&a.value));

    PortfolioValuation {
        total_value,
        distribution,
    }
}

/// Profit or loss relative to cost basis, in percent. `None` for a zero basis.
pub fn pnl_percent(cost_basis: Decimal, current_value: Decimal) -> Option<Decimal> {
    if cost_basis.is_zero() {
        return None;
    }
    Some((current_value - cost_basis) / cost_basis * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, balance: Decimal, price: Option<Decimal>) -> Holding {
        Holding {
            token: Token::new(format!("0x{symbol}"), symbol, symbol, 8),
            balance,
            price: price.map(Price),
        }
    }

    #[test]
    fn test_valuation_and_distribution() {
        let holdings = vec![
            holding("USDC", dec!(250), Some(dec!(1))),
            holding("APT", dec!(60), Some(dec!(12.5))),
            holding("MY", dec!(1000), None),
        ];
        let valuation = value_portfolio(&holdings);
        assert_eq!(valuation.total_value, dec!(1000));
        assert_eq!(valuation.distribution.len(), 2);
        assert_eq!(valuation.distribution[0].symbol, "APT");
        assert_eq!(valuation.distribution[0].percent, dec!(75));
    }

    #[test]
    fn test_from_raw() {
        let token = Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8);
        let h = Holding::from_raw(token, TokenAmount::from(250_000_000u64), Some(Price(dec!(2)))).unwrap();
        assert_eq!(h.balance, dec!(2.5));
        assert_eq!(h.value(), Some(dec!(5)));
    }

    #[test]
    fn test_pnl_percent() {
        assert_eq!(pnl_percent(dec!(100), dec!(110)), Some(dec!(10)));
        assert_eq!(pnl_percent(dec!(0), dec!(5)), None);
    }
}
