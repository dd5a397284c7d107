use crate::entities::token::Token;
use crate::enums::FeeTier;
use crate::error::{DomainError, Result};
use crate::value_objects::TokenAmount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identity of an AMM pool.
///
/// `token_x` is always the lexicographically smaller address, so both
/// orderings of a pair resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub token_x: String,
    pub token_y: String,
    pub fee_tier: FeeTier,
}

impl PoolKey {
    /// Builds the canonical key for an unordered pair.
    ///
    /// # Errors
    /// Returns [`DomainError::IdenticalTokens`] when both sides are the same token.
    pub fn new(token_a: &str, token_b: &str, fee_tier: FeeTier) -> Result<Self> {
        if token_a == token_b {
            return Err(DomainError::IdenticalTokens(token_a.to_string()));
        }
        let (token_x, token_y) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self {
            token_x: token_x.to_string(),
            token_y: token_y.to_string(),
            fee_tier,
        })
    }

    /// `true` when `(token_a, token_b)` was given in canonical order.
    #[must_use]
    pub fn is_canonical_order(token_a: &str, token_b: &str) -> bool {
        token_a < token_b
    }

    /// Swap direction flag for a trade selling `token_in` into this pool.
    ///
    /// `Some(true)` when `token_in` is the canonical x, `Some(false)` when it is y,
    /// `None` when it is not part of the pool.
    #[must_use]
    pub fn x_to_y(&self, token_in: &str) -> Option<bool> {
        if token_in == self.token_x {
            Some(true)
        } else if token_in == self.token_y {
            Some(false)
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.token_x == token || self.token_y == token
    }

    /// Type arguments in canonical order.
    #[must_use]
    pub fn type_arguments(&self) -> Vec<String> {
        vec![self.token_x.clone(), self.token_y.clone()]
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.token_x, self.token_y, self.fee_tier)
    }
}

/// Reserves of an AMM pool at one instant, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub token_x: Token,
    pub token_y: Token,
    pub fee_tier: FeeTier,
    pub reserve_x: TokenAmount,
    pub reserve_y: TokenAmount,
}

impl PoolSnapshot {
    /// Builds a snapshot from reserves given in any order; the tokens and
    /// reserves are swapped into canonical order when needed.
    ///
    /// # Errors
    /// Returns [`DomainError::IdenticalTokens`] for a pool of one token.
    pub fn new(
        token_a: Token,
        token_b: Token,
        fee_tier: FeeTier,
        reserve_a: TokenAmount,
        reserve_b: TokenAmount,
    ) -> Result<Self> {
        if token_a.address == token_b.address {
            return Err(DomainError::IdenticalTokens(token_a.address));
        }
        let snapshot = if PoolKey::is_canonical_order(&token_a.address, &token_b.address) {
            Self {
                token_x: token_a,
                token_y: token_b,
                fee_tier,
                reserve_x: reserve_a,
                reserve_y: reserve_b,
            }
        } else {
            Self {
                token_x: token_b,
                token_y: token_a,
                fee_tier,
                reserve_x: reserve_b,
                reserve_y: reserve_a,
            }
        };
        Ok(snapshot)
    }

    #[must_use]
    pub fn key(&self) -> PoolKey {
        PoolKey {
            token_x: self.token_x.address.clone(),
            token_y: self.token_y.address.clone(),
            fee_tier: self.fee_tier,
        }
    }

    /// `(reserve_in, reserve_out)` for a trade selling `token_in`.
    #[must_use]
    pub fn reserves_for(&self, token_in: &str) -> Option<(TokenAmount, TokenAmount)> {
        if token_in == self.token_x.address {
            Some((self.reserve_x, self.reserve_y))
        } else if token_in == self.token_y.address {
            Some((self.reserve_y, self.reserve_x))
        } else {
            None
        }
    }

    #[must_use]
    pub fn has_liquidity(&self) -> bool {
        !self.reserve_x.is_zero() && !self.reserve_y.is_zero()
    }

    #[must_use]
    pub fn label(&self) -> String {
        pool_label(&self.token_x.symbol, &self.token_y.symbol, self.fee_tier)
    }
}

/// Display label `SYM1-SYM2-0.05%` with the symbols sorted.
pub fn pool_label(symbol_a: &str, symbol_b: &str, fee_tier: FeeTier) -> String {
    let (first, second) = if symbol_a <= symbol_b {
        (symbol_a, symbol_b)
    } else {
        (symbol_b, symbol_a)
    };
    format!("{first}-{second}-{fee_tier}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(addr: &str, symbol: &str) -> Token {
        Token::new(addr, symbol, symbol, 8)
    }

    #[test]
    fn test_pool_key_is_order_independent() {
        let ab = PoolKey::new("0xAAA", "0xBBB", FeeTier::Low).unwrap();
        let ba = PoolKey::new("0xBBB", "0xAAA", FeeTier::Low).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.token_x, "0xAAA");
        assert_eq!(ab.x_to_y("0xAAA"), Some(true));
        assert_eq!(ab.x_to_y("0xBBB"), Some(false));
        assert_eq!(ab.x_to_y("0xCCC"), None);
    }

    #[test]
    fn test_pool_key_rejects_identical_tokens() {
        assert_eq!(
            PoolKey::new("0xAAA", "0xAAA", FeeTier::High),
            Err(DomainError::IdenticalTokens("0xAAA".to_string()))
        );
    }

    #[test]
    fn test_snapshot_swaps_reserves_into_canonical_order() {
        let snap = PoolSnapshot::new(
            token("0xBBB", "USDC"),
            token("0xAAA", "APT"),
            FeeTier::Low,
            TokenAmount::from(500u64),
            TokenAmount::from(20u64),
        )
        .unwrap();
        assert_eq!(snap.token_x.symbol, "APT");
        assert_eq!(snap.reserve_x, TokenAmount::from(20u64));
        assert_eq!(snap.reserve_y, TokenAmount::from(500u64));
        assert_eq!(
            snap.reserves_for("0xBBB"),
            Some((TokenAmount::from(500u64), TokenAmount::from(20u64)))
        );
    }

    #[test]
    fn test_pool_label() {
        assert_eq!(pool_label("USDC", "APT", FeeTier::Low), "APT-USDC-0.05%");
        assert_eq!(pool_label("APT", "MY", FeeTier::High), "APT-MY-0.30%");
    }
}
