use crate::error::{DomainError, Result};
use crate::math::units;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw on-chain token amount (smallest indivisible units).
///
/// Serialized as a decimal string, which is what the Move entry functions
/// and view functions exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    pub fn new(amount: impl Into<U256>) -> Self {
        Self(amount.into())
    }

    #[must_use]
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Converts to `u128`, failing when the value does not fit.
    ///
    /// # Errors
    /// Returns [`DomainError::Overflow`] above `u128::MAX`.
    pub fn to_u128(&self) -> Result<u128> {
        if self.0 > U256::from(u128::MAX) {
            return Err(DomainError::Overflow);
        }
        Ok(self.0.low_u128())
    }

    #[must_use]
    pub fn saturating_sub(&self, other: TokenAmount) -> TokenAmount {
        TokenAmount(self.0.saturating_sub(other.0))
    }

    /// # Errors
    /// Returns [`DomainError::Overflow`] on overflow.
    pub fn checked_add(&self, other: TokenAmount) -> Result<TokenAmount> {
        self.0
            .checked_add(other.0)
            .map(TokenAmount)
            .ok_or(DomainError::Overflow)
    }
}

impl From<u64> for TokenAmount {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<u128> for TokenAmount {
    fn from(v: u128) -> Self {
        Self(U256::from(v))
    }
}

impl FromStr for TokenAmount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidAmount(format!(
                "not a raw integer amount: {s:?}"
            )));
        }
        U256::from_dec_str(trimmed)
            .map(TokenAmount)
            .map_err(|_| DomainError::Overflow)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A raw amount together with the decimal count needed to read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub raw: TokenAmount,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: TokenAmount, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Builds an amount from a human decimal value, flooring sub-unit dust.
    ///
    /// # Errors
    /// Propagates [`units::to_raw_units`] failures.
    pub fn from_decimal(d: Decimal, decimals: u8) -> Result<Self> {
        Ok(Self {
            raw: units::to_raw_units(d, decimals)?,
            decimals,
        })
    }

    /// Human value of this amount.
    ///
    /// # Errors
    /// Propagates [`units::to_human_units`] failures.
    pub fn to_decimal(&self) -> Result<Decimal> {
        units::to_human_units(self.raw, self.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_and_display() {
        let amount: TokenAmount = "100000000".parse().unwrap();
        assert_eq!(amount, TokenAmount::from(100_000_000u64));
        assert_eq!(amount.to_string(), "100000000");
    }

    #[test]
    fn test_parse_rejects_non_integer() {
        assert!("1.5".parse::<TokenAmount>().is_err());
        assert!("-3".parse::<TokenAmount>().is_err());
        assert!("".parse::<TokenAmount>().is_err());
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let amount = TokenAmount::from(42u64);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"42\"");
        let back: TokenAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_amount_decimal_conversion() {
        let amount = Amount::from_decimal(dec!(1.5), 8).unwrap();
        assert_eq!(amount.raw, TokenAmount::from(150_000_000u64));
        assert_eq!(amount.to_decimal().unwrap(), dec!(1.5));
    }
}
