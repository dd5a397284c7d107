use crate::error::{DomainError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A percentage stored as a percent value (0.5 means 0.5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Percentage(pub Decimal);

impl Percentage {
    /// Creates a percentage in `0..=100`.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidAmount`] outside that range.
    pub fn new(percent: Decimal) -> Result<Self> {
        if percent.is_sign_negative() || percent > Decimal::ONE_HUNDRED {
            return Err(DomainError::InvalidAmount(format!(
                "percentage out of range: {percent}"
            )));
        }
        Ok(Self(percent))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_range_validation() {
        assert!(Percentage::new(dec!(-1)).is_err());
        assert!(Percentage::new(dec!(100.1)).is_err());
        assert!(Percentage::new(dec!(100)).is_ok());
    }
}
