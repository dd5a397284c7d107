use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-scaled price, quote units per base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(pub Decimal);

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Arithmetic mean of two prices.
    #[must_use]
    pub fn midpoint(a: Price, b: Price) -> Price {
        Price((a.0 + b.0) / Decimal::TWO)
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
