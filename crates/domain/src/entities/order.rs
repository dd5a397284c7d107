use crate::entities::token::Token;
use crate::enums::{OrderSide, OrderStatus, OrderType};
use crate::error::{DomainError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order identifier: a local id until the venue assigns its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderId {
    Local(Uuid),
    Venue(String),
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Local(id) => write!(f, "local:{id}"),
            OrderId::Venue(id) => write!(f, "{id}"),
        }
    }
}

/// Client-side copy of a CLOB order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Local id, assigned before submission.
    pub local_id: Uuid,
    /// Id assigned by the venue, once known.
    pub venue_id: Option<String>,
    pub base: Token,
    pub quote: Token,
    pub side: OrderSide,
    pub order_type: OrderType,
    /// Limit price in quote per base. `None` for market orders.
    pub price: Option<Decimal>,
    /// Size in base units.
    pub size: Decimal,
    pub filled_size: Decimal,
    status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tx_hash: Option<String>,
    pub failure_reason: Option<String>,
}

impl Order {
    /// Creates an order in `PendingSubmission`.
    pub fn new(
        base: Token,
        quote: Token,
        side: OrderSide,
        order_type: OrderType,
        price: Option<Decimal>,
        size: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            local_id: Uuid::new_v4(),
            venue_id: None,
            base,
            quote,
            side,
            order_type,
            price,
            size,
            filled_size: Decimal::ZERO,
            status: OrderStatus::PendingSubmission,
            created_at: now,
            updated_at: now,
            tx_hash: None,
            failure_reason: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> OrderId {
        match &self.venue_id {
            Some(id) => OrderId::Venue(id.clone()),
            None => OrderId::Local(self.local_id),
        }
    }

    /// Whether `id` refers to this order, by local or venue id.
    #[must_use]
    pub fn matches(&self, id: &OrderId) -> bool {
        match id {
            OrderId::Local(local) => *local == self.local_id,
            OrderId::Venue(venue) => self.venue_id.as_deref() == Some(venue.as_str()),
        }
    }

    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Moves the order to `next`.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTransition`] for an illegal move.
    pub fn transition(&mut self, next: OrderStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Records the cumulative filled size reported by the venue.
    ///
    /// The order becomes `Filled` once the fill covers its size.
    ///
    /// # Errors
    /// [`DomainError::InvalidAmount`] for negative fills or fills that go
    /// backwards, [`DomainError::InvalidTransition`] if the order is not open.
    pub fn apply_fill(&mut self, filled_size: Decimal) -> Result<()> {
        if filled_size.is_sign_negative() || filled_size < self.filled_size {
            return Err(DomainError::InvalidAmount(format!(
                "fill {filled_size} below recorded {}",
                self.filled_size
            )));
        }
        let next = if filled_size >= self.size {
            OrderStatus::Filled
        } else {
            OrderStatus::Open
        };
        self.transition(next)?;
        self.filled_size = filled_size.min(self.size);
        Ok(())
    }

    #[must_use]
    pub fn remaining(&self) -> Decimal {
        (self.size - self.filled_size).max(Decimal::ZERO)
    }

    /// Filled share of the order in percent.
    #[must_use]
    pub fn fill_percent(&self) -> Decimal {
        if self.size.is_zero() {
            return Decimal::ZERO;
        }
        self.filled_size / self.size * Decimal::ONE_HUNDRED
    }

    /// `size * price` in quote units; `None` without a price.
    #[must_use]
    pub fn notional(&self) -> Option<Decimal> {
        self.price.map(|p| p * self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order() -> Order {
        Order::new(
            Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8),
            Token::new("0xbae2::usdc::USDC", "USDC", "USD Coin", 6),
            OrderSide::Buy,
            OrderType::Limit,
            Some(dec!(12.5)),
            dec!(4),
        )
    }

    #[test]
    fn test_new_order_is_pending() {
        let o = order();
        assert_eq!(o.status(), OrderStatus::PendingSubmission);
        assert_eq!(o.id(), OrderId::Local(o.local_id));
        assert_eq!(o.notional(), Some(dec!(50)));
    }

    #[test]
    fn test_partial_then_full_fill() {
        let mut o = order();
        o.transition(OrderStatus::Open).unwrap();
        o.apply_fill(dec!(1)).unwrap();
        assert_eq!(o.status(), OrderStatus::Open);
        assert_eq!(o.remaining(), dec!(3));
        assert_eq!(o.fill_percent(), dec!(25));

        o.apply_fill(dec!(4)).unwrap();
        assert_eq!(o.status(), OrderStatus::Filled);
        assert!(o.apply_fill(dec!(4)).is_err());
    }

    #[test]
    fn test_cannot_fill_pending_order() {
        let mut o = order();
        assert!(matches!(
            o.apply_fill(dec!(1)),
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_venue_id_matching() {
        let mut o = order();
        o.venue_id = Some("42".to_string());
        assert!(o.matches(&OrderId::Venue("42".to_string())));
        assert!(o.matches(&OrderId::Local(o.local_id)));
        assert_eq!(o.id().to_string(), "42");
    }
}
