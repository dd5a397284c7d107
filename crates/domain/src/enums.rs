use crate::error::{DomainError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee bucket a pool is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeeTier {
    /// 0.05% (5 bps).
    Low,
    /// 0.30% (30 bps).
    High,
}

impl FeeTier {
    /// All deployed tiers, lowest first.
    pub const ALL: [FeeTier; 2] = [FeeTier::Low, FeeTier::High];

    /// Fee in basis points, the value passed to the contracts.
    #[must_use]
    pub const fn bps(self) -> u32 {
        match self {
            FeeTier::Low => 5,
            FeeTier::High => 30,
        }
    }

    /// Parses a basis-point value.
    ///
    /// # Errors
    /// Returns [`DomainError::UnsupportedFeeTier`] for anything other than 5 or 30.
    pub fn from_bps(bps: u32) -> Result<Self> {
        match bps {
            5 => Ok(FeeTier::Low),
            30 => Ok(FeeTier::High),
            other => Err(DomainError::UnsupportedFeeTier(other)),
        }
    }

    /// Fee expressed as a percentage (0.05, 0.30).
    #[must_use]
    pub fn as_percent(self) -> Decimal {
        Decimal::new(i64::from(self.bps()), 2)
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.as_percent())
    }
}

/// Side of a CLOB order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    /// Bid.
    Buy,
    /// Ask.
    Sell,
}

impl OrderSide {
    /// On-chain side code (0 = buy, 1 = sell).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            OrderSide::Buy => 0,
            OrderSide::Sell => 1,
        }
    }

    /// Parses an on-chain side code.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownOrderSide`] for codes other than 0 and 1.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(OrderSide::Buy),
            1 => Ok(OrderSide::Sell),
            other => Err(DomainError::UnknownOrderSide(other)),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

/// Lifecycle status of a CLOB order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created locally, not yet confirmed by the signer.
    PendingSubmission,
    /// Resting on the book, possibly partially filled.
    Open,
    /// Fully filled.
    Filled,
    /// Cancelled on confirmation.
    Cancelled,
    /// Submission failed.
    Failed,
}

impl OrderStatus {
    /// Returns `true` for filled, cancelled and failed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Failed
        )
    }

    /// Whether `self -> next` is a legal move.
    ///
    /// `Open -> Open` is allowed so partial fills can be recorded.
    #[must_use]
    pub const fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::PendingSubmission, OrderStatus::Open)
                | (OrderStatus::PendingSubmission, OrderStatus::Failed)
                | (OrderStatus::Open, OrderStatus::Open)
                | (OrderStatus::Open, OrderStatus::Filled)
                | (OrderStatus::Open, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::PendingSubmission => "pending-submission",
            OrderStatus::Open => "open",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Status of a tracked multi-step workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Pending,
    Completed,
    Failed,
}

impl WorkflowStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, WorkflowStatus::Pending)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Liquidity venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Amm,
    Clob,
}
