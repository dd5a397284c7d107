//! Domain error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by domain validation and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Amount is non-numeric, negative or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Decimal count outside the supported range.
    #[error("unsupported decimal count: {0}")]
    InvalidDecimals(u8),

    /// A pair was built from two tokens with the same address.
    #[error("identical tokens selected: {0}")]
    IdenticalTokens(String),

    /// Fee tier is not one of the deployed buckets.
    #[error("unsupported fee tier: {0} bps")]
    UnsupportedFeeTier(u32),

    /// Order side code is neither buy (0) nor sell (1).
    #[error("unknown order side code: {0}")]
    UnknownOrderSide(u8),

    /// Best bid is at or above best ask.
    #[error("crossed order book: best bid {bid} >= best ask {ask}")]
    CrossedBook {
        /// Best bid price.
        bid: Decimal,
        /// Best ask price.
        ask: Decimal,
    },

    /// A state machine was asked to make an illegal move.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// Token address already present in the registry.
    #[error("token already registered: {0}")]
    DuplicateToken(String),

    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Result alias for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
