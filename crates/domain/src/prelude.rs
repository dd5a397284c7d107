//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use hybrid_dex_domain::prelude::*;
//! ```

pub use crate::constants::{PRICE_DECIMALS, PRICE_MULTIPLIER};
pub use crate::entities::{
    BookLevel, CoinInfo, LiquidityPosition, Order, OrderBookSnapshot, OrderId, PoolKey,
    PoolSnapshot, RawBookLevel, StepOutcome, StepRecord, Token, WorkflowRequest, WorkflowStep,
};
pub use crate::enums::{FeeTier, OrderSide, OrderStatus, OrderType, Venue, WorkflowStatus};
pub use crate::error::DomainError;
pub use crate::math::units::{
    format_human_units, parse_raw_units, scale_price, to_human_units, to_raw_units,
    unscale_price,
};
pub use crate::registry::TokenRegistry;
pub use crate::value_objects::{Amount, Percentage, Price, TokenAmount};
