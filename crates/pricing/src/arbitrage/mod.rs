//! Cross-venue arbitrage detection.
//!
//! This module provides:
//! - Gap detection between AMM pool prices and CLOB mid prices
//! - Position sizing capped by notional and top-of-book depth
//! - Ranked, time-stamped opportunity sets

mod engine;
mod opportunity;

pub use engine::*;
pub use opportunity::*;
