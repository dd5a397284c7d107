//! Trading workflows for the hybrid AMM/CLOB client.
//!
//! This crate provides:
//! - Swap route selection and payload construction
//! - Tracked pool and token creation workflows
//! - CLOB order tracking and AMM liquidity positions
//! - Market data watchers and the arbitrage monitor
//! - Cancellable periodic refresh tasks

/// Prelude module for convenient imports.
pub mod prelude;

/// Trading configuration.
pub mod config;
/// Execution errors.
pub mod error;
/// View-backed market data.
pub mod market;
/// Arbitrage scanning and execution.
pub mod monitor;
/// Order entry and tracking.
pub mod orders;
/// Liquidity positions.
pub mod positions;
/// Swap routing.
pub mod routing;
/// Periodic refresh tasks.
pub mod scheduler;
/// Connected account.
pub mod session;
/// Multi-step workflows.
pub mod workflow;
