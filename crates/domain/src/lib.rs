//! Core domain types for the hybrid AMM/CLOB trading client.
//!
//! This crate provides:
//! - Raw/human unit scaling and order-book price scaling
//! - Tokens, canonical pool keys, pool and order book snapshots
//! - Orders, liquidity positions and multi-step workflow records
//! - An immutable token registry
//! - Constant-product estimates

/// Shared constants.
pub mod constants;
/// Domain entities.
pub mod entities;
/// Enumerations.
pub mod enums;
/// Error types.
pub mod error;
/// Numeric helpers.
pub mod math;
/// Prelude module for convenient imports.
pub mod prelude;
/// Token registry.
pub mod registry;
/// Value objects.
pub mod value_objects;
