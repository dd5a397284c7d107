//! Venue pricing and cross-venue analytics.
//!
//! This crate provides:
//! - AMM and CLOB mid prices behind [`venue::VenuePrice`]
//! - Order book metrics, depth rows and price-click prefills
//! - Arbitrage detection and ranking
//! - Price chart statistics and portfolio valuation
//! - Snapshot sources, including a synthetic feed

/// Prelude module for convenient imports.
pub mod prelude;

/// Arbitrage detection.
pub mod arbitrage;
/// Price history statistics.
pub mod chart;
/// Snapshot sources.
pub mod feed;
/// Order book metrics and depth.
pub mod order_book;
/// Portfolio valuation.
pub mod portfolio;
/// Venue mid prices.
pub mod venue;
