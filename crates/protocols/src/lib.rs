//! On-chain contract interface for the hybrid DEX.
//!
//! This crate provides:
//! - Typed payload builders for the AMM, CLOB, router and custom coin modules
//! - Module address configuration and the default token list
//! - Collaborator traits for transaction signing and view calls
//! - Lenient parsers for view-call results

/// Prelude module for convenient imports.
pub mod prelude;

/// Contract module addresses.
pub mod addresses;
/// AMM module payloads.
pub mod amm;
/// CLOB module payloads.
pub mod clob;
/// Signer and view client traits.
pub mod client;
/// Custom coin module payloads.
pub mod coin;
/// Request shapes.
pub mod payload;
/// Router module payloads.
pub mod router;
/// View result parsing.
pub mod views;
