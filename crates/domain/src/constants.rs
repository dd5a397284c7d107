//! Fixed protocol constants shared by every venue.

/// Multiplier applied to human prices before they are sent to the order book.
pub const PRICE_MULTIPLIER: u64 = 1_000_000;

/// Number of decimal places encoded by [`PRICE_MULTIPLIER`].
pub const PRICE_DECIMALS: u32 = 6;

/// Largest decimal count accepted by the unit scaler.
pub const MAX_TOKEN_DECIMALS: u8 = 18;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u32 = 10_000;
