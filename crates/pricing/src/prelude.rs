//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use hybrid_dex_pricing::prelude::*;
//! ```

pub use crate::arbitrage::{
    ArbitrageConfig, ArbitrageDirection, ArbitrageEngine, ArbitrageOpportunity, ArbitrageStats,
    OpportunitySet, detect_opportunities,
};
pub use crate::chart::{PricePoint, PriceSeries, PriceStats, format_price};
pub use crate::feed::{
    FeedError, MarketPairs, SnapshotSource, StaticSource, SyntheticFeed, SyntheticMarket,
};
pub use crate::order_book::{
    BookMetrics, DepthRow, DepthView, MarketState, OrderPrefill, cumulative_total, depth_rows,
    prefill_from_click,
};
pub use crate::portfolio::{Holding, HoldingShare, PortfolioValuation, pnl_percent, value_portfolio};
pub use crate::venue::{SwapEstimate, VenuePrice, book_mid_price, estimate_swap, pool_mid_price, pool_price_of};
