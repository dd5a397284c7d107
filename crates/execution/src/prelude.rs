//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use hybrid_dex_execution::prelude::*;
//! ```

pub use crate::config::TradingConfig;
pub use crate::error::ExecutionError;
pub use crate::market::{MarketReader, WatchedMarket, MarketWatcher, ViewSnapshotSource};
pub use crate::monitor::ArbitrageMonitor;
pub use crate::orders::OrderTracker;
pub use crate::positions::{LiquidityChange, LiquidityManager};
pub use crate::routing::{
    RouteDescriptor, RouteMode, RouteRequest, RoutingError, arbitrage_transaction, choose_route,
    clob_side, min_amount_out, split_amount,
};
pub use crate::scheduler::{RefreshHandle, Scheduler, spawn_every};
pub use crate::session::Session;
pub use crate::workflow::{
    PoolCreationParams, PoolCreationRequest, PoolCreator, TokenAdmin, TokenCreationParams,
    TokenCreationRequest, TokenCreator, TokenRegistryStore, WorkflowStore,
};
