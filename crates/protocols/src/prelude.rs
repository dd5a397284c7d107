//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use hybrid_dex_protocols::prelude::*;
//! ```

pub use crate::addresses::{APTOS_COIN, ContractAddresses, DEFAULT_PUBLISHER, USDC_COIN};
pub use crate::amm::AmmContract;
pub use crate::clob::ClobContract;
pub use crate::client::{
    ClientError, DryRunSigner, StaticViewClient, TransactionSigner, TxReceipt, ViewClient, submit,
};
pub use crate::coin::CoinContract;
pub use crate::payload::{TransactionRequest, ViewRequest};
pub use crate::router::RouterContract;
pub use crate::views::{
    ArbitrageCheck, BestRoute, SwapQuote, order_book_from_view, parse_arbitrage_check,
    parse_balance, parse_best_bid_ask, parse_best_route, parse_coin_info, parse_flag,
    parse_order_book_depth, parse_pool_reserves, parse_swap_quote, pool_snapshot_from_view,
};
