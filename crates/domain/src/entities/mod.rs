pub mod order;
pub mod order_book;
pub mod pool;
pub mod position;
pub mod token;
pub mod workflow;

// Re-export for easier access
pub use order::{Order, OrderId};
pub use order_book::{BookLevel, OrderBookSnapshot, RawBookLevel};
pub use pool::{PoolKey, PoolSnapshot, pool_label};
pub use position::LiquidityPosition;
pub use token::{CoinInfo, Token, shorten_address};
pub use workflow::{StepOutcome, StepRecord, WorkflowRequest, WorkflowStep};
