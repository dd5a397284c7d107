//! Execution error types.

use crate::routing::RoutingError;
use hybrid_dex_domain::enums::OrderStatus;
use hybrid_dex_domain::error::DomainError;
use hybrid_dex_pricing::feed::FeedError;
use hybrid_dex_protocols::client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    /// An action needs a connected account.
    #[error("no account connected")]
    NotConnected,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// The action does not apply to an order in this status.
    #[error("order {id} is {status}")]
    OrderState { id: String, status: OrderStatus },

    #[error("no position in pool {0}")]
    PositionNotFound(String),

    /// The opportunity set is past its refresh window.
    #[error("opportunity set is stale; refresh before executing")]
    StaleOpportunities,

    #[error("no arbitrage opportunity available")]
    NoOpportunity,

    /// A view answered with data that failed validation.
    #[error("{0} unavailable")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
