//! Tracked multi-step workflows.
//!
//! Each run owns its own [`WorkflowRequest`](hybrid_dex_domain::entities::WorkflowRequest);
//! runs share nothing but the stores they publish into.

mod pool_creation;
mod store;
mod token_admin;
mod token_creation;

pub use pool_creation::{PoolCreationParams, PoolCreationRequest, PoolCreator};
pub use store::{TokenRegistryStore, WorkflowStore};
pub use token_admin::TokenAdmin;
pub use token_creation::{TokenCreationParams, TokenCreationRequest, TokenCreator};
