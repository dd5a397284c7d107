//! Collaborator traits for signing and view calls.
//!
//! The wallet adapter and the node client live outside this workspace; they
//! are reached only through [`TransactionSigner`] and [`ViewClient`].

use crate::payload::{TransactionRequest, ViewRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Errors raised by external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No account connected.
    #[error("wallet not connected")]
    NotConnected,

    /// The signer or the user refused the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Submitted, but the chain reported failure.
    #[error("transaction {hash} failed on chain")]
    Failed {
        /// Transaction hash.
        hash: String,
    },

    /// A view call could not be executed.
    #[error("view call failed: {0}")]
    View(String),
}

/// Outcome of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: String,
    pub success: bool,
}

/// Signs and submits entry-function calls.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> Option<String>;

    async fn sign_and_submit(&self, request: &TransactionRequest) -> Result<TxReceipt, ClientError>;
}

/// Executes read-only view calls.
#[async_trait]
pub trait ViewClient: Send + Sync {
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>, ClientError>;
}

/// Submits `request` and turns an on-chain failure into an error.
///
/// # Errors
/// Whatever the signer returns, or [`ClientError::Failed`] for an
/// unsuccessful receipt.
pub async fn submit(
    signer: &dyn TransactionSigner,
    request: &TransactionRequest,
) -> Result<TxReceipt, ClientError> {
    let receipt = signer.sign_and_submit(request).await?;
    if !receipt.success {
        warn!(function = %request.function, hash = %receipt.hash, "Transaction failed on chain");
        return Err(ClientError::Failed { hash: receipt.hash });
    }
    Ok(receipt)
}

/// A signer that records requests instead of sending them.
///
/// Functions registered with [`DryRunSigner::reject`] are refused with the
/// given reason; everything else succeeds with a sequential fake hash.
pub struct DryRunSigner {
    address: String,
    rejections: HashMap<String, String>,
    submitted: Mutex<Vec<TransactionRequest>>,
}

impl DryRunSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            rejections: HashMap::new(),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Refuse every call to the function named `function` (bare name).
    #[must_use]
    pub fn reject(mut self, function: &str, reason: &str) -> Self {
        self.rejections.insert(function.to_string(), reason.to_string());
        self
    }

    /// Requests accepted so far, in submission order.
    pub async fn submitted(&self) -> Vec<TransactionRequest> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl TransactionSigner for DryRunSigner {
    fn address(&self) -> Option<String> {
        Some(self.address.clone())
    }

    async fn sign_and_submit(&self, request: &TransactionRequest) -> Result<TxReceipt, ClientError> {
        if let Some(reason) = self.rejections.get(request.function_name()) {
            return Err(ClientError::Rejected(reason.clone()));
        }
        let mut submitted = self.submitted.lock().await;
        submitted.push(request.clone());
        let hash = format!("0x{:064x}", submitted.len());
        info!(function = %request.function, hash = %hash, "Dry-run submission");
        Ok(TxReceipt {
            hash,
            success: true,
        })
    }
}

/// A view client answering from fixed responses keyed by bare function name.
#[derive(Debug, Clone, Default)]
pub struct StaticViewClient {
    responses: HashMap<String, Vec<Value>>,
}

impl StaticViewClient {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_response(mut self, function: &str, values: Vec<Value>) -> Self {
        self.responses.insert(function.to_string(), values);
        self
    }
}

#[async_trait]
impl ViewClient for StaticViewClient {
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>, ClientError> {
        let name = request.function.rsplit("::").next().unwrap_or(&request.function);
        self.responses
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::View(format!("no response for {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_records_and_rejects() {
        let signer = DryRunSigner::new("0xabc").reject("register_coin", "already registered");
        let ok = TransactionRequest::new("0x1::custom_coin::mint", vec![], vec![]);
        let bad = TransactionRequest::new("0x1::custom_coin::register_coin", vec![], vec![]);

        let receipt = submit(&signer, &ok).await.unwrap();
        assert!(receipt.success);
        assert_eq!(
            submit(&signer, &bad).await,
            Err(ClientError::Rejected("already registered".to_string()))
        );
        assert_eq!(signer.submitted().await.len(), 1);
    }

    #[tokio::test]
    async fn test_static_view_client() {
        let client = StaticViewClient::new().with_response("get_balance", vec![Value::from("5")]);
        let hit = ViewRequest::new("0x1::custom_coin::get_balance", vec![], vec![]);
        let miss = ViewRequest::new("0x1::custom_coin::get_coin_info", vec![], vec![]);
        assert_eq!(client.view(&hit).await.unwrap(), vec![Value::from("5")]);
        assert!(client.view(&miss).await.is_err());
    }

    struct FailingChain;

    #[async_trait]
    impl TransactionSigner for FailingChain {
        fn address(&self) -> Option<String> {
            None
        }

        async fn sign_and_submit(&self, _: &TransactionRequest) -> Result<TxReceipt, ClientError> {
            Ok(TxReceipt {
                hash: "0xdead".to_string(),
                success: false,
            })
        }
    }

    #[tokio::test]
    async fn test_unsuccessful_receipt_is_an_error() {
        let req = TransactionRequest::new("0x1::amm::create_pool", vec![], vec![]);
        assert_eq!(
            submit(&FailingChain, &req).await,
            Err(ClientError::Failed {
                hash: "0xdead".to_string()
            })
        );
    }
}
