//! AMM pool creation.

use crate::error::Result;
use crate::workflow::store::WorkflowStore;
use hybrid_dex_domain::entities::{PoolKey, StepOutcome, Token, WorkflowRequest, WorkflowStep};
use hybrid_dex_domain::enums::FeeTier;
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::client::{TransactionSigner, TxReceipt, submit};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Tokens as selected by the user; order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCreationParams {
    pub token_a: Token,
    pub token_b: Token,
    pub fee_tier: FeeTier,
}

pub type PoolCreationRequest = WorkflowRequest<PoolCreationParams>;

pub struct PoolCreator {
    addresses: ContractAddresses,
    store: Arc<WorkflowStore<PoolCreationParams>>,
}

impl PoolCreator {
    pub fn new(addresses: ContractAddresses, store: Arc<WorkflowStore<PoolCreationParams>>) -> Self {
        Self { addresses, store }
    }

    pub fn store(&self) -> &Arc<WorkflowStore<PoolCreationParams>> {
        &self.store
    }

    /// One-time AMM module setup, needed before the first pool.
    ///
    /// # Errors
    /// Signer or chain failure.
    pub async fn initialize_amm(&self, signer: &dyn TransactionSigner) -> Result<TxReceipt> {
        let receipt = submit(signer, &self.addresses.amm().initialize()).await?;
        info!(hash = %receipt.hash, "AMM initialized");
        Ok(receipt)
    }

    /// Creates the pool for the canonical ordering of the selected tokens.
    ///
    /// Identical tokens are rejected before anything is recorded or sent.
    /// A submission failure is not an error: the returned request is
    /// `Failed` and carries the reason.
    ///
    /// # Errors
    /// [`DomainError::IdenticalTokens`](hybrid_dex_domain::error::DomainError::IdenticalTokens).
    pub async fn create_pool(
        &self,
        signer: &dyn TransactionSigner,
        params: PoolCreationParams,
    ) -> Result<PoolCreationRequest> {
        let key = PoolKey::new(&params.token_a.address, &params.token_b.address, params.fee_tier)?;
        let mut request = WorkflowRequest::new(params);
        self.store.upsert(request.clone()).await;

        match submit(signer, &self.addresses.amm().create_pool(&key)).await {
            Ok(receipt) => {
                request.record_step(
                    WorkflowStep::CreatePool,
                    StepOutcome::Succeeded {
                        tx_hash: receipt.hash.clone(),
                    },
                )?;
                request.complete(Some(receipt.hash), Some(key.to_string()))?;
                info!(request = %request.id, pool = %key, "Pool created");
            }
            Err(e) => {
                request.record_step(
                    WorkflowStep::CreatePool,
                    StepOutcome::Failed {
                        reason: e.to_string(),
                    },
                )?;
                request.fail(e.to_string(), None)?;
                error!(request = %request.id, pool = %key, error = %e, "Pool creation failed");
            }
        }
        self.store.upsert(request.clone()).await;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;
    use hybrid_dex_domain::enums::WorkflowStatus;
    use hybrid_dex_protocols::client::DryRunSigner;

    fn creator() -> PoolCreator {
        PoolCreator::new(ContractAddresses::default(), Arc::new(WorkflowStore::new()))
    }

    fn params(a: &str, b: &str) -> PoolCreationParams {
        PoolCreationParams {
            token_a: Token::new(a, "A", "A", 8),
            token_b: Token::new(b, "B", "B", 8),
            fee_tier: FeeTier::High,
        }
    }

    #[tokio::test]
    async fn test_create_pool_uses_canonical_order() {
        let creator = creator();
        let signer = DryRunSigner::new("0xabc");
        let request = creator.create_pool(&signer, params("0xBBB", "0xAAA")).await.unwrap();

        assert_eq!(request.status(), WorkflowStatus::Completed);
        assert!(request.tx_hash.is_some());
        let sent = signer.submitted().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].type_arguments, vec!["0xAAA", "0xBBB"]);
        assert_eq!(creator.store().len().await, 1);
    }

    #[tokio::test]
    async fn test_identical_tokens_rejected_before_submission() {
        let creator = creator();
        let signer = DryRunSigner::new("0xabc");
        let result = creator.create_pool(&signer, params("0xAAA", "0xAAA")).await;
        assert!(matches!(result, Err(ExecutionError::Domain(_))));
        assert!(signer.submitted().await.is_empty());
        assert!(creator.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_rejected_submission_fails_request() {
        let creator = creator();
        let signer = DryRunSigner::new("0xabc").reject("create_pool", "user rejected");
        let request = creator.create_pool(&signer, params("0xAAA", "0xBBB")).await.unwrap();
        assert_eq!(request.status(), WorkflowStatus::Failed);
        assert!(request.failure_reason.unwrap().contains("user rejected"));
    }
}
