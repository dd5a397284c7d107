//! Custom token creation: initialize, register, then mint the initial
//! supply to the creator.
//!
//! The three transactions are independent on chain and nothing is rolled
//! back. A failed mint leaves an initialized coin behind; the failed record
//! keeps its coin type in `result_address`.

use crate::error::{ExecutionError, Result};
use crate::workflow::store::{TokenRegistryStore, WorkflowStore};
use hybrid_dex_domain::constants::MAX_TOKEN_DECIMALS;
use hybrid_dex_domain::entities::{StepOutcome, Token, WorkflowRequest, WorkflowStep};
use hybrid_dex_domain::error::DomainError;
use hybrid_dex_domain::math::units;
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::client::{TransactionSigner, submit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreationParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Initial supply in human units, minted to the creator.
    pub initial_supply: Decimal,
    pub monitor_supply: bool,
}

pub type TokenCreationRequest = WorkflowRequest<TokenCreationParams>;

pub struct TokenCreator {
    addresses: ContractAddresses,
    store: Arc<WorkflowStore<TokenCreationParams>>,
    registry: Arc<TokenRegistryStore>,
}

impl TokenCreator {
    pub fn new(
        addresses: ContractAddresses,
        store: Arc<WorkflowStore<TokenCreationParams>>,
        registry: Arc<TokenRegistryStore>,
    ) -> Self {
        Self {
            addresses,
            store,
            registry,
        }
    }

    pub fn store(&self) -> &Arc<WorkflowStore<TokenCreationParams>> {
        &self.store
    }

    fn validate(params: &TokenCreationParams) -> Result<()> {
        if params.name.trim().is_empty() || params.symbol.trim().is_empty() {
            return Err(ExecutionError::InvalidInput(
                "token name and symbol are required".into(),
            ));
        }
        if params.decimals > MAX_TOKEN_DECIMALS {
            return Err(DomainError::InvalidDecimals(params.decimals).into());
        }
        Ok(())
    }

    /// Runs the creation sequence.
    ///
    /// Input problems and a missing account are errors raised before any
    /// submission. Submission failures end the returned request in `Failed`.
    ///
    /// # Errors
    /// [`ExecutionError::InvalidInput`], a domain scaling error, or
    /// [`ExecutionError::NotConnected`] when the signer has no address.
    pub async fn create_token(
        &self,
        signer: &dyn TransactionSigner,
        mut params: TokenCreationParams,
    ) -> Result<TokenCreationRequest> {
        params.symbol = params.symbol.trim().to_uppercase();
        Self::validate(&params)?;
        let supply = units::to_raw_units(params.initial_supply, params.decimals)?;
        let creator = signer.address().ok_or(ExecutionError::NotConnected)?;

        let coin = self.addresses.coin();
        let coin_type = coin.coin_type();
        let mut request = WorkflowRequest::new(params.clone());
        self.store.upsert(request.clone()).await;

        let init = coin.initialize_coin(
            &params.name,
            &params.symbol,
            params.decimals,
            params.monitor_supply,
        );
        let init_hash = match submit(signer, &init).await {
            Ok(receipt) => {
                request.record_step(
                    WorkflowStep::Initialize,
                    StepOutcome::Succeeded {
                        tx_hash: receipt.hash.clone(),
                    },
                )?;
                receipt.hash
            }
            Err(e) => {
                request.record_step(
                    WorkflowStep::Initialize,
                    StepOutcome::Failed {
                        reason: e.to_string(),
                    },
                )?;
                request.fail(format!("initialize failed: {e}"), None)?;
                error!(request = %request.id, symbol = %params.symbol, error = %e, "Token initialization failed");
                self.store.upsert(request.clone()).await;
                return Ok(request);
            }
        };

        // Registration commonly fails because the creator is already
        // registered; minting still works in that case.
        let outcome = match submit(signer, &coin.register_coin()).await {
            Ok(receipt) => StepOutcome::Succeeded {
                tx_hash: receipt.hash,
            },
            Err(e) => {
                warn!(request = %request.id, error = %e, "Coin registration skipped");
                StepOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        };
        request.record_step(WorkflowStep::Register, outcome)?;

        match submit(signer, &coin.mint_with_admin(&creator, supply)).await {
            Ok(receipt) => {
                request.record_step(
                    WorkflowStep::Mint,
                    StepOutcome::Succeeded {
                        tx_hash: receipt.hash,
                    },
                )?;
                request.complete(Some(init_hash), Some(coin_type.clone()))?;
                info!(
                    request = %request.id,
                    symbol = %params.symbol,
                    coin_type = %coin_type,
                    supply = %supply,
                    "Token created"
                );
                let token = Token::new(coin_type, params.symbol, params.name, params.decimals);
                if let Err(e) = self.registry.add(token).await {
                    warn!(request = %request.id, error = %e, "Token already in registry");
                }
            }
            Err(e) => {
                request.record_step(
                    WorkflowStep::Mint,
                    StepOutcome::Failed {
                        reason: e.to_string(),
                    },
                )?;
                request.fail(format!("mint failed: {e}"), Some(coin_type))?;
                error!(request = %request.id, error = %e, "Initial mint failed after initialization");
            }
        }
        self.store.upsert(request.clone()).await;
        Ok(request)
    }
}
