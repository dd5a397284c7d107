//! Periodic arbitrage scanning and guarded execution.

use crate::error::{ExecutionError, Result};
use crate::routing::arbitrage_transaction;
use crate::scheduler::{RefreshHandle, spawn_every};
use hybrid_dex_pricing::arbitrage::{ArbitrageEngine, ArbitrageOpportunity, OpportunitySet};
use hybrid_dex_pricing::feed::SnapshotSource;
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::client::{TransactionSigner, TxReceipt, submit};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Keeps the latest [`OpportunitySet`] for a snapshot source.
///
/// A failed scan leaves the previous set in place; it simply ages into
/// staleness. Stale sets are never executed.
pub struct ArbitrageMonitor {
    engine: ArbitrageEngine,
    source: Arc<dyn SnapshotSource>,
    addresses: ContractAddresses,
    latest: RwLock<Arc<OpportunitySet>>,
}

impl ArbitrageMonitor {
    pub fn new(engine: ArbitrageEngine, source: Arc<dyn SnapshotSource>, addresses: ContractAddresses) -> Self {
        let empty = OpportunitySet::empty(engine.config().stale_after);
        Self {
            engine,
            source,
            addresses,
            latest: RwLock::new(Arc::new(empty)),
        }
    }

    pub async fn latest(&self) -> Arc<OpportunitySet> {
        Arc::clone(&*self.latest.read().await)
    }

    /// Runs one scan and publishes the result.
    ///
    /// # Errors
    /// The source failed; the previous set is kept.
    pub async fn refresh(&self) -> Result<Arc<OpportunitySet>> {
        let pairs = self.source.fetch().await.inspect_err(|e| {
            warn!(error = %e, "Arbitrage scan failed; keeping previous opportunities");
        })?;
        let set = Arc::new(self.engine.detect_opportunities(&pairs));
        *self.latest.write().await = Arc::clone(&set);
        let stats = set.stats();
        debug!(
            pairs = pairs.len(),
            opportunities = stats.count,
            best_margin = %stats.best_margin,
            "Arbitrage scan complete"
        );
        Ok(set)
    }

    /// Picks an opportunity from the current set if the set is still fresh.
    async fn fresh(&self, pick: impl FnOnce(&OpportunitySet) -> Option<ArbitrageOpportunity>) -> Result<ArbitrageOpportunity> {
        let set = self.latest().await;
        if set.is_stale() {
            return Err(ExecutionError::StaleOpportunities);
        }
        pick(&set).ok_or(ExecutionError::NoOpportunity)
    }

    /// Executes the top-ranked opportunity through the router.
    ///
    /// # Errors
    /// Stale or empty set, payload errors, or submission failure.
    pub async fn execute_best(&self, signer: &dyn TransactionSigner) -> Result<TxReceipt> {
        let opportunity = self.fresh(|set| set.best().cloned()).await?;
        self.execute(signer, &opportunity).await
    }

    /// Executes the opportunity at `rank` (0 is best).
    ///
    /// # Errors
    /// As [`ArbitrageMonitor::execute_best`].
    pub async fn execute_rank(&self, signer: &dyn TransactionSigner, rank: usize) -> Result<TxReceipt> {
        let opportunity = self
            .fresh(|set| set.opportunities().get(rank).cloned())
            .await?;
        self.execute(signer, &opportunity).await
    }

    async fn execute(&self, signer: &dyn TransactionSigner, opportunity: &ArbitrageOpportunity) -> Result<TxReceipt> {
        let request = arbitrage_transaction(opportunity, opportunity.fee_tier, &self.addresses)?;
        match submit(signer, &request).await {
            Ok(receipt) => {
                info!(
                    pair = %opportunity.pair(),
                    direction = %opportunity.direction,
                    amount = %opportunity.recommended_amount,
                    hash = %receipt.hash,
                    "Arbitrage submitted"
                );
                Ok(receipt)
            }
            Err(e) => {
                error!(pair = %opportunity.pair(), error = %e, "Arbitrage execution failed");
                Err(e.into())
            }
        }
    }

    /// Scans every `stale_after` interval until the handle is dropped.
    pub fn start(self: &Arc<Self>) -> RefreshHandle {
        let monitor = Arc::clone(self);
        spawn_every("arbitrage", self.engine.config().stale_after, move || {
            let monitor = Arc::clone(&monitor);
            async move {
                // failures are logged inside refresh
                let _ = monitor.refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use async_trait::async_trait;
    use hybrid_dex_domain::entities::{BookLevel, OrderBookSnapshot, PoolSnapshot, Token};
    use hybrid_dex_domain::enums::FeeTier;
    use hybrid_dex_domain::math::units::to_raw_units;
    use hybrid_dex_pricing::arbitrage::ArbitrageConfig;
    use hybrid_dex_pricing::feed::{FeedError, MarketPairs, StaticSource};
    use hybrid_dex_protocols::client::DryRunSigner;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn pair() -> (PoolSnapshot, OrderBookSnapshot) {
        let apt = Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8);
        let usdc = Token::new("0xbae2::usdc::USDC", "USDC", "USD Coin", 6);
        let pool = PoolSnapshot::new(
            apt.clone(),
            usdc.clone(),
            FeeTier::Low,
            to_raw_units(dec!(1000), 8).unwrap(),
            to_raw_units(dec!(12450), 6).unwrap(),
        )
        .unwrap();
        let book = OrderBookSnapshot::new(
            apt,
            usdc,
            vec![BookLevel::new(dec!(12.47), dec!(50))],
            vec![BookLevel::new(dec!(12.48), dec!(50))],
        )
        .unwrap();
        (pool, book)
    }

    fn monitor(source: Arc<dyn SnapshotSource>, stale_after: Duration) -> ArbitrageMonitor {
        let engine = ArbitrageEngine::new(ArbitrageConfig {
            stale_after,
            ..ArbitrageConfig::default()
        });
        ArbitrageMonitor::new(engine, source, ContractAddresses::default())
    }

    /// Succeeds until switched off.
    struct Flaky {
        up: AtomicBool,
        pairs: MarketPairs,
    }

    #[async_trait]
    impl SnapshotSource for Flaky {
        async fn fetch(&self) -> std::result::Result<MarketPairs, FeedError> {
            if self.up.load(Ordering::SeqCst) {
                Ok(self.pairs.clone())
            } else {
                Err(FeedError::Unavailable("node down".into()))
            }
        }
    }

    #[tokio::test]
    async fn test_refresh_and_execute_best() {
        let source = Arc::new(StaticSource::new(vec![pair()]));
        let monitor = monitor(source, Duration::from_secs(10));
        let set = monitor.refresh().await.unwrap();
        assert_eq!(set.len(), 1);

        let signer = DryRunSigner::new("0xabc");
        monitor.execute_best(&signer).await.unwrap();
        let sent = signer.submitted().await;
        assert_eq!(sent[0].function_name(), "arbitrage_amm_clob");
        assert!(matches!(
            monitor.execute_rank(&signer, 5).await,
            Err(ExecutionError::NoOpportunity)
        ));
    }

    #[tokio::test]
    async fn test_execution_follows_session() {
        let source = Arc::new(StaticSource::new(vec![pair()]));
        let monitor = monitor(source, Duration::from_secs(10));
        monitor.refresh().await.unwrap();

        let wallet = Arc::new(DryRunSigner::new("0xabc"));
        let session = Session::new();
        session.connect(wallet.clone()).await;
        let signer = session.signer().await.unwrap();
        monitor.execute_best(signer.as_ref()).await.unwrap();
        assert_eq!(wallet.submitted().await.len(), 1);

        session.disconnect().await;
        assert!(matches!(session.signer().await, Err(ExecutionError::NotConnected)));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_set() {
        let source = Arc::new(Flaky {
            up: AtomicBool::new(true),
            pairs: vec![pair()],
        });
        let monitor = monitor(Arc::clone(&source) as Arc<dyn SnapshotSource>, Duration::from_secs(10));
        monitor.refresh().await.unwrap();

        source.up.store(false, Ordering::SeqCst);
        assert!(monitor.refresh().await.is_err());
        assert_eq!(monitor.latest().await.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_set_is_not_executed() {
        let source = Arc::new(StaticSource::new(vec![pair()]));
        let monitor = monitor(source, Duration::ZERO);
        monitor.refresh().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let signer = DryRunSigner::new("0xabc");
        assert!(matches!(
            monitor.execute_best(&signer).await,
            Err(ExecutionError::StaleOpportunities)
        ));
        assert!(signer.submitted().await.is_empty());
    }
}
