//! Connected account.

use crate::error::{ExecutionError, Result};
use hybrid_dex_protocols::client::TransactionSigner;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Holds the signer of the connected account, if any.
///
/// Callers take their signer from [`Session::signer`], so nothing is sent
/// while disconnected.
#[derive(Default)]
pub struct Session {
    signer: RwLock<Option<Arc<dyn TransactionSigner>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connect(&self, signer: Arc<dyn TransactionSigner>) {
        info!(account = ?signer.address(), "Account connected");
        *self.signer.write().await = Some(signer);
    }

    pub async fn disconnect(&self) {
        if self.signer.write().await.take().is_some() {
            info!("Account disconnected");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.signer.read().await.is_some()
    }

    /// Address of the connected account.
    pub async fn address(&self) -> Option<String> {
        self.signer.read().await.as_ref().and_then(|s| s.address())
    }

    /// # Errors
    /// [`ExecutionError::NotConnected`] without a signer.
    pub async fn signer(&self) -> Result<Arc<dyn TransactionSigner>> {
        self.signer
            .read()
            .await
            .clone()
            .ok_or(ExecutionError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_dex_protocols::client::DryRunSigner;

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let session = Session::new();
        assert!(matches!(session.signer().await, Err(ExecutionError::NotConnected)));

        session.connect(Arc::new(DryRunSigner::new("0xabc"))).await;
        assert!(session.is_connected().await);
        assert_eq!(session.address().await.as_deref(), Some("0xabc"));

        session.disconnect().await;
        assert!(session.address().await.is_none());
    }
}
