//! Copy-on-write stores for workflow records and the token registry.

use hybrid_dex_domain::entities::{Token, WorkflowRequest};
use hybrid_dex_domain::error::Result as DomainResult;
use hybrid_dex_domain::registry::TokenRegistry;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Workflow records, newest first.
///
/// Readers get an `Arc` snapshot; every write replaces the whole list, so a
/// snapshot never changes under its holder.
pub struct WorkflowStore<P> {
    records: RwLock<Arc<Vec<WorkflowRequest<P>>>>,
}

impl<P> Default for WorkflowStore<P> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Arc::new(Vec::new())),
        }
    }
}

impl<P: Clone> WorkflowStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Arc<Vec<WorkflowRequest<P>>> {
        Arc::clone(&*self.records.read().await)
    }

    pub async fn get(&self, id: Uuid) -> Option<WorkflowRequest<P>> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Stores `record`, replacing any record with the same id.
    pub async fn upsert(&self, record: WorkflowRequest<P>) {
        let mut guard = self.records.write().await;
        let mut next: Vec<WorkflowRequest<P>> = Vec::with_capacity(guard.len() + 1);
        next.push(record.clone());
        next.extend(guard.iter().filter(|r| r.id != record.id).cloned());
        *guard = Arc::new(next);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Shared handle on the current [`TokenRegistry`] snapshot.
#[derive(Default)]
pub struct TokenRegistryStore {
    current: RwLock<Arc<TokenRegistry>>,
}

impl TokenRegistryStore {
    pub fn new(registry: TokenRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub async fn snapshot(&self) -> Arc<TokenRegistry> {
        Arc::clone(&*self.current.read().await)
    }

    /// Adds `token` and publishes the new snapshot.
    ///
    /// # Errors
    /// [`DomainError::DuplicateToken`](hybrid_dex_domain::error::DomainError::DuplicateToken)
    /// when the address is already present.
    pub async fn add(&self, token: Token) -> DomainResult<Arc<TokenRegistry>> {
        let mut guard = self.current.write().await;
        let next = Arc::new(guard.add(token)?);
        *guard = Arc::clone(&next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_dex_domain::error::DomainError;

    #[tokio::test]
    async fn test_upsert_keeps_old_snapshots() {
        let store = WorkflowStore::new();
        let mut first = WorkflowRequest::new("a");
        store.upsert(first.clone()).await;
        let before = store.snapshot().await;

        first.fail("boom", None).unwrap();
        store.upsert(first.clone()).await;
        store.upsert(WorkflowRequest::new("b")).await;

        assert_eq!(before.len(), 1);
        assert!(before[0].failure_reason.is_none());
        let after = store.snapshot().await;
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].params, "b");
        assert_eq!(store.get(first.id).await.unwrap().failure_reason.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_registry_store_add() {
        let store = TokenRegistryStore::default();
        let old = store.snapshot().await;
        let token = Token::new("0x1::coin::A", "A", "A", 8);
        let next = store.add(token.clone()).await.unwrap();
        assert!(old.is_empty());
        assert_eq!(next.len(), 1);
        assert_eq!(
            store.add(token).await,
            Err(DomainError::DuplicateToken("0x1::coin::A".to_string()))
        );
        assert_eq!(store.snapshot().await.len(), 1);
    }
}
