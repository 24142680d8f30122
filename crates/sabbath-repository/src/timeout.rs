//! Per-call timeouts for any document store

use async_trait::async_trait;
use sabbath_core::{Document, DocumentId};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::{DocumentStore, Filter, StoreError, StoreResult};

/// Wraps a store so no call can hang the requester.
///
/// A call that does not finish within the timeout fails with
/// [`StoreError::StorageUnavailable`].
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: DocumentStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = StoreResult<T>> + Send,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    backend = self.inner.backend_name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(StoreError::StorageUnavailable(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TimeoutStore<S> {
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<DocumentId> {
        self.bounded("insert", self.inner.insert(collection, doc)).await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.bounded("find_one", self.inner.find_one(collection, filter))
            .await
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        self.bounded("find_many", self.inner.find_many(collection, filter, limit))
            .await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.bounded("count", self.inner.count(collection, filter)).await
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()> {
        self.bounded("ensure_unique", self.inner.ensure_unique(collection, field))
            .await
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.bounded("list_collections", self.inner.list_collections())
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.bounded("ping", self.inner.ping()).await
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    /// Store whose every call sleeps past any reasonable timeout
    struct StalledStore;

    #[async_trait]
    impl DocumentStore for StalledStore {
        async fn insert(&self, _: &str, _: Document) -> StoreResult<DocumentId> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(DocumentId::generate())
        }

        async fn find_one(&self, _: &str, _: &Filter) -> StoreResult<Option<Document>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }

        async fn find_many(&self, _: &str, _: &Filter, _: Option<usize>) -> StoreResult<Vec<Document>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }

        async fn count(&self, _: &str, _: &Filter) -> StoreResult<u64> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(0)
        }

        async fn ensure_unique(&self, _: &str, _: &str) -> StoreResult<()> {
            Ok(())
        }

        async fn list_collections(&self) -> StoreResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn ping(&self) -> StoreResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "stalled"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_call_becomes_unavailable() {
        let store = TimeoutStore::new(StalledStore, Duration::from_millis(50));

        let err = store.find_many("tip", &Filter::new(), None).await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("find_many timed out after 50ms"));

        assert!(store.ping().await.unwrap_err().is_unavailable());
        assert!(store.create("tip", Document::new()).await.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn test_fast_calls_pass_through() {
        let store = TimeoutStore::new(InMemoryStore::new(), Duration::from_secs(1));

        let id = store.create("tip", Document::new()).await.unwrap();
        let doc = store.find_one("tip", &Filter::new()).await.unwrap().unwrap();

        assert_eq!(doc.id(), Some(&id));
        assert!(doc.timestamp("created_at").is_some());
        assert_eq!(store.backend_name(), "memory");
    }
}
