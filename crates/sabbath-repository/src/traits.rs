//! Core trait definition for document stores
//!
//! [`DocumentStore`] is the seam between request handling and storage. The
//! server only ever holds an `Arc<dyn DocumentStore>`, so backends can be
//! swapped by configuration:
//!
//! - [`InMemoryStore`](crate::InMemoryStore): process-local, for development and tests
//! - `MongoStore` (feature `mongodb`): MongoDB collections
//! - [`TimeoutStore`](crate::TimeoutStore): bounds every call of another store
//!
//! # Examples
//!
//! ```no_run
//! use sabbath_core::Document;
//! use sabbath_repository::{DocumentStore, Filter, InMemoryStore};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = InMemoryStore::new();
//!
//! let id = store
//!     .create("tip", Document::new().with_field("title", "Breathe"))
//!     .await?;
//!
//! let found = store
//!     .find_one("tip", &Filter::new().eq("title", "Breathe"))
//!     .await?;
//! assert_eq!(found.and_then(|d| d.id().cloned()), Some(id));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sabbath_core::{Document, DocumentId};
use std::sync::Arc;

use crate::{Filter, StoreResult};

/// Field stamped with the insertion time by [`DocumentStore::create`]
pub const CREATED_AT: &str = "created_at";

/// Field stamped alongside [`CREATED_AT`]
pub const UPDATED_AT: &str = "updated_at";

/// Document store over named collections
///
/// # Implementation Notes
///
/// - All operations are async for non-blocking I/O
/// - An unreachable backend fails every operation with
///   [`StoreError::StorageUnavailable`](crate::StoreError::StorageUnavailable)
/// - `find_many` makes no ordering promise; callers sort
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its newly assigned identifier.
    ///
    /// Any identifier already set on `doc` is discarded; the store never
    /// reuses or overwrites an existing identifier.
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<DocumentId>;

    /// First document matching `filter`
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Documents matching `filter`, at most `limit` of them
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>>;

    /// Number of documents matching `filter`
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Enforce uniqueness of `field` within `collection` on every later insert.
    ///
    /// Idempotent. Documents without the field (or with null) are exempt.
    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()>;

    /// Names of the collections that currently exist
    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Check that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name for diagnostics
    fn backend_name(&self) -> &'static str;

    /// Stamp `created_at` / `updated_at` and insert
    async fn create(&self, collection: &str, mut doc: Document) -> StoreResult<DocumentId> {
        let now = Utc::now();
        doc.insert(CREATED_AT, now);
        doc.insert(UPDATED_AT, now);
        self.insert(collection, doc).await
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<DocumentId> {
        (**self).insert(collection, doc).await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        (**self).find_one(collection, filter).await
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        (**self).find_many(collection, filter, limit).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        (**self).count(collection, filter).await
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()> {
        (**self).ensure_unique(collection, field).await
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        (**self).list_collections().await
    }

    async fn ping(&self) -> StoreResult<()> {
        (**self).ping().await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn create(&self, collection: &str, doc: Document) -> StoreResult<DocumentId> {
        (**self).create(collection, doc).await
    }
}
