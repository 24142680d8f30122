//! Content request handling
//!
//! Validation, store access and response shaping for the four content
//! collections. Independent of HTTP so it can be driven directly in tests.

use crate::error::ServerError;
use chrono::{DateTime, Utc};
use sabbath_core::{
    serialize_document, serialize_documents, Document, Entity, EntityKind, FieldError,
    ValidationError,
};
use sabbath_repository::{DocumentStore, Filter, StoreError, CREATED_AT};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Maximum length of a storage error echoed by [`ContentService::diagnostics`]
const DIAGNOSTIC_ERROR_LEN: usize = 80;

/// Storage diagnostics reported by `GET /test`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Handles list / get / create over an injected document store
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn DocumentStore>,
    /// Set once the blog post slug index exists
    slug_index: Arc<OnceCell<()>>,
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            slug_index: Arc::new(OnceCell::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Declare slug uniqueness on the blog post collection.
    ///
    /// Succeeds at most once. A failed attempt (e.g. database down at boot)
    /// is retried by the next call, and every blog post insert makes one.
    pub async fn ensure_slug_index(&self) -> Result<(), StoreError> {
        let collection = EntityKind::BlogPost.collection();
        let store = &self.store;

        self.slug_index
            .get_or_try_init(|| async move {
                store.ensure_unique(collection, "slug").await?;
                info!(collection, "Slug uniqueness enforced");
                Ok::<_, StoreError>(())
            })
            .await
            .map(|_| ())
    }

    /// List documents of `kind`.
    ///
    /// `limit` defaults per kind and must be at least 1. An empty `tag` is
    /// treated as absent. Blog posts come back newest first by
    /// `published_at`, falling back to `created_at`.
    pub async fn list(
        &self,
        kind: EntityKind,
        limit: Option<i64>,
        tag: Option<&str>,
    ) -> Result<Vec<JsonValue>, ServerError> {
        let limit = resolve_limit(kind, limit)?;

        let mut filter = Filter::new();
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            filter = filter.contains("tags", tag);
        }

        let mut docs = self
            .store
            .find_many(kind.collection(), &filter, Some(limit))
            .await?;
        debug!(collection = kind.collection(), count = docs.len(), "listed documents");

        if kind == EntityKind::BlogPost {
            sort_newest_first(&mut docs);
        }

        Ok(serialize_documents(&docs))
    }

    /// Fetch one blog post by slug
    pub async fn get_blogpost(&self, slug: &str) -> Result<JsonValue, ServerError> {
        let collection = EntityKind::BlogPost.collection();

        self.store
            .find_one(collection, &Filter::new().eq("slug", slug))
            .await?
            .map(|doc| serialize_document(&doc))
            .ok_or_else(|| ServerError::NotFound(format!("blog post '{}'", slug)))
    }

    /// Validate untyped input as `kind` and store it
    pub async fn create(&self, kind: EntityKind, input: &JsonValue) -> Result<JsonValue, ServerError> {
        let entity = Entity::validate(kind, input)?;
        self.create_entity(entity).await
    }

    /// Store an already validated entity.
    ///
    /// Blog posts return the full stored record; other kinds return `{"id"}`.
    pub async fn create_entity(&self, entity: Entity) -> Result<JsonValue, ServerError> {
        let kind = entity.kind();
        let collection = kind.collection();
        let slug = entity.slug().map(str::to_string);

        if let Some(slug) = &slug {
            if let Err(e) = self.ensure_slug_index().await {
                warn!(collection, error = %e, "Slug index still missing");
            }

            let by_slug = Filter::new().eq("slug", slug.as_str());
            if self.store.find_one(collection, &by_slug).await?.is_some() {
                return Err(ServerError::DuplicateKey("Slug already exists".to_string()));
            }
        }

        let id = self
            .store
            .create(collection, entity.into_document())
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey { field, .. } if field == "slug" => {
                    ServerError::DuplicateKey("Slug already exists".to_string())
                }
                other => other.into(),
            })?;
        info!(collection, %id, "created document");

        if let Some(slug) = slug {
            let stored = self
                .store
                .find_one(collection, &Filter::new().eq("slug", slug))
                .await?;
            if let Some(doc) = stored {
                return Ok(serialize_document(&doc));
            }
        }

        Ok(json!({ "id": id.as_str() }))
    }

    /// Storage diagnostics; never fails.
    ///
    /// `database_url` / `database_name` report whether the store was
    /// configured with them, not their values.
    pub async fn diagnostics(&self, url_set: bool, name_set: bool) -> Diagnostics {
        let set = |flag: bool| if flag { "✅ Set" } else { "❌ Not Set" }.to_string();

        let mut report = Diagnostics {
            backend: "✅ Running".to_string(),
            database: "❌ Not Available".to_string(),
            database_url: set(url_set),
            database_name: set(name_set),
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        };

        let reachable = async {
            self.store.ping().await?;
            self.store.list_collections().await
        };

        match reachable.await {
            Ok(collections) => {
                report.database = "✅ Connected & Working".to_string();
                report.connection_status = "Connected".to_string();
                report.collections = collections;
            }
            Err(e) => {
                let message: String = e.to_string().chars().take(DIAGNOSTIC_ERROR_LEN).collect();
                report.database = format!("⚠️ {}", message);
            }
        }

        report
    }
}

fn resolve_limit(kind: EntityKind, limit: Option<i64>) -> Result<usize, ServerError> {
    let limit = limit.unwrap_or_else(|| kind.default_limit());
    if limit < 1 {
        let error = FieldError::OutOfRange {
            field: "limit".to_string(),
            value: i128::from(limit),
            min: Some(1),
            max: None,
        };
        return Err(ValidationError::single("query", error).into());
    }
    Ok(usize::try_from(limit).unwrap_or(usize::MAX))
}

/// Sort key: `published_at`, else `created_at`; documents with neither sort last
fn recency(doc: &Document) -> Option<DateTime<Utc>> {
    doc.timestamp("published_at")
        .or_else(|| doc.timestamp(CREATED_AT))
}

fn sort_newest_first(docs: &mut [Document]) {
    // Stable, so documents with equal keys keep store order.
    docs.sort_by_key(|doc| Reverse(recency(doc)));
}
