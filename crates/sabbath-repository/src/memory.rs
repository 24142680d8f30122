//! In-memory document store

use async_trait::async_trait;
use sabbath_core::{Document, DocumentId, Value};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{DocumentStore, Filter, StoreError, StoreResult};

#[derive(Debug, Default)]
struct State {
    /// Documents per collection, in insertion order
    collections: BTreeMap<String, Vec<Document>>,
    /// Unique fields per collection
    unique: BTreeMap<String, BTreeSet<String>>,
    /// Every id handed out, across all collections
    ids: BTreeSet<DocumentId>,
}

impl State {

    /// First unique field of `collection` that `doc` would duplicate
    fn violation(&self, collection: &str, doc: &Document) -> Option<StoreError> {
        let fields = self.unique.get(collection)?;
        let docs = self.collections.get(collection)?;

        fields.iter().find_map(|field| {
            let value = doc.get(field).filter(|v| !v.is_null())?;
            docs.iter()
                .any(|existing| existing.get(field) == Some(value))
                .then(|| StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value: display_value(value),
                })
        })
    }
}

pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_json().to_string(),
    }
}

/// Process-local document store
///
/// Collections are created on first insert. Uniqueness checks and the insert
/// happen under one write lock, so concurrent duplicate inserts cannot both
/// succeed.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection: &str, mut doc: Document) -> StoreResult<DocumentId> {
        let mut state = self.state.write().await;

        if let Some(err) = state.violation(collection, &doc) {
            return Err(err);
        }

        let mut id = DocumentId::generate();
        while !state.ids.insert(id.clone()) {
            id = DocumentId::generate();
        }
        doc.set_id(id.clone());

        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);

        debug!(collection, %id, "inserted document");
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        let state = self.state.read().await;
        let Some(docs) = state.collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
            .unwrap_or(0))
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;

        if let Some(docs) = state.collections.get(collection) {
            let mut seen: Vec<&Value> = Vec::new();
            for value in docs.iter().filter_map(|d| d.get(field)).filter(|v| !v.is_null()) {
                if seen.contains(&value) {
                    return Err(StoreError::DuplicateKey {
                        collection: collection.to_string(),
                        field: field.to_string(),
                        value: display_value(value),
                    });
                }
                seen.push(value);
            }
        }

        state
            .unique
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string());
        Ok(())
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.collections.keys().cloned().collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
