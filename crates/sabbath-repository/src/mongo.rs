//! MongoDB document store

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use sabbath_core::{Document, DocumentId, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::filter::Predicate;
use crate::{DocumentStore, Filter, StoreError, StoreResult};

/// MongoDB server error code for unique index violations
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Document store backed by a MongoDB database
///
/// Identifiers are `ObjectId`s rendered as hex strings; timestamps are stored
/// as BSON datetimes (millisecond precision).
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to `url` and use `database_name`.
    ///
    /// `timeout` bounds server selection and connection establishment.
    ///
    /// # Example
    /// ```no_run
    /// use sabbath_repository::MongoStore;
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let store = MongoStore::connect("mongodb://localhost:27017", "sabbath", Duration::from_secs(5)).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(url: &str, database_name: &str, timeout: Duration) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(url).await.map_err(map_error)?;
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);
        options.app_name = Some("sabbath-server".to_string());

        let client = Client::with_options(options).map_err(map_error)?;
        let database = client.database(database_name);
        info!(database = database_name, "MongoDB client created");

        Ok(Self { database })
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.database.collection::<bson::Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<DocumentId> {
        let oid = ObjectId::new();
        let mut record = to_bson_document(doc);
        record.insert("_id", oid);

        self.collection(collection)
            .insert_one(record, None)
            .await
            .map_err(|e| map_write_error(e, collection))?;

        debug!(collection, id = %oid, "inserted document");
        Ok(DocumentId::new(oid.to_hex()))
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(to_bson_filter(filter), None)
            .await
            .map_err(map_error)?;

        Ok(found.map(from_bson_document))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        let mut options = FindOptions::default();
        options.limit = limit.map(|l| l.min(i64::MAX as usize) as i64);

        let cursor = self
            .collection(collection)
            .find(to_bson_filter(filter), options)
            .await
            .map_err(map_error)?;
        let records: Vec<bson::Document> = cursor.try_collect().await.map_err(map_error)?;

        Ok(records.into_iter().map(from_bson_document).collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.collection(collection)
            .count_documents(to_bson_filter(filter), None)
            .await
            .map_err(map_error)
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut keys = bson::Document::new();
        keys.insert(field, 1i32);

        // Only string values take part, so documents lacking the field never collide.
        let mut partial = bson::Document::new();
        partial.insert(field, doc! { "$type": "string" });

        let options = IndexOptions::builder()
            .unique(true)
            .name(format!("{}_unique", field))
            .partial_filter_expression(partial)
            .build();
        let model = IndexModel::builder().keys(keys).options(options).build();

        self.collection(collection)
            .create_index(model, None)
            .await
            .map_err(|e| map_write_error(e, collection))?;

        info!(collection, field, "unique index ensured");
        Ok(())
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.database
            .list_collection_names(None)
            .await
            .map_err(map_error)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

fn map_error(err: mongodb::error::Error) -> StoreError {
    match *err.kind {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => StoreError::StorageUnavailable(err.to_string()),
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            StoreError::InvalidDocument(err.to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

fn map_write_error(err: mongodb::error::Error, collection: &str) -> StoreError {
    let duplicate_message = match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY_CODE => {
            Some(e.message.clone())
        }
        ErrorKind::Command(ref e) if e.code == DUPLICATE_KEY_CODE => Some(e.message.clone()),
        _ => None,
    };

    match duplicate_message {
        Some(message) => StoreError::DuplicateKey {
            collection: collection.to_string(),
            field: duplicate_field(&message).unwrap_or_default(),
            value: message,
        },
        None => map_error(err),
    }
}

/// Field name from a server message such as
/// `E11000 duplicate key error collection: db.blogpost index: slug_unique dup key: ...`
fn duplicate_field(message: &str) -> Option<String> {
    let index = message.split("index: ").nth(1)?.split_whitespace().next()?;
    Some(index.trim_end_matches("_unique").to_string())
}

fn to_bson_filter(filter: &Filter) -> bson::Document {
    let clauses: Vec<Bson> = filter
        .clauses()
        .iter()
        .map(|(field, predicate)| {
            let mut clause = bson::Document::new();
            match predicate {
                Predicate::Eq(value) => {
                    clause.insert(field.as_str(), to_bson(value));
                }
                Predicate::AnyOf(values) => {
                    let set: Vec<Bson> = values.iter().map(to_bson).collect();
                    clause.insert(field.as_str(), doc! { "$in": set });
                }
            }
            Bson::Document(clause)
        })
        .collect();

    if clauses.is_empty() {
        bson::Document::new()
    } else {
        doc! { "$and": clauses }
    }
}

fn to_bson_document(doc: Document) -> bson::Document {
    doc.into_fields()
        .into_iter()
        .map(|(name, value)| {
            let value = to_bson(&value);
            (name, value)
        })
        .collect()
}

fn from_bson_document(mut record: bson::Document) -> Document {
    let id = record.remove("_id").map(|id| match id {
        Bson::ObjectId(oid) => DocumentId::new(oid.to_hex()),
        Bson::String(s) => DocumentId::new(s),
        other => DocumentId::new(other.to_string()),
    });

    let doc: Document = record
        .into_iter()
        .map(|(name, value)| (name, from_bson(value)))
        .collect();

    match id {
        Some(id) => doc.with_id(id),
        None => doc,
    }
}

fn to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Int(i) => Bson::Int64(*i),
        Value::Float(f) => Bson::Double(*f),
        Value::String(s) => Bson::String(s.clone()),
        Value::Timestamp(ts) => Bson::DateTime(bson::DateTime::from_millis(ts.timestamp_millis())),
        Value::Array(items) => Bson::Array(items.iter().map(to_bson).collect()),
        Value::Object(map) => Bson::Document(
            map.iter()
                .map(|(k, v)| (k.clone(), to_bson(v)))
                .collect(),
        ),
    }
}

fn from_bson(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::Int(i64::from(i)),
        Bson::Int64(i) => Value::Int(i),
        Bson::Double(f) => Value::Float(f),
        Bson::String(s) => Value::String(s),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Utc
            .timestamp_millis_opt(dt.timestamp_millis())
            .single()
            .map(Value::Timestamp)
            .unwrap_or(Value::Null),
        Bson::Array(items) => Value::Array(items.into_iter().map(from_bson).collect()),
        Bson::Document(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, from_bson(v))).collect())
        }
        other => Value::from(other.into_relaxed_extjson()),
    }
}
