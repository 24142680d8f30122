//! Transport shaping for stored records
//!
//! The store identifier becomes a public string `id`, timestamps become
//! ISO-8601 strings, everything else passes through. Pure, no side effects.

use crate::types::Document;
use serde_json::{Map, Value as JsonValue};

/// Public name of the store identifier
pub const ID_FIELD: &str = "id";

/// Serialize one stored document.
///
/// An empty document serializes to an empty object.
pub fn serialize_document(doc: &Document) -> JsonValue {
    let mut out: Map<String, JsonValue> = doc
        .fields()
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();

    if let Some(id) = doc.id() {
        out.insert(ID_FIELD.to_string(), JsonValue::String(id.to_string()));
    }

    JsonValue::Object(out)
}

/// Serialize a batch of documents, keeping their order
pub fn serialize_documents(docs: &[Document]) -> Vec<JsonValue> {
    docs.iter().map(serialize_document).collect()
}
