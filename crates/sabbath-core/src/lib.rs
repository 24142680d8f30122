//! Sabbath Core - Core types for the Digital Sabbath content API
//!
//! This crate provides the fundamental types shared by the store adapters and
//! the HTTP server:
//! - Value and document types for stored records
//! - Declarative schemas and the validator that checks untyped input
//! - Typed entity models and the explicit collection-name table
//! - The serializer that shapes stored records for transport

pub mod models;
pub mod serializer;
pub mod types;

// Re-export commonly used types
pub use models::{BlogPost, Challenge, EbookTest, Entity, EntityKind, Tip};
pub use serializer::{serialize_document, serialize_documents};
pub use types::{Document, DocumentId, FieldError, ValidationError, Value};
