//! Type system for stored content
//!
//! This module contains:
//! - Value and document types
//! - Schema definitions
//! - The schema validator

pub mod schema;
pub mod validator;
pub mod value;

pub use schema::{FieldType, Presence, Schema, SchemaField};
pub use validator::{parse_timestamp, FieldError, ValidationError, Validator};
pub use value::{format_timestamp, Document, DocumentId, Value};
