//! Schema definitions for content validation
//!
//! Schemas describe the expected shape of each entity's input: field names,
//! types, presence rules, defaults and range constraints.

use super::value::Value;

/// A schema defines the structure and types of an entity's input
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Schema name
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<SchemaField>,
}

/// How a field may be absent from the input
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// Must be present and non-null
    Required,
    /// May be absent or null; stored as null
    Optional,
    /// Takes the default value when absent
    Default(Value),
}

/// A field in a schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Field name
    pub name: String,

    /// Field type
    pub field_type: FieldType,

    /// Presence rule
    pub presence: Presence,

    /// Optional description
    pub description: Option<String>,
}

/// Field type enumeration
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// String type
    String,

    /// Integer type with optional inclusive bounds
    Integer { min: Option<i64>, max: Option<i64> },

    /// Timestamp given as an ISO-8601 string
    Timestamp,

    /// Ordered sequence of strings
    StringList,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    pub fn add_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }
}

impl SchemaField {
    /// Create a new field; fields start out required
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            presence: Presence::Required,
            description: None,
        }
    }

    /// Allow the field to be absent or null
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Use `default` when the field is absent
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.presence = Presence::Default(default.into());
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl FieldType {
    /// Integer constrained to `[min, max]`
    pub fn integer_in(min: i64, max: i64) -> Self {
        FieldType::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Integer { .. } => "integer",
            FieldType::Timestamp => "timestamp",
            FieldType::StringList => "array of strings",
        }
    }
}
