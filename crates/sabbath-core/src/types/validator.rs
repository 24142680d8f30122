//! Input validation against schemas

use super::schema::{FieldType, Presence, Schema, SchemaField};
use super::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// A single failing field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Required field missing
    #[error("required field missing: {field}")]
    RequiredFieldMissing { field: String },

    /// Type mismatch
    #[error("type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Integer outside its allowed range
    #[error("field '{field}' is out of range: {value} {}", describe_bounds(.min, .max))]
    OutOfRange {
        field: String,
        value: i128,
        min: Option<i64>,
        max: Option<i64>,
    },

    /// String that does not parse as a timestamp
    #[error("field '{field}' is not a valid ISO-8601 timestamp: {value}")]
    InvalidTimestamp { field: String, value: String },

    /// Sequence item of the wrong type
    #[error("field '{field}' item {index}: expected string, got {actual}")]
    InvalidItem {
        field: String,
        index: usize,
        actual: String,
    },
}

impl FieldError {
    /// Name of the field this error is about
    pub fn field(&self) -> &str {
        match self {
            FieldError::RequiredFieldMissing { field }
            | FieldError::TypeMismatch { field, .. }
            | FieldError::OutOfRange { field, .. }
            | FieldError::InvalidTimestamp { field, .. }
            | FieldError::InvalidItem { field, .. } => field,
        }
    }
}

fn describe_bounds(min: &Option<i64>, max: &Option<i64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("(must be between {} and {})", min, max),
        (Some(min), None) => format!("(must be at least {})", min),
        (None, Some(max)) => format!("(must be at most {})", max),
        (None, None) => String::new(),
    }
}

/// Validation error carrying every failing field of one input
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {entity}: {}", join_errors(.errors))]
pub struct ValidationError {
    /// Name of the schema that rejected the input
    pub entity: String,

    /// All failing fields, in schema order
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(entity: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            entity: entity.into(),
            errors,
        }
    }

    /// Single-field error
    pub fn single(entity: impl Into<String>, error: FieldError) -> Self {
        Self::new(entity, vec![error])
    }

    /// Names of the failing fields
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(FieldError::field).collect()
    }
}

/// Validator for untyped input against schemas
///
/// Input fields the schema does not declare are dropped silently.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `input` against `schema`.
    ///
    /// Returns the normalized fields: exactly the schema's fields, defaults
    /// applied, timestamps parsed. Fails with every failing field listed.
    pub fn validate(
        &self,
        input: &serde_json::Value,
        schema: &Schema,
    ) -> Result<BTreeMap<String, Value>, ValidationError> {
        let obj = match input {
            serde_json::Value::Object(obj) => obj,
            other => {
                return Err(ValidationError::single(
                    &schema.name,
                    FieldError::TypeMismatch {
                        field: "root".to_string(),
                        expected: "object".to_string(),
                        actual: json_type_name(other).to_string(),
                    },
                ));
            }
        };

        let mut errors = Vec::new();
        let mut fields = BTreeMap::new();

        for field in &schema.fields {
            match self.validate_field(field, obj.get(&field.name)) {
                Ok(value) => {
                    fields.insert(field.name.clone(), value);
                }
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(ValidationError::new(&schema.name, errors))
        }
    }

    /// Validate a single field, applying its presence rule
    fn validate_field(
        &self,
        field: &SchemaField,
        value: Option<&serde_json::Value>,
    ) -> Result<Value, FieldError> {
        match (value, &field.presence) {
            (None, Presence::Required) => Err(FieldError::RequiredFieldMissing {
                field: field.name.clone(),
            }),
            (Some(serde_json::Value::Null), Presence::Required) => {
                Err(FieldError::RequiredFieldMissing {
                    field: field.name.clone(),
                })
            }
            (None, Presence::Optional) | (Some(serde_json::Value::Null), Presence::Optional) => {
                Ok(Value::Null)
            }
            (None, Presence::Default(default)) => Ok(default.clone()),
            (Some(value), _) => self.check_type(&field.name, value, &field.field_type),
        }
    }

    fn check_type(
        &self,
        name: &str,
        value: &serde_json::Value,
        field_type: &FieldType,
    ) -> Result<Value, FieldError> {
        let mismatch = || FieldError::TypeMismatch {
            field: name.to_string(),
            expected: field_type.type_name().to_string(),
            actual: json_type_name(value).to_string(),
        };

        match field_type {
            FieldType::String => value
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(mismatch),

            FieldType::Integer { min, max } => {
                let out_of_range = |n: i128| FieldError::OutOfRange {
                    field: name.to_string(),
                    value: n,
                    min: *min,
                    max: *max,
                };

                let n = match (value.as_i64(), value.as_u64()) {
                    (Some(n), _) => n,
                    // Positive integers past i64::MAX cannot be stored
                    (None, Some(n)) => return Err(out_of_range(i128::from(n))),
                    (None, None) => return Err(mismatch()),
                };
                let below = min.map(|min| n < min).unwrap_or(false);
                let above = max.map(|max| n > max).unwrap_or(false);
                if below || above {
                    return Err(out_of_range(i128::from(n)));
                }
                Ok(Value::Int(n))
            }

            FieldType::Timestamp => {
                let s = value.as_str().ok_or_else(mismatch)?;
                parse_timestamp(s)
                    .map(Value::Timestamp)
                    .ok_or_else(|| FieldError::InvalidTimestamp {
                        field: name.to_string(),
                        value: s.to_string(),
                    })
            }

            FieldType::StringList => {
                let items = value.as_array().ok_or_else(mismatch)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        item.as_str()
                            .map(|s| Value::String(s.to_string()))
                            .ok_or_else(|| FieldError::InvalidItem {
                                field: name.to_string(),
                                index,
                                actual: json_type_name(item).to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with offset, naive date-times (taken as UTC) and bare
/// dates (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        serde_json::Value::Number(_) => "float",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
