//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sabbath_core::ValidationError;
use sabbath_repository::StoreError;
use serde_json::json;
use std::fmt;

/// Server error type
#[derive(Debug)]
pub enum ServerError {
    /// Input failed schema validation
    Validation(ValidationError),

    /// Uniqueness violation (e.g. blog post slug already taken)
    DuplicateKey(String),

    /// Not found
    NotFound(String),

    /// Invalid request (bad body or query string)
    InvalidRequest(String),

    /// Document store unreachable or timed out
    StorageUnavailable(String),

    /// Internal server error
    InternalError(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_)
            | ServerError::DuplicateKey(_)
            | ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Validation(err) => write!(f, "Validation error: {}", err),
            ServerError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            ServerError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ServerError::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            ServerError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ServerError::Validation(err) => {
                let details: Vec<_> = err
                    .errors
                    .iter()
                    .map(|e| json!({ "field": e.field(), "message": e.to_string() }))
                    .collect();
                json!({
                    "error": err.to_string(),
                    "status": status.as_u16(),
                    "details": details,
                })
            }
            ServerError::DuplicateKey(msg)
            | ServerError::NotFound(msg)
            | ServerError::InvalidRequest(msg)
            | ServerError::StorageUnavailable(msg)
            | ServerError::InternalError(msg) => json!({
                "error": msg,
                "status": status.as_u16(),
            }),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", body["error"]);
        }

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        ServerError::Validation(err)
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StorageUnavailable(msg) => ServerError::StorageUnavailable(msg),
            StoreError::DuplicateKey { field, value, .. } => {
                ServerError::DuplicateKey(format!("{} '{}' already exists", field, value))
            }
            other => ServerError::InternalError(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::InternalError(err.to_string())
    }
}
