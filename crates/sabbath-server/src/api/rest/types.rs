//! REST API type definitions
//!
//! Request and response types for the REST API endpoints.

use crate::content::ContentService;
use serde::{Deserialize, Serialize};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: ContentService,

    /// Whether a database URL was configured (reported by `/test`)
    pub database_url_set: bool,

    /// Whether a database name was configured (reported by `/test`)
    pub database_name_set: bool,
}

impl AppState {
    pub fn new(service: ContentService) -> Self {
        Self {
            service,
            database_url_set: false,
            database_name_set: false,
        }
    }

    pub fn with_database_flags(mut self, url_set: bool, name_set: bool) -> Self {
        self.database_url_set = url_set;
        self.database_name_set = name_set;
        self
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Root endpoint response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query string accepted by every list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Maximum number of documents (defaults per collection)
    #[serde(default)]
    pub limit: Option<i64>,

    /// Only documents whose `tags` contain this value
    #[serde(default)]
    pub tag: Option<String>,
}
