//! REST API implementation
//!
//! - types: Request/response type definitions and application state
//! - extractors: Custom request extractors with JSON error bodies
//! - handlers: API endpoint handlers
//! - router: Router creation and configuration
//! - tests: Unit tests for all components

mod extractors;
mod handlers;
mod router;
mod tests;
pub mod types;

// Re-export public API
pub use extractors::{JsonExtractor, QueryExtractor};
pub use router::create_router;
pub use types::{AppState, HealthResponse, ListQuery, MessageResponse};
