//! Digital Sabbath content API server library
//!
//! Provides the REST API components for testing and reuse.

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod seed;
pub mod store_loader;

use crate::api::rest::AppState;
use crate::config::ServerConfig;
use crate::content::ContentService;
use axum::Router;
use tracing::warn;

/// Build the application router from configuration.
///
/// Creates the document store, declares its constraints and wires the
/// content service into the REST router.
pub async fn build_app(config: &ServerConfig) -> anyhow::Result<Router> {
    let store = store_loader::create_store(&config.store).await?;
    let service = ContentService::new(store);

    // Not fatal: `/test` must still answer with the database down, and the
    // index is retried before the next blog post insert.
    if let Err(e) = service.ensure_slug_index().await {
        warn!(error = %e, "Could not enforce slug uniqueness");
    }

    let state = AppState::new(service).with_database_flags(
        config.store.url.is_some(),
        config.store.database_name.is_some(),
    );

    Ok(api::create_router(state))
}
