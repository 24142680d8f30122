//! API endpoint handlers
//!
//! Thin HTTP adapters over [`ContentService`](crate::content::ContentService).

use super::extractors::{JsonExtractor, QueryExtractor};
use super::types::*;
use crate::content::Diagnostics;
use crate::error::ServerError;
use crate::seed::{seed_demo, SeedReport};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sabbath_core::EntityKind;
use serde_json::Value as JsonValue;
use tracing::info;

type Created = (StatusCode, Json<JsonValue>);

/// Root endpoint
pub(super) async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Digital Sabbath backend running".to_string(),
    })
}

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Storage diagnostics; always 200
pub(super) async fn diagnostics(State(state): State<AppState>) -> Json<Diagnostics> {
    Json(
        state
            .service
            .diagnostics(state.database_url_set, state.database_name_set)
            .await,
    )
}

async fn list(
    state: &AppState,
    kind: EntityKind,
    query: ListQuery,
) -> Result<Json<Vec<JsonValue>>, ServerError> {
    let docs = state
        .service
        .list(kind, query.limit, query.tag.as_deref())
        .await?;
    Ok(Json(docs))
}

async fn create(state: &AppState, kind: EntityKind, payload: JsonValue) -> Result<Created, ServerError> {
    let created = state.service.create(kind, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn list_blogposts(
    State(state): State<AppState>,
    QueryExtractor(query): QueryExtractor<ListQuery>,
) -> Result<Json<Vec<JsonValue>>, ServerError> {
    list(&state, EntityKind::BlogPost, query).await
}

pub(super) async fn get_blogpost(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<JsonValue>, ServerError> {
    Ok(Json(state.service.get_blogpost(&slug).await?))
}

#[axum::debug_handler]
pub(super) async fn create_blogpost(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<JsonValue>,
) -> Result<Created, ServerError> {
    create(&state, EntityKind::BlogPost, payload).await
}

pub(super) async fn list_tips(
    State(state): State<AppState>,
    QueryExtractor(query): QueryExtractor<ListQuery>,
) -> Result<Json<Vec<JsonValue>>, ServerError> {
    list(&state, EntityKind::Tip, query).await
}

pub(super) async fn create_tip(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<JsonValue>,
) -> Result<Created, ServerError> {
    create(&state, EntityKind::Tip, payload).await
}

pub(super) async fn list_challenges(
    State(state): State<AppState>,
    QueryExtractor(query): QueryExtractor<ListQuery>,
) -> Result<Json<Vec<JsonValue>>, ServerError> {
    list(&state, EntityKind::Challenge, query).await
}

pub(super) async fn create_challenge(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<JsonValue>,
) -> Result<Created, ServerError> {
    create(&state, EntityKind::Challenge, payload).await
}

pub(super) async fn list_ebooktests(
    State(state): State<AppState>,
    QueryExtractor(query): QueryExtractor<ListQuery>,
) -> Result<Json<Vec<JsonValue>>, ServerError> {
    list(&state, EntityKind::EbookTest, query).await
}

pub(super) async fn create_ebooktest(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<JsonValue>,
) -> Result<Created, ServerError> {
    create(&state, EntityKind::EbookTest, payload).await
}

/// Insert demo content into empty collections
pub(super) async fn seed(State(state): State<AppState>) -> Result<Json<SeedReport>, ServerError> {
    let report = seed_demo(&state.service).await?;
    info!(total = report.total(), "Seed completed");
    Ok(Json(report))
}
