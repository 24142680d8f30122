//! Tests for REST API components

#![cfg(test)]

use super::extractors::{JsonExtractor, QueryExtractor};
use super::types::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn echo_query(QueryExtractor(query): QueryExtractor<ListQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "limit": query.limit, "tag": query.tag }))
}

async fn echo_body(JsonExtractor(body): JsonExtractor<serde_json::Value>) -> Json<serde_json::Value> {
    Json(body)
}

fn echo_router() -> Router {
    Router::new()
        .route("/q", get(echo_query))
        .route("/b", post(echo_body))
}

async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = echo_router().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[test]
fn test_list_query_defaults() {
    let query: ListQuery = serde_json::from_str("{}").unwrap();
    assert!(query.limit.is_none());
    assert!(query.tag.is_none());
}

#[test]
fn test_app_state_flags() {
    let store = std::sync::Arc::new(sabbath_repository::InMemoryStore::new());
    let state = AppState::new(crate::content::ContentService::new(store)).with_database_flags(true, false);

    assert!(state.database_url_set);
    assert!(!state.database_name_set);
}

#[tokio::test]
async fn test_query_extractor_parses() {
    let (status, json) = send(Request::get("/q?limit=5&tag=calm").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["limit"], 5);
    assert_eq!(json["tag"], "calm");
}

#[tokio::test]
async fn test_query_extractor_rejects_bad_limit() {
    let (status, json) = send(Request::get("/q?limit=many").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid query string"));
}

#[tokio::test]
async fn test_json_extractor_rejects_syntax_error() {
    let request = Request::post("/b")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("JSON syntax error"));
}

#[tokio::test]
async fn test_json_extractor_requires_content_type() {
    let (status, json) = send(Request::post("/b").body(Body::from("{}")).unwrap()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing 'Content-Type: application/json' header");
}

#[tokio::test]
async fn test_extractor_rejection_is_invalid_request() {
    use axum::extract::FromRequestParts;

    let (mut parts, _) = Request::get("/q?limit=many").body(Body::empty()).unwrap().into_parts();
    let rejection = QueryExtractor::<ListQuery>::from_request_parts(&mut parts, &())
        .await
        .err()
        .unwrap();

    assert!(matches!(
        rejection,
        crate::error::ServerError::InvalidRequest(ref msg) if msg.starts_with("Invalid query string")
    ));
}
