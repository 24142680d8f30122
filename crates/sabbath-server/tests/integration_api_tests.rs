//! Integration tests for REST API endpoints
//!
//! These tests drive the full router over an in-memory store.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sabbath_core::{Document, DocumentId};
use sabbath_repository::{
    DocumentStore, Filter, InMemoryStore, StoreError, StoreResult, TimeoutStore,
};
use sabbath_server::api::rest::AppState;
use sabbath_server::api::create_router;
use sabbath_server::content::ContentService;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Store whose backend is always unreachable
struct DownStore;

#[async_trait]
impl DocumentStore for DownStore {
    async fn insert(&self, _: &str, _: Document) -> StoreResult<DocumentId> {
        Err(StoreError::StorageUnavailable("connection refused".to_string()))
    }

    async fn find_one(&self, _: &str, _: &Filter) -> StoreResult<Option<Document>> {
        Err(StoreError::StorageUnavailable("connection refused".to_string()))
    }

    async fn find_many(&self, _: &str, _: &Filter, _: Option<usize>) -> StoreResult<Vec<Document>> {
        Err(StoreError::StorageUnavailable("connection refused".to_string()))
    }

    async fn count(&self, _: &str, _: &Filter) -> StoreResult<u64> {
        Err(StoreError::StorageUnavailable("connection refused".to_string()))
    }

    async fn ensure_unique(&self, _: &str, _: &str) -> StoreResult<()> {
        Err(StoreError::StorageUnavailable("connection refused".to_string()))
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        Err(StoreError::StorageUnavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::StorageUnavailable(format!(
            "server selection timeout: {}",
            "x".repeat(200)
        )))
    }

    fn backend_name(&self) -> &'static str {
        "down"
    }
}

async fn memory_router() -> Router {
    let store = Arc::new(TimeoutStore::new(InMemoryStore::new(), Duration::from_secs(5)));
    store.ensure_unique("blogpost", "slug").await.unwrap();
    create_router(AppState::new(ContentService::new(store)))
}

fn down_router() -> Router {
    create_router(AppState::new(ContentService::new(Arc::new(DownStore))))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, request).await
}

fn blogpost(slug: &str, published_at: Option<&str>) -> Value {
    json!({
        "title": format!("Post {}", slug),
        "slug": slug,
        "content": "Body",
        "tags": ["calm"],
        "published_at": published_at,
    })
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = memory_router().await;

    let (status, json) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Digital Sabbath backend running");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = memory_router().await;

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_create_blogpost_returns_full_record() {
    let app = memory_router().await;

    let (status, json) = post(&app, "/api/blogposts", blogpost("intro", None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json["id"].is_string());
    assert_eq!(json["slug"], "intro");
    assert_eq!(json["lang"], "hu");
    assert_eq!(json["tags"], json!(["calm"]));
    assert!(json["published_at"].is_null());
    assert!(json["created_at"].as_str().unwrap().ends_with('Z'));
    assert!(json.get("_id").is_none());
}

#[tokio::test]
async fn test_duplicate_slug_rejected() {
    let app = memory_router().await;

    let (first, _) = post(&app, "/api/blogposts", blogpost("same", None)).await;
    let (second, json) = post(&app, "/api/blogposts", blogpost("same", None)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Slug already exists");

    let (_, list) = get(&app, "/api/blogposts").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_blogpost_by_slug() {
    let app = memory_router().await;
    post(&app, "/api/blogposts", blogpost("found", Some("2024-01-02T03:04:05Z"))).await;

    let (status, json) = get(&app, "/api/blogposts/found").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["published_at"], "2024-01-02T03:04:05Z");
    assert!(json["id"].is_string());

    let (status, json) = get(&app, "/api/blogposts/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_blogposts_sorted_newest_first() {
    let app = memory_router().await;
    post(&app, "/api/blogposts", blogpost("t2", Some("2024-02-01T00:00:00Z"))).await;
    post(&app, "/api/blogposts", blogpost("t1", Some("2024-01-01T00:00:00Z"))).await;
    post(&app, "/api/blogposts", blogpost("t3", Some("2024-03-01T00:00:00Z"))).await;

    let (status, json) = get(&app, "/api/blogposts").await;

    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["t3", "t2", "t1"]);
}

#[tokio::test]
async fn test_tag_filter_and_limit() {
    let app = memory_router().await;
    post(&app, "/api/tips", json!({ "title": "A", "description": "a", "tags": ["x"] })).await;
    post(&app, "/api/tips", json!({ "title": "B", "description": "b", "tags": ["y"] })).await;
    post(&app, "/api/tips", json!({ "title": "C", "description": "c", "tags": ["x", "y"] })).await;

    let (_, tagged) = get(&app, "/api/tips?tag=x").await;
    let titles: Vec<_> = tagged
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["A", "C"]);

    let (_, all) = get(&app, "/api/tips?tag=").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, limited) = get(&app, "/api/tips?limit=2").await;
    assert_eq!(limited.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tag_filter_on_every_collection() {
    let app = memory_router().await;
    let cases = [
        (
            "/api/blogposts",
            json!({ "title": "A", "slug": "a", "content": "c", "tags": ["x"] }),
            json!({ "title": "B", "slug": "b", "content": "c", "tags": ["y"] }),
        ),
        (
            "/api/challenges",
            json!({ "title": "A", "description": "d", "tags": ["x"] }),
            json!({ "title": "B", "description": "d", "tags": ["y"] }),
        ),
        (
            "/api/ebooktests",
            json!({ "title": "A", "tags": ["x"] }),
            json!({ "title": "B", "tags": ["y"] }),
        ),
    ];

    for (uri, tagged, other) in cases {
        let (first, _) = post(&app, uri, tagged).await;
        let (second, _) = post(&app, uri, other).await;
        assert_eq!((first, second), (StatusCode::CREATED, StatusCode::CREATED), "{}", uri);

        let (status, list) = get(&app, &format!("{}?tag=x", uri)).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<_> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["A"], "{}", uri);

        let (_, none) = get(&app, &format!("{}?tag=z", uri)).await;
        assert!(none.as_array().unwrap().is_empty(), "{}", uri);
    }
}

#[tokio::test]
async fn test_invalid_limit_rejected() {
    let app = memory_router().await;

    let (status, json) = get(&app, "/api/challenges?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"][0]["field"], "limit");

    let (status, _) = get(&app, "/api/challenges?limit=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_tip_returns_id_only() {
    let app = memory_router().await;

    let (status, json) = post(&app, "/api/tips", json!({ "title": "Breathe", "description": "Slowly" })).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json.as_object().unwrap().len(), 1);
    assert!(json["id"].is_string());
}

#[tokio::test]
async fn test_challenge_duration_validation() {
    let app = memory_router().await;

    for days in [0, 91] {
        let (status, json) = post(
            &app,
            "/api/challenges",
            json!({ "title": "T", "description": "D", "duration_days": days }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"][0]["field"], "duration_days");
    }

    let (status, json) = post(
        &app,
        "/api/challenges",
        json!({ "title": "T", "description": "D", "duration_days": u64::MAX }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["details"][0]["message"].as_str().unwrap();
    assert!(message.contains("out of range"), "{}", message);

    for days in [1, 90] {
        let (status, _) = post(
            &app,
            "/api/challenges",
            json!({ "title": "T", "description": "D", "duration_days": days }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = get(&app, "/api/challenges").await;
    let days: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["duration_days"].as_i64().unwrap())
        .collect();
    assert_eq!(days, vec![1, 90]);
}

#[tokio::test]
async fn test_validation_reports_every_field() {
    let app = memory_router().await;

    let (status, json) = post(&app, "/api/blogposts", json!({ "tags": "not-a-list" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert!(fields.contains(&"title".to_string()));
    assert!(fields.contains(&"slug".to_string()));
    assert!(fields.contains(&"content".to_string()));
    assert!(fields.contains(&"tags".to_string()));
}

#[tokio::test]
async fn test_ebooktest_defaults() {
    let app = memory_router().await;

    let (status, _) = post(&app, "/api/ebooktests", json!({ "title": "Which book?" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = get(&app, "/api/ebooktests").await;
    let test = &list[0];
    assert_eq!(test["questions"], json!([]));
    assert_eq!(test["recommended_reads"], json!([]));
    assert_eq!(test["lang"], "hu");
}

#[tokio::test]
async fn test_seed_twice() {
    let app = memory_router().await;

    let (status, first) = post(&app, "/api/seed", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first,
        json!({ "inserted": { "blogposts": 2, "tips": 2, "challenges": 2, "ebooktests": 1 } })
    );

    let (_, second) = post(&app, "/api/seed", json!({})).await;
    assert_eq!(
        second,
        json!({ "inserted": { "blogposts": 0, "tips": 0, "challenges": 0, "ebooktests": 0 } })
    );

    let (status, seeded) = get(&app, "/api/blogposts/micro-rituals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded["author"], "אורח");
}

#[tokio::test]
async fn test_diagnostics_connected() {
    let app = memory_router().await;
    post(&app, "/api/tips", json!({ "title": "A", "description": "a" })).await;

    let (status, json) = get(&app, "/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["database"], "✅ Connected & Working");
    assert_eq!(json["connection_status"], "Connected");
    assert_eq!(json["collections"], json!(["tip"]));
    assert_eq!(json["database_url"], "❌ Not Set");
}

#[tokio::test]
async fn test_diagnostics_never_fails() {
    let app = down_router();

    let (status, json) = get(&app, "/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["connection_status"], "Not Connected");
    assert_eq!(json["collections"], json!([]));
    let database = json["database"].as_str().unwrap();
    assert!(database.starts_with("⚠️ "));
    assert_eq!(database.trim_start_matches("⚠️ ").chars().count(), 80);
}

#[tokio::test]
async fn test_storage_unavailable_is_503() {
    let app = down_router();

    let (status, json) = get(&app, "/api/tips").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], 503);

    let (status, _) = post(&app, "/api/blogposts", blogpost("x", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = memory_router().await;

    let request = Request::builder()
        .uri("/")
        .header("origin", "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
