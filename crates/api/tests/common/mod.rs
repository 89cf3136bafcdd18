#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use crm_api::config::{BackendConfig, ServerConfig};
use crm_api::router::build_app_router;
use crm_api::state::AppState;
use crm_db::memory::MemoryBackend;
use crm_db::seed::load_seed;
use crm_db::SharedBackend;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        backend: BackendConfig::Memory { seed_file: None },
    }
}

/// Build the full application router over the given backend.
///
/// Uses the same middleware stack as `main.rs`.
pub fn build_test_app(backend: SharedBackend) -> Router {
    let config = test_config();
    let state = AppState::new(backend, config.clone());
    build_app_router(state, &config)
}

/// A fresh memory backend loaded with `document`.
pub async fn seeded_backend(document: Value) -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    load_seed(&backend, &document).await.unwrap();
    backend
}

/// Companies `Acme` (id 1, Tech) and `Globex` (id 2, Finance).
pub async fn acme_and_globex() -> Arc<MemoryBackend> {
    seeded_backend(serde_json::json!({
        "companies": [
            {"Id": 1, "Name": "Acme", "Industry": "Tech", "EmployeeCount": 10,
             "AnnualRevenue": 500, "createdAt": "2024-01-01T00:00:00Z"},
            {"Id": 2, "Name": "Globex", "Industry": "Finance", "EmployeeCount": 20,
             "AnnualRevenue": 1500, "createdAt": "2024-02-01T00:00:00Z"}
        ]
    }))
    .await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
