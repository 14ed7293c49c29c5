#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vidu_api::auth::jwt::JwtConfig;
use vidu_api::auth::password::hash_password;
use vidu_api::config::{GenerationConfig, ServerConfig};
use vidu_api::router::build_app_router;
use vidu_api::state::AppState;
use vidu_core::users::DEFAULT_PASSWORD;
use vidu_db::{create_store, seed_defaults};
use vidu_pipeline::{FixedOutcome, OutcomeProvider};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        generation: GenerationConfig::default(),
        gemini_api_key: None,
    }
}

/// The router plus the state behind it, so tests can inspect the store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Build the full application over a freshly seeded store. Shot renders
/// always succeed.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(FixedOutcome::success()).await
}

/// Same as [`build_test_app`] with a chosen render outcome.
pub async fn build_test_app_with(outcome: impl OutcomeProvider + 'static) -> TestApp {
    let config = test_config();
    let store = create_store();
    let hash = hash_password(DEFAULT_PASSWORD).expect("hashing should succeed");
    seed_defaults(&store, &hash).await.expect("seeding should succeed");

    let state = AppState::new(store, config.clone(), Arc::new(outcome));
    let router = build_app_router(state.clone(), &config);
    TestApp { router, state }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional JSON body and bearer token.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
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
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Log in and return the access token.
pub async fn login(app: Router, username: &str, password: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Log in as the seeded administrator.
pub async fn login_admin(app: Router) -> String {
    login(app, "admin", DEFAULT_PASSWORD).await
}
