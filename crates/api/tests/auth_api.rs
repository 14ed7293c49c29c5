//! HTTP-level integration tests for login, logout, and session handling.

mod common;

use axum::extract::ws::Message;
use axum::http::StatusCode;
use common::{body_json, get, get_auth, login_admin, post_auth, post_json};
use vidu_api::auth::jwt::validate_token;
use vidu_api::ws::SocketSession;

async fn attempt(app: axum::Router, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_login_returns_token_and_user() {
    let app = common::build_test_app().await;
    let (status, json) = attempt(app.router.clone(), "admin", "123456").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["username"], "admin");
    assert_eq!(json["user"]["role"], "ADMIN");
    let permissions = json["user"]["permissions"].as_array().unwrap();
    assert!(permissions.iter().any(|p| p == "SYS_ADMIN"));
}

#[tokio::test]
async fn login_marks_workspace_logged_in() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let workspace = body_json(get_auth(app.router, "/api/v1/workspace", &token).await).await;
    assert_eq!(workspace["logged_in"], true);
}

#[tokio::test]
async fn wrong_credentials_get_the_same_401() {
    let app = common::build_test_app().await;

    for (username, password) in [("admin", "654321"), ("nobody", "123456"), ("", "")] {
        let (status, json) = attempt(app.router.clone(), username, password).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{username}/{password}");
        assert_eq!(json["error"], "用户名或密码错误");
    }
}

#[tokio::test]
async fn account_without_password_cannot_log_in() {
    let app = common::build_test_app().await;
    let (status, json) = attempt(app.router, "Editor01", "123456").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "用户名或密码错误");
}

#[tokio::test]
async fn inactive_account_is_forbidden() {
    let app = common::build_test_app().await;
    let (status, json) = attempt(app.router, "Guest", "anything").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn protected_route_requires_token() {
    let app = common::build_test_app().await;
    let response = get(app.router, "/api/v1/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = common::build_test_app().await;
    let response = get_auth(app.router, "/api/v1/auth/me", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_current_user() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let response = get_auth(app.router, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "admin");
    assert_eq!(json["email"], "admin@vidustudio.com");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let response = post_auth(app.router.clone(), "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.router.clone(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A fresh login still works and the workspace starts over.
    let token = login_admin(app.router.clone()).await;
    let workspace = body_json(get_auth(app.router, "/api/v1/workspace", &token).await).await;
    assert_eq!(workspace["current_tab"], "PROJECTS");
    assert!(workspace["current_project_id"].is_null());
}

// ---------------------------------------------------------------------------
// Event socket
// ---------------------------------------------------------------------------

#[tokio::test]
async fn event_socket_requires_a_token() {
    let app = common::build_test_app().await;

    let response = get(app.router.clone(), "/api/v1/ws").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get(app.router, "/api/v1/ws?token=not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn event_socket_rejects_a_logged_out_token() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let uri = format!("/api/v1/ws?token={token}");

    // A live session passes the gate; the plain request then fails the upgrade.
    let response = get(app.router.clone(), &uri).await;
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);

    post_auth(app.router.clone(), "/api/v1/auth/logout", &token).await;
    let response = get(app.router, &uri).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_hangs_up_the_sessions_sockets() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let other = login_admin(app.router.clone()).await;
    let jwt = &common::test_config().jwt;

    let claims = validate_token(&token, jwt).unwrap();
    let mut mine = app
        .state
        .ws_manager
        .register("conn-1".into(), SocketSession { jti: claims.jti, user_id: claims.sub })
        .await;
    let claims = validate_token(&other, jwt).unwrap();
    let mut theirs = app
        .state
        .ws_manager
        .register("conn-2".into(), SocketSession { jti: claims.jti, user_id: claims.sub })
        .await;

    post_auth(app.router, "/api/v1/auth/logout", &token).await;

    assert!(matches!(mine.recv().await, Some(Message::Close(Some(_)))));
    assert!(theirs.try_recv().is_err());
    assert_eq!(app.state.ws_manager.connection_count().await, 1);
}
