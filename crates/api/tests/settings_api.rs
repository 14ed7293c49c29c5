//! HTTP-level integration tests for agent settings and the back-office
//! chatbot.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, get_auth, login_admin, post_json_auth, put_json_auth};
use serde_json::json;

#[tokio::test]
async fn options_list_every_key() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let options = body_json(get_auth(app.router, "/api/v1/settings/options", &token).await).await;
    assert_eq!(options["keys"].as_array().unwrap().len(), 15);
    assert!(options["models"].as_array().unwrap().iter().any(|m| m == "Gemini 2.5 Flash"));
}

#[tokio::test]
async fn save_merges_submitted_keys() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let before = body_json(get_auth(app.router.clone(), "/api/v1/settings", &token).await).await;

    let response = put_json_auth(
        app.router.clone(),
        "/api/v1/settings",
        json!({ "worldview": { "model": "Gemini 2.5 Flash", "prompt": "赛博朋克", "enabled": false } }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = body_json(get_auth(app.router, "/api/v1/settings", &token).await).await;
    assert_eq!(after["worldview"]["enabled"], false);
    assert_eq!(after["worldview"]["prompt"], "赛博朋克");
    assert_eq!(after["script"], before["script"]);
}

#[tokio::test]
async fn invalid_entry_saves_nothing() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let before = body_json(get_auth(app.router.clone(), "/api/v1/settings", &token).await).await;

    let response = put_json_auth(
        app.router.clone(),
        "/api/v1/settings",
        json!({
            "script": { "model": "Gemini 2.5 Flash", "prompt": "标准", "enabled": true },
            "storyboard": { "model": "GPT-9", "prompt": "标准", "enabled": true },
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = body_json(get_auth(app.router, "/api/v1/settings", &token).await).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn preset_keeps_models_and_switches() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let before = body_json(get_auth(app.router.clone(), "/api/v1/settings", &token).await).await;

    let response = post_json_auth(
        app.router,
        "/api/v1/settings/preset",
        json!({ "preset": "REAL" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let after = body_json(response).await;

    for (key, setting) in before.as_object().unwrap() {
        assert_eq!(after[key]["model"], setting["model"], "{key}");
        assert_eq!(after[key]["enabled"], setting["enabled"], "{key}");
    }
}

// ---------------------------------------------------------------------------
// Chatbot
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn chat_reply_arrives_after_delay() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let messages = body_json(get_auth(app.router.clone(), "/api/v1/admin/chat/messages", &token).await).await;
    assert_eq!(messages.as_array().unwrap().len(), 1);

    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/admin/chat/messages",
        json!({ "text": "你好" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let messages = body_json(get_auth(app.router.clone(), "/api/v1/admin/chat/messages", &token).await).await;
    assert_eq!(messages.as_array().unwrap().len(), 2);

    tokio::time::sleep(Duration::from_millis(1001)).await;

    let messages = body_json(get_auth(app.router, "/api/v1/admin/chat/messages", &token).await).await;
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["text"], "这是一个模拟回复。AI 正在思考...");
}

#[tokio::test]
async fn blank_chat_message_is_rejected() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let response = post_json_auth(
        app.router,
        "/api/v1/admin/chat/messages",
        json!({ "text": "  " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
