//! HTTP-level integration tests for episodes, shot renders, the error log,
//! and export to the editor. Render delays run on paused time.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, login_admin, post_auth, post_json_auth, put_json_auth,
};
use serde_json::{json, Value};
use vidu_pipeline::FixedOutcome;

async fn first_episode(app: &common::TestApp, token: &str) -> i64 {
    let episodes = body_json(get_auth(app.router.clone(), "/api/v1/episodes", token).await).await;
    episodes[0]["id"].as_i64().unwrap()
}

async fn add_shot(app: &common::TestApp, token: &str, episode_id: i64, description: &str) -> Value {
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/shots"),
        json!({ "description": description }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn episode(app: &common::TestApp, token: &str, episode_id: i64) -> Value {
    body_json(get_auth(app.router.clone(), &format!("/api/v1/episodes/{episode_id}"), token).await).await
}

// ---------------------------------------------------------------------------
// Episodes and shots
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_episodes_start_empty() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let episodes = body_json(get_auth(app.router, "/api/v1/episodes", &token).await).await;
    let episodes = episodes.as_array().unwrap();
    assert_eq!(episodes.len(), 3);
    assert!(episodes.iter().all(|e| e["shots"].as_array().unwrap().is_empty()));
}

#[tokio::test]
async fn new_shot_is_pending_with_default_duration() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;

    let shot = add_shot(&app, &token, episode_id, "雨夜街头").await;
    assert_eq!(shot["status"], "PENDING");
    assert_eq!(shot["duration"], 5.0);
    assert!(shot["video_url"].is_null());
}

#[tokio::test]
async fn invalid_shot_duration_is_rejected() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;

    let response = post_json_auth(
        app.router,
        &format!("/api/v1/episodes/{episode_id}/shots"),
        json!({ "description": "x", "duration": -1.0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn storyboard_splits_the_script_into_shots() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;

    // Nothing to split yet.
    let response = post_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/storyboard"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["started"], false);

    put_json_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/script"),
        json!({ "script_content": "[画面 001]\n雨夜街头\n\n[画面 002]\n霓虹酒吧" }),
        &token,
    )
    .await;

    let response = post_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/storyboard"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(2001)).await;

    let episode = episode(&app, &token, episode_id).await;
    let shots = episode["shots"].as_array().unwrap();
    assert_eq!(shots.len(), 2);
    assert_eq!(shots[0]["description"], "雨夜街头");
    assert_eq!(shots[1]["description"], "霓虹酒吧");
}

// ---------------------------------------------------------------------------
// Renders
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn shot_render_goes_pending_generating_completed() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;
    let shot = add_shot(&app, &token, episode_id, "雨夜街头").await;
    let shot_id = shot["id"].as_i64().unwrap();

    let response = post_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/shots/{shot_id}/generate"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(episode(&app, &token, episode_id).await["shots"][0]["status"], "GENERATING");

    let in_flight = body_json(get_auth(app.router.clone(), "/api/v1/generations", &token).await).await;
    assert_eq!(in_flight, json!([{ "kind": "shot", "id": shot_id }]));

    tokio::time::sleep(Duration::from_millis(3001)).await;

    let shot = &episode(&app, &token, episode_id).await["shots"][0];
    assert_eq!(shot["status"], "COMPLETED");
    assert!(shot["video_url"].is_string());
    assert_eq!(shot["video_versions"].as_array().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_render_is_logged() {
    let app = common::build_test_app_with(FixedOutcome::failure()).await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;
    let shot = add_shot(&app, &token, episode_id, "雨夜街头").await;
    let shot_id = shot["id"].as_i64().unwrap();

    post_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/shots/{shot_id}/generate"),
        &token,
    )
    .await;
    tokio::time::sleep(Duration::from_millis(3001)).await;

    let shot = &episode(&app, &token, episode_id).await["shots"][0];
    assert_eq!(shot["status"], "ERROR");
    assert!(shot["video_url"].is_null());

    let errors = body_json(get_auth(app.router.clone(), "/api/v1/generation-errors", &token).await).await;
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["shot_id"], shot_id);
    assert_eq!(errors[0]["shot_index"], 1);

    let response = delete_auth(app.router.clone(), "/api/v1/generation-errors", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["cleared"], 1);
}

#[tokio::test(start_paused = true)]
async fn episode_render_skips_blank_and_staggers_shots() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;
    add_shot(&app, &token, episode_id, "雨夜街头").await;
    add_shot(&app, &token, episode_id, "   ").await;
    add_shot(&app, &token, episode_id, "霓虹酒吧").await;

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/generate"),
        json!({ "mode": "TEXT" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["data"], 2);

    tokio::time::sleep(Duration::from_millis(5000)).await;

    let shots = episode(&app, &token, episode_id).await["shots"].clone();
    assert_eq!(shots[0]["status"], "COMPLETED");
    assert_eq!(shots[1]["status"], "PENDING");
    assert_eq!(shots[2]["status"], "COMPLETED");
}

#[tokio::test(start_paused = true)]
async fn deleting_a_rendering_shot_cancels_it() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;
    let shot = add_shot(&app, &token, episode_id, "雨夜街头").await;
    let shot_id = shot["id"].as_i64().unwrap();

    post_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/shots/{shot_id}/generate"),
        &token,
    )
    .await;

    let response = delete_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/shots/{shot_id}?confirm=true"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let in_flight = body_json(get_auth(app.router.clone(), "/api/v1/generations", &token).await).await;
    assert!(in_flight.as_array().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(3001)).await;
    assert!(episode(&app, &token, episode_id).await["shots"]
        .as_array()
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_without_completed_shots_is_rejected() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;
    add_shot(&app, &token, episode_id, "雨夜街头").await;

    let response = post_auth(
        app.router,
        &format!("/api/v1/episodes/{episode_id}/export"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn export_moves_completed_shots_to_the_editor() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;
    let episode_id = first_episode(&app, &token).await;
    let done = add_shot(&app, &token, episode_id, "雨夜街头").await;
    add_shot(&app, &token, episode_id, "霓虹酒吧").await;
    let done_id = done["id"].as_i64().unwrap();

    post_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/shots/{done_id}/generate"),
        &token,
    )
    .await;
    tokio::time::sleep(Duration::from_millis(3001)).await;

    let response = post_auth(
        app.router.clone(),
        &format!("/api/v1/episodes/{episode_id}/export"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let clips = body_json(response).await;
    assert_eq!(clips.as_array().unwrap().len(), 1);
    assert_eq!(clips[0]["shot_id"], done_id);

    let workspace = body_json(get_auth(app.router.clone(), "/api/v1/workspace", &token).await).await;
    assert_eq!(workspace["current_tab"], "EDITOR");

    let timeline = body_json(get_auth(app.router, "/api/v1/editor/timeline", &token).await).await;
    assert_eq!(timeline["layout"]["connected"], true);
    assert_eq!(timeline["layout"]["total_duration_secs"], 5.0);
}

#[tokio::test]
async fn empty_timeline_is_not_connected() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let timeline = body_json(get_auth(app.router, "/api/v1/editor/timeline", &token).await).await;
    assert!(timeline["clips"].as_array().unwrap().is_empty());
    assert_eq!(timeline["layout"]["connected"], false);
}

// ---------------------------------------------------------------------------
// Video settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn video_settings_are_validated() {
    let app = common::build_test_app().await;
    let token = login_admin(app.router.clone()).await;

    let settings = body_json(get_auth(app.router.clone(), "/api/v1/video-settings", &token).await).await;
    assert_eq!(settings, json!({ "ratio": "16:9", "resolution": "1080p", "duration": "5s" }));

    let response = put_json_auth(
        app.router.clone(),
        "/api/v1/video-settings",
        json!({ "ratio": "9:16", "resolution": "720p", "duration": "10s" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        app.router,
        "/api/v1/video-settings",
        json!({ "ratio": "wide", "resolution": "720p", "duration": "10s" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
