//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use storyloom_test_support::SteppingClock;
use tower::ServiceExt;
use uuid::Uuid;

use storyloom_api::state::AppState;

/// Build the full app router over PostgreSQL repositories.
///
/// The clock advances one second per reading so that successive writes get
/// distinct timestamps; build the app once per test and clone it.
pub fn build_test_app(pool: PgPool) -> Router {
    let clock = SteppingClock::starting_at(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    );
    let app_state = AppState::new(Arc::new(clock), storyloom_store::repositories(&pool));
    storyloom_api::app(app_state)
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    user: Uuid,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user.to_string());
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body as `user`.
pub async fn post_json(
    app: Router,
    uri: &str,
    user: Uuid,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, user, Some(body)).await
}

/// Send a PATCH request with a JSON body as `user`.
pub async fn patch_json(
    app: Router,
    uri: &str,
    user: Uuid,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, user, Some(body)).await
}

/// Send a GET request as `user`.
pub async fn get_json(app: Router, uri: &str, user: Uuid) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, user, None).await
}

/// Send a DELETE request as `user`.
pub async fn delete_json(app: Router, uri: &str, user: Uuid) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, user, None).await
}

/// Creates a story and one chapter, returning `(story_id, chapter_id)`.
pub async fn story_with_chapter(app: &Router, user: Uuid, story_type: &str) -> (String, String) {
    let (status, story) = post_json(
        app.clone(),
        "/api/v1/stories",
        user,
        &serde_json::json!({ "title": "The Lighthouse Keeper", "type": story_type }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let story_id = story["id"].as_str().unwrap().to_string();

    let (status, chapter) = post_json(
        app.clone(),
        &format!("/api/v1/stories/{story_id}/chapters"),
        user,
        &serde_json::json!({ "title": "Arrival" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let chapter_id = chapter["id"].as_str().unwrap().to_string();

    (story_id, chapter_id)
}
