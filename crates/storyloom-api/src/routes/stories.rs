//! Routes for stories and chapters.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use storyloom_core::model::StoryType;
use storyloom_stories::application::query_handlers::{ChapterView, StoryView};
use storyloom_stories::application::{command_handlers, query_handlers};
use storyloom_stories::domain::commands;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::routes::DeletedResponse;
use crate::state::AppState;

/// Request body for POST /stories.
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    /// Story title.
    pub title: String,
    /// Optional synopsis.
    pub synopsis: Option<String>,
    /// `linear` (default) or `branching`.
    #[serde(rename = "type")]
    pub story_type: Option<StoryType>,
}

/// Request body for PATCH /stories/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateStoryRequest {
    /// New title.
    pub title: Option<String>,
    /// New synopsis.
    pub synopsis: Option<String>,
    /// New type.
    #[serde(rename = "type")]
    pub story_type: Option<StoryType>,
}

/// Request body for POST /stories/{id}/chapters.
#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    /// Chapter title.
    pub title: String,
    /// Position; appended when omitted.
    pub index: Option<i32>,
}

/// Request body for PATCH /chapters/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    /// New title.
    pub title: Option<String>,
    /// New position.
    pub index: Option<i32>,
}

/// POST /stories
#[instrument(skip(state, request), fields(user_id = %actor.user_id))]
async fn create_story(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(request): Json<CreateStoryRequest>,
) -> Result<(StatusCode, Json<StoryView>), ApiError> {
    let command = commands::CreateStory {
        correlation_id: Uuid::new_v4(),
        actor,
        title: request.title,
        synopsis: request.synopsis,
        story_type: request.story_type,
    };
    let view =
        command_handlers::handle_create_story(&command, state.clock.as_ref(), &state.repos).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /stories
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn list_stories(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<StoryView>>, ApiError> {
    Ok(Json(query_handlers::list_stories(&actor, &state.repos).await?))
}

/// GET /stories/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn get_story(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoryView>, ApiError> {
    Ok(Json(query_handlers::get_story(&actor, id, &state.repos).await?))
}

/// PATCH /stories/{id}
#[instrument(skip(state, request), fields(user_id = %actor.user_id))]
async fn update_story(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStoryRequest>,
) -> Result<Json<StoryView>, ApiError> {
    let command = commands::UpdateStory {
        correlation_id: Uuid::new_v4(),
        actor,
        story_id: id,
        title: request.title,
        synopsis: request.synopsis,
        story_type: request.story_type,
    };
    let view =
        command_handlers::handle_update_story(&command, state.clock.as_ref(), &state.repos).await?;
    Ok(Json(view))
}

/// DELETE /stories/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn delete_story(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let command = commands::DeleteStory {
        correlation_id: Uuid::new_v4(),
        actor,
        story_id: id,
    };
    let deleted = command_handlers::handle_delete_story(&command, &state.repos).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// POST /stories/{id}/chapters
#[instrument(skip(state, request), fields(user_id = %actor.user_id))]
async fn create_chapter(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateChapterRequest>,
) -> Result<(StatusCode, Json<ChapterView>), ApiError> {
    let command = commands::CreateChapter {
        correlation_id: Uuid::new_v4(),
        actor,
        story_id: id,
        title: request.title,
        index: request.index,
    };
    let view =
        command_handlers::handle_create_chapter(&command, state.clock.as_ref(), &state.repos)
            .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /stories/{id}/chapters
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn list_chapters(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChapterView>>, ApiError> {
    Ok(Json(query_handlers::list_chapters(&actor, id, &state.repos).await?))
}

/// GET /chapters/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn get_chapter(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChapterView>, ApiError> {
    Ok(Json(query_handlers::get_chapter(&actor, id, &state.repos).await?))
}

/// PATCH /chapters/{id}
#[instrument(skip(state, request), fields(user_id = %actor.user_id))]
async fn update_chapter(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateChapterRequest>,
) -> Result<Json<ChapterView>, ApiError> {
    let command = commands::UpdateChapter {
        correlation_id: Uuid::new_v4(),
        actor,
        chapter_id: id,
        title: request.title,
        index: request.index,
    };
    let view =
        command_handlers::handle_update_chapter(&command, state.clock.as_ref(), &state.repos)
            .await?;
    Ok(Json(view))
}

/// DELETE /chapters/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn delete_chapter(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let command = commands::DeleteChapter {
        correlation_id: Uuid::new_v4(),
        actor,
        chapter_id: id,
    };
    let deleted = command_handlers::handle_delete_chapter(&command, &state.repos).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Returns the router for stories and chapters.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stories", get(list_stories).post(create_story))
        .route(
            "/stories/{id}",
            get(get_story).patch(update_story).delete(delete_story),
        )
        .route(
            "/stories/{id}/chapters",
            get(list_chapters).post(create_chapter),
        )
        .route(
            "/chapters/{id}",
            get(get_chapter).patch(update_chapter).delete(delete_chapter),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storyloom_test_support::{FailingStore, InMemoryStore};

    use super::*;
    use crate::routes::testing::{send, state};

    #[tokio::test]
    async fn test_create_story_returns_201_with_view() {
        // Arrange
        let app = router().with_state(state(InMemoryStore::new().repositories()));
        let user = Uuid::new_v4();
        let body = json!({ "title": "The Salt Road", "type": "branching" });

        // Act
        let (status, json) = send(app, "POST", "/stories", Some(user), Some(&body)).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["title"], "The Salt Road");
        assert_eq!(json["type"], "branching");
        assert_eq!(json["owner_id"], user.to_string());
    }

    #[tokio::test]
    async fn test_missing_identity_returns_401() {
        // Arrange
        let app = router().with_state(state(InMemoryStore::new().repositories()));

        // Act
        let (status, json) = send(app, "GET", "/stories", None, None).await;

        // Assert
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_branching_to_linear_returns_400() {
        // Arrange
        let app = router().with_state(state(InMemoryStore::new().repositories()));
        let user = Uuid::new_v4();
        let (_, created) = send(
            app.clone(),
            "POST",
            "/stories",
            Some(user),
            Some(&json!({ "title": "Forks", "type": "branching" })),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        // Act
        let (status, json) = send(
            app,
            "PATCH",
            &format!("/stories/{id}"),
            Some(user),
            Some(&json!({ "type": "linear" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_foreign_story_returns_403() {
        // Arrange
        let app = router().with_state(state(InMemoryStore::new().repositories()));
        let (_, created) = send(
            app.clone(),
            "POST",
            "/stories",
            Some(Uuid::new_v4()),
            Some(&json!({ "title": "Private" })),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        // Act
        let (status, json) = send(app, "GET", &format!("/stories/{id}"), Some(Uuid::new_v4()), None).await;

        // Assert
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_delete_chapter_returns_deleted_flag() {
        // Arrange
        let app = router().with_state(state(InMemoryStore::new().repositories()));
        let user = Uuid::new_v4();
        let (_, story) = send(
            app.clone(),
            "POST",
            "/stories",
            Some(user),
            Some(&json!({ "title": "Tides" })),
        )
        .await;
        let story_id = story["id"].as_str().unwrap();
        let (status, chapter) = send(
            app.clone(),
            "POST",
            &format!("/stories/{story_id}/chapters"),
            Some(user),
            Some(&json!({ "title": "Low Water" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let chapter_id = chapter["id"].as_str().unwrap();

        // Act
        let (status, json) = send(
            app.clone(),
            "DELETE",
            &format!("/chapters/{chapter_id}"),
            Some(user),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "deleted": true }));
        let (status, _) = send(app, "GET", &format!("/chapters/{chapter_id}"), Some(user), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_repository_failure_returns_500() {
        // Arrange
        let app = router().with_state(state(FailingStore::repositories()));

        // Act
        let (status, json) = send(app, "GET", "/stories", Some(Uuid::new_v4()), None).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }
}
