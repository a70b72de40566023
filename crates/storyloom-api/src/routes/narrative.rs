//! Routes for scenes and choices.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use storyloom_narrative::application::query_handlers::{ChoiceView, SceneView};
use storyloom_narrative::application::{command_handlers, query_handlers};
use storyloom_narrative::domain::commands;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::routes::DeletedResponse;
use crate::state::AppState;

/// Request body for POST /chapters/{id}/scenes.
#[derive(Debug, Deserialize)]
pub struct CreateSceneRequest {
    /// Scene title.
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    /// Narrative position; appended when omitted.
    pub index: Option<i32>,
}

/// Request body for PATCH /scenes/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateSceneRequest {
    /// The chapter the scene currently belongs to.
    pub chapter_id: Uuid,
    /// Destination chapter when moving the scene.
    pub move_to_chapter_id: Option<Uuid>,
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New position.
    pub index: Option<i32>,
}

/// Request body for POST /scenes/{id}/choices.
#[derive(Debug, Deserialize)]
pub struct CreateChoiceRequest {
    /// Destination scene.
    pub next_scene_id: Uuid,
    /// Label; required for explicit choices.
    pub text: Option<String>,
    /// Whether the choice mirrors scene order.
    #[serde(default)]
    pub is_implicit: bool,
}

/// Request body for PATCH /choices/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateChoiceRequest {
    /// New label.
    pub text: Option<String>,
    /// New destination scene.
    pub next_scene_id: Option<Uuid>,
}

/// POST /chapters/{id}/scenes
#[instrument(skip(state, request), fields(user_id = %actor.user_id))]
async fn create_scene(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateSceneRequest>,
) -> Result<(StatusCode, Json<SceneView>), ApiError> {
    let command = commands::CreateScene {
        correlation_id: Uuid::new_v4(),
        actor,
        chapter_id: id,
        title: request.title,
        content: request.content,
        index: request.index,
    };
    let view =
        command_handlers::handle_create_scene(&command, state.clock.as_ref(), &state.repos).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /chapters/{id}/scenes
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn list_scenes(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SceneView>>, ApiError> {
    Ok(Json(query_handlers::list_scenes(&actor, id, &state.repos).await?))
}

/// GET /scenes/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn get_scene(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SceneView>, ApiError> {
    Ok(Json(query_handlers::get_scene(&actor, id, &state.repos).await?))
}

/// PATCH /scenes/{id}
#[instrument(skip(state, request), fields(user_id = %actor.user_id, chapter_id = %request.chapter_id))]
async fn update_scene(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSceneRequest>,
) -> Result<Json<SceneView>, ApiError> {
    let command = commands::UpdateScene {
        correlation_id: Uuid::new_v4(),
        actor,
        scene_id: id,
        chapter_id: request.chapter_id,
        move_to_chapter_id: request.move_to_chapter_id,
        title: request.title,
        content: request.content,
        index: request.index,
    };
    let view =
        command_handlers::handle_update_scene(&command, state.clock.as_ref(), &state.repos).await?;
    Ok(Json(view))
}

/// DELETE /scenes/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn delete_scene(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let command = commands::DeleteScene {
        correlation_id: Uuid::new_v4(),
        actor,
        scene_id: id,
    };
    let deleted =
        command_handlers::handle_delete_scene(&command, state.clock.as_ref(), &state.repos).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// POST /scenes/{id}/choices
#[instrument(skip(state, request), fields(user_id = %actor.user_id, next_scene_id = %request.next_scene_id))]
async fn create_choice(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateChoiceRequest>,
) -> Result<(StatusCode, Json<ChoiceView>), ApiError> {
    let command = commands::CreateChoice {
        correlation_id: Uuid::new_v4(),
        actor,
        scene_id: id,
        next_scene_id: request.next_scene_id,
        text: request.text,
        is_implicit: request.is_implicit,
    };
    let view =
        command_handlers::handle_create_choice(&command, state.clock.as_ref(), &state.repos)
            .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /scenes/{id}/choices
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn list_choices(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChoiceView>>, ApiError> {
    Ok(Json(query_handlers::list_choices(&actor, id, &state.repos).await?))
}

/// GET /choices/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn get_choice(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChoiceView>, ApiError> {
    Ok(Json(query_handlers::get_choice(&actor, id, &state.repos).await?))
}

/// PATCH /choices/{id}
#[instrument(skip(state, request), fields(user_id = %actor.user_id))]
async fn update_choice(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateChoiceRequest>,
) -> Result<Json<ChoiceView>, ApiError> {
    let command = commands::UpdateChoice {
        correlation_id: Uuid::new_v4(),
        actor,
        choice_id: id,
        text: request.text,
        next_scene_id: request.next_scene_id,
    };
    let view =
        command_handlers::handle_update_choice(&command, state.clock.as_ref(), &state.repos)
            .await?;
    Ok(Json(view))
}

/// DELETE /choices/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn delete_choice(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let command = commands::DeleteChoice {
        correlation_id: Uuid::new_v4(),
        actor,
        choice_id: id,
    };
    let deleted = command_handlers::handle_delete_choice(&command, &state.repos).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Returns the router for scenes and choices.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/chapters/{id}/scenes",
            get(list_scenes).post(create_scene),
        )
        .route(
            "/scenes/{id}",
            get(get_scene).patch(update_scene).delete(delete_scene),
        )
        .route("/scenes/{id}/choices", get(list_choices).post(create_choice))
        .route(
            "/choices/{id}",
            get(get_choice).patch(update_choice).delete(delete_choice),
        )
}
