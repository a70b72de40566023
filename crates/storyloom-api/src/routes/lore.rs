//! Routes for worldbuilding entries.
//!
//! Every kind exposes the same five endpoints, generated from one set of
//! generic handlers:
//!
//! - `POST /stories/{id}/{kind}` and `GET /stories/{id}/{kind}`
//! - `GET`, `PATCH` and `DELETE /{kind}/{id}`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use storyloom_core::model::{Character, Location, Note, Relation, Tag, WorldRule};
use storyloom_core::repository::LoreSlot;
use storyloom_lore::application::{command_handlers, query_handlers};
use storyloom_lore::domain::commands;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::routes::DeletedResponse;
use crate::state::AppState;

/// POST /stories/{id}/{kind}
#[instrument(skip(state, draft), fields(user_id = %actor.user_id, kind = %T::KIND))]
async fn create_entry<T: LoreSlot>(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<T::Draft>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let command = commands::CreateEntry::<T> {
        correlation_id: Uuid::new_v4(),
        actor,
        story_id: id,
        draft,
    };
    let entry =
        command_handlers::handle_create_entry(command, state.clock.as_ref(), &state.repos).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /stories/{id}/{kind}
#[instrument(skip(state), fields(user_id = %actor.user_id, kind = %T::KIND))]
async fn list_entries<T: LoreSlot>(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<T>>, ApiError> {
    Ok(Json(
        query_handlers::list_entries::<T>(&actor, id, &state.repos).await?,
    ))
}

/// GET /{kind}/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id, kind = %T::KIND))]
async fn get_entry<T: LoreSlot>(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, ApiError> {
    Ok(Json(
        query_handlers::get_entry::<T>(&actor, id, &state.repos).await?,
    ))
}

/// PATCH /{kind}/{id}
#[instrument(skip(state, patch), fields(user_id = %actor.user_id, kind = %T::KIND))]
async fn update_entry<T: LoreSlot>(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<T::Patch>,
) -> Result<Json<T>, ApiError> {
    let command = commands::UpdateEntry::<T> {
        correlation_id: Uuid::new_v4(),
        actor,
        entry_id: id,
        patch,
    };
    let entry =
        command_handlers::handle_update_entry(command, state.clock.as_ref(), &state.repos).await?;
    Ok(Json(entry))
}

/// DELETE /{kind}/{id}
#[instrument(skip(state), fields(user_id = %actor.user_id, kind = %T::KIND))]
async fn delete_entry<T: LoreSlot>(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let command = commands::DeleteEntry::<T>::new(Uuid::new_v4(), actor, id);
    let deleted = command_handlers::handle_delete_entry(&command, &state.repos).await?;
    Ok(Json(DeletedResponse { deleted }))
}

fn entry_routes<T: LoreSlot>(router: Router<AppState>, segment: &str) -> Router<AppState> {
    router
        .route(
            &format!("/stories/{{id}}/{segment}"),
            get(list_entries::<T>).post(create_entry::<T>),
        )
        .route(
            &format!("/{segment}/{{id}}"),
            get(get_entry::<T>)
                .patch(update_entry::<T>)
                .delete(delete_entry::<T>),
        )
}

/// Returns the router for all worldbuilding entries.
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = entry_routes::<Character>(router, "characters");
    let router = entry_routes::<Relation>(router, "relations");
    let router = entry_routes::<Location>(router, "locations");
    let router = entry_routes::<Note>(router, "notes");
    let router = entry_routes::<Tag>(router, "tags");
    entry_routes::<WorldRule>(router, "world-rules")
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use storyloom_core::model::StoryType;
    use storyloom_core::repository::StoryRepository;
    use storyloom_test_support::InMemoryStore;
    use storyloom_test_support::fixtures::story;

    use super::*;
    use crate::routes::testing::{send, state};

    async fn seeded() -> (Router, Uuid, Uuid) {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let novel = story(user, StoryType::Linear);
        StoryRepository::insert(store.as_ref(), &novel).await.unwrap();
        (router().with_state(state(store.repositories())), user, novel.id)
    }

    async fn create(app: &Router, user: Uuid, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app.clone(), "POST", uri, Some(user), Some(&body)).await
    }

    #[tokio::test]
    async fn test_character_lifecycle() {
        // Arrange
        let (app, user, story_id) = seeded().await;
        let (status, created) = create(
            &app,
            user,
            &format!("/stories/{story_id}/characters"),
            json!({ "name": "Mara", "role": "keeper" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap();

        // Act
        let (patch_status, patched) = send(
            app.clone(),
            "PATCH",
            &format!("/characters/{id}"),
            Some(user),
            Some(&json!({ "description": "Tends the light." })),
        )
        .await;
        let (_, listed) = send(
            app.clone(),
            "GET",
            &format!("/stories/{story_id}/characters"),
            Some(user),
            None,
        )
        .await;
        let (delete_status, deleted) =
            send(app.clone(), "DELETE", &format!("/characters/{id}"), Some(user), None).await;
        let (get_status, _) =
            send(app, "GET", &format!("/characters/{id}"), Some(user), None).await;

        // Assert
        assert_eq!(patch_status, StatusCode::OK);
        assert_eq!(patched["description"], "Tends the light.");
        assert_eq!(patched["role"], "keeper");
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(delete_status, StatusCode::OK);
        assert_eq!(deleted["deleted"], true);
        assert_eq!(get_status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_self_relation_returns_400() {
        // Arrange
        let (app, user, story_id) = seeded().await;
        let (_, mara) = create(
            &app,
            user,
            &format!("/stories/{story_id}/characters"),
            json!({ "name": "Mara" }),
        )
        .await;

        // Act
        let (status, json) = create(
            &app,
            user,
            &format!("/stories/{story_id}/relations"),
            json!({
                "from_character_id": mara["id"],
                "to_character_id": mara["id"],
                "kind": "rival",
            }),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_duplicate_tag_returns_409() {
        // Arrange
        let (app, user, story_id) = seeded().await;
        let uri = format!("/stories/{story_id}/tags");
        create(&app, user, &uri, json!({ "name": "Omen" })).await;

        // Act
        let (status, json) = create(&app, user, &uri, json!({ "name": "omen" })).await;

        // Assert
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "conflict");
    }

    #[tokio::test]
    async fn test_world_rules_use_hyphenated_segment() {
        // Arrange
        let (app, user, story_id) = seeded().await;

        // Act
        let (status, json) = create(
            &app,
            user,
            &format!("/stories/{story_id}/world-rules"),
            json!({ "title": "Iron breaks glamour" }),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["title"], "Iron breaks glamour");
        assert_eq!(json["description"], "");
    }
}
