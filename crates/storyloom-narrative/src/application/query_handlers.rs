//! Query handlers for the Narrative context.
//!
//! Read-only views over scenes and choices, filtered by story ownership.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storyloom_core::access::{Actor, load_chapter_for, load_scene_for};
use storyloom_core::error::DomainError;
use storyloom_core::model::{Choice, EntityKind, Scene};
use storyloom_core::repository::Repositories;
use uuid::Uuid;

use crate::domain::implicit_chain::narrative_order;
use crate::domain::manuscript::word_count;

/// Read-only view of a scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    /// Scene identifier.
    pub id: Uuid,
    /// Owning chapter.
    pub chapter_id: Uuid,
    /// Scene title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Narrative position.
    pub index: i32,
    /// Words in the rendered body.
    pub word_count: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Scene> for SceneView {
    fn from(scene: &Scene) -> Self {
        Self {
            id: scene.id,
            chapter_id: scene.chapter_id,
            title: scene.title.clone(),
            content: scene.content.clone(),
            index: scene.index,
            word_count: word_count(&scene.content),
            created_at: scene.created_at,
            updated_at: scene.updated_at,
        }
    }
}

/// Read-only view of a choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceView {
    /// Choice identifier.
    pub id: Uuid,
    /// The scene offering the choice.
    pub scene_id: Uuid,
    /// The scene the choice leads to.
    pub next_scene_id: Uuid,
    /// Label.
    pub text: String,
    /// Whether the choice was derived from scene order.
    pub is_implicit: bool,
}

impl From<&Choice> for ChoiceView {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            scene_id: choice.scene_id,
            next_scene_id: choice.next_scene_id,
            text: choice.text.clone(),
            is_implicit: choice.is_implicit,
        }
    }
}

/// Retrieves a scene.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the scene is missing and
/// `DomainError::Forbidden` if its story belongs to someone else.
pub async fn get_scene(
    actor: &Actor,
    scene_id: Uuid,
    repos: &Repositories,
) -> Result<SceneView, DomainError> {
    let (scene, _, _) = load_scene_for(actor, scene_id, repos).await?;
    Ok(SceneView::from(&scene))
}

/// Lists a chapter's scenes in narrative order.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the chapter is missing and
/// `DomainError::Forbidden` if its story belongs to someone else.
pub async fn list_scenes(
    actor: &Actor,
    chapter_id: Uuid,
    repos: &Repositories,
) -> Result<Vec<SceneView>, DomainError> {
    let (chapter, _) = load_chapter_for(actor, chapter_id, repos).await?;
    let scenes = narrative_order(repos.scenes.find_by_chapter_id(chapter.id).await?);
    Ok(scenes.iter().map(SceneView::from).collect())
}

/// Retrieves a choice.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the choice or its scene is missing and
/// `DomainError::Forbidden` if its story belongs to someone else.
pub async fn get_choice(
    actor: &Actor,
    choice_id: Uuid,
    repos: &Repositories,
) -> Result<ChoiceView, DomainError> {
    let choice = repos
        .choices
        .find_by_id(choice_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Choice, choice_id))?;
    load_scene_for(actor, choice.scene_id, repos).await?;
    Ok(ChoiceView::from(&choice))
}

/// Lists the choices offered by a scene.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the scene is missing and
/// `DomainError::Forbidden` if its story belongs to someone else.
pub async fn list_choices(
    actor: &Actor,
    scene_id: Uuid,
    repos: &Repositories,
) -> Result<Vec<ChoiceView>, DomainError> {
    let (scene, _, _) = load_scene_for(actor, scene_id, repos).await?;
    let choices = repos.choices.find_by_scene_id(scene.id).await?;
    Ok(choices.iter().map(ChoiceView::from).collect())
}
