//! Tenant isolation: who may touch which story.
//!
//! Every entity is reached through its story, and a story is visible only to
//! its owner or to an administrator. The `load_*_for` helpers walk the
//! parent chain and apply that rule in one place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{Chapter, EntityKind, Scene, Story};
use crate::repository::Repositories;

/// Role carried by an authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user; sees only their own stories.
    #[default]
    Author,
    /// May read and modify any story.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Author => "author",
            Self::Admin => "admin",
        })
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(Self::Author),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::Validation(format!("unknown role: {other}"))),
        }
    }
}

/// The authenticated user a command or query runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User identifier.
    pub user_id: Uuid,
    /// User role.
    pub role: Role,
}

impl Actor {
    /// An author acting on their own behalf.
    #[must_use]
    pub fn author(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Author,
        }
    }

    /// An administrator.
    #[must_use]
    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    /// Returns `true` if the actor may read and modify `story`.
    #[must_use]
    pub fn can_access(&self, story: &Story) -> bool {
        self.role == Role::Admin || story.owner_id == self.user_id
    }

    /// Fails unless the actor may access `story`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for someone else's story.
    pub fn ensure_can_access(&self, story: &Story) -> Result<(), DomainError> {
        if self.can_access(story) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "story {} does not belong to user {}",
                story.id, self.user_id
            )))
        }
    }
}

/// Loads a story and checks the actor may access it.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the story does not exist and
/// `DomainError::Forbidden` if it belongs to someone else.
pub async fn load_story_for(
    actor: &Actor,
    story_id: Uuid,
    repos: &Repositories,
) -> Result<Story, DomainError> {
    let story = repos
        .stories
        .find_by_id(story_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Story, story_id))?;
    actor.ensure_can_access(&story)?;
    Ok(story)
}

/// Loads a chapter together with its story, checking access.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the chapter or its story is missing and
/// `DomainError::Forbidden` if the story belongs to someone else.
pub async fn load_chapter_for(
    actor: &Actor,
    chapter_id: Uuid,
    repos: &Repositories,
) -> Result<(Chapter, Story), DomainError> {
    let chapter = repos
        .chapters
        .find_by_id(chapter_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Chapter, chapter_id))?;
    let story = load_story_for(actor, chapter.story_id, repos).await?;
    Ok((chapter, story))
}

/// Loads a scene with its chapter and story, checking access.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if any link of the chain is missing and
/// `DomainError::Forbidden` if the story belongs to someone else.
pub async fn load_scene_for(
    actor: &Actor,
    scene_id: Uuid,
    repos: &Repositories,
) -> Result<(Scene, Chapter, Story), DomainError> {
    let scene = repos
        .scenes
        .find_by_id(scene_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Scene, scene_id))?;
    let (chapter, story) = load_chapter_for(actor, scene.chapter_id, repos).await?;
    Ok((scene, chapter, story))
}
