//! Query handlers for the Stories context.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storyloom_core::access::{Actor, load_chapter_for, load_story_for};
use storyloom_core::error::DomainError;
use storyloom_core::model::{Chapter, Story, StoryType};
use storyloom_core::repository::Repositories;
use uuid::Uuid;

/// Read-only view of a story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryView {
    /// Story identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Display title.
    pub title: String,
    /// Optional synopsis.
    pub synopsis: Option<String>,
    /// Navigation mode.
    #[serde(rename = "type")]
    pub story_type: StoryType,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Story> for StoryView {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id,
            owner_id: story.owner_id,
            title: story.title.clone(),
            synopsis: story.synopsis.clone(),
            story_type: story.story_type,
            created_at: story.created_at,
            updated_at: story.updated_at,
        }
    }
}

/// Read-only view of a chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterView {
    /// Chapter identifier.
    pub id: Uuid,
    /// Owning story.
    pub story_id: Uuid,
    /// Chapter title.
    pub title: String,
    /// Position within the story.
    pub index: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Chapter> for ChapterView {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id,
            story_id: chapter.story_id,
            title: chapter.title.clone(),
            index: chapter.index,
            created_at: chapter.created_at,
            updated_at: chapter.updated_at,
        }
    }
}

/// Retrieves a story.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the story is missing and
/// `DomainError::Forbidden` if it belongs to someone else.
pub async fn get_story(
    actor: &Actor,
    story_id: Uuid,
    repos: &Repositories,
) -> Result<StoryView, DomainError> {
    let story = load_story_for(actor, story_id, repos).await?;
    Ok(StoryView::from(&story))
}

/// Lists the actor's own stories.
///
/// # Errors
///
/// Propagates persistence failures.
pub async fn list_stories(
    actor: &Actor,
    repos: &Repositories,
) -> Result<Vec<StoryView>, DomainError> {
    let stories = repos.stories.find_by_owner(actor.user_id).await?;
    Ok(stories.iter().map(StoryView::from).collect())
}

/// Retrieves a chapter.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the chapter is missing and
/// `DomainError::Forbidden` if its story belongs to someone else.
pub async fn get_chapter(
    actor: &Actor,
    chapter_id: Uuid,
    repos: &Repositories,
) -> Result<ChapterView, DomainError> {
    let (chapter, _) = load_chapter_for(actor, chapter_id, repos).await?;
    Ok(ChapterView::from(&chapter))
}

/// Lists a story's chapters ordered by index.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the story is missing and
/// `DomainError::Forbidden` if it belongs to someone else.
pub async fn list_chapters(
    actor: &Actor,
    story_id: Uuid,
    repos: &Repositories,
) -> Result<Vec<ChapterView>, DomainError> {
    let story = load_story_for(actor, story_id, repos).await?;
    let chapters = repos.chapters.find_by_story_id(story.id).await?;
    Ok(chapters.iter().map(ChapterView::from).collect())
}
