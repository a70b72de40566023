//! Command handlers for the Stories context.
//!
//! Deleting a story or chapter removes its contents row by row, children
//! first, so that no choice is left pointing at a missing scene.

use storyloom_core::access::{load_chapter_for, load_story_for};
use storyloom_core::clock::Clock;
use storyloom_core::command::Command;
use storyloom_core::error::DomainError;
use storyloom_core::model::{
    Chapter, Character, Location, Note, Relation, Story, Tag, WorldRule, new_id,
};
use storyloom_core::repository::{LoreSlot, Repositories};
use storyloom_core::validation::{non_negative_index, optional_text, required_text};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::application::query_handlers::{ChapterView, StoryView};
use crate::domain::commands::{
    CreateChapter, CreateStory, DeleteChapter, DeleteStory, UpdateChapter, UpdateStory,
};

/// Handles the `CreateStory` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank title and propagates
/// persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_create_story(
    command: &CreateStory,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<StoryView, DomainError> {
    let now = clock.now();
    let story = Story {
        id: new_id(),
        owner_id: command.actor().user_id,
        title: required_text("title", &command.title)?,
        synopsis: optional_text(command.synopsis.clone()),
        story_type: command.story_type.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    repos.stories.insert(&story).await?;

    info!(command = command.command_type(), story_id = %story.id, story_type = %story.story_type, "story created");
    Ok(StoryView::from(&story))
}

/// Handles the `UpdateStory` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank title or a
/// `branching -> linear` conversion, `DomainError::NotFound`/`Forbidden` if
/// the story is not accessible, and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, story_id = %command.story_id))]
pub async fn handle_update_story(
    command: &UpdateStory,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<StoryView, DomainError> {
    let mut story = load_story_for(command.actor(), command.story_id, repos).await?;

    if let Some(title) = &command.title {
        story.title = required_text("title", title)?;
    }
    if command.synopsis.is_some() {
        story.synopsis = optional_text(command.synopsis.clone());
    }
    if let Some(next) = command.story_type {
        story.story_type = story.story_type.transition_to(next)?;
    }
    story.updated_at = clock.now();

    repos.stories.update(&story).await?;

    info!(command = command.command_type(), "story updated");
    Ok(StoryView::from(&story))
}

/// Removes a chapter's scenes and every choice touching them, then the
/// chapter itself.
async fn purge_chapter(chapter_id: Uuid, repos: &Repositories) -> Result<usize, DomainError> {
    let scenes = repos.scenes.find_by_chapter_id(chapter_id).await?;
    for scene in &scenes {
        repos.choices.delete_touching_scene(scene.id).await?;
        repos.scenes.delete(scene.id).await?;
    }
    repos.chapters.delete(chapter_id).await?;
    Ok(scenes.len())
}

async fn purge_lore<T: LoreSlot>(story_id: Uuid, repos: &Repositories) -> Result<(), DomainError> {
    let repository = T::repository(repos);
    let entries = repository.find_by_story_id(story_id).await?;
    for entry in &entries {
        repository.delete(entry.id()).await?;
    }
    debug!(kind = %T::KIND, count = entries.len(), "lore entries purged");
    Ok(())
}

/// Handles the `DeleteStory` command: removes chapters, scenes, choices and
/// all worldbuilding entries before the story itself.
///
/// # Errors
///
/// Returns `DomainError::NotFound`/`Forbidden` if the story is not
/// accessible and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, story_id = %command.story_id))]
pub async fn handle_delete_story(
    command: &DeleteStory,
    repos: &Repositories,
) -> Result<bool, DomainError> {
    let story = load_story_for(command.actor(), command.story_id, repos).await?;

    let chapters = repos.chapters.find_by_story_id(story.id).await?;
    let mut scenes = 0;
    for chapter in &chapters {
        scenes += purge_chapter(chapter.id, repos).await?;
    }

    // Relations reference characters.
    purge_lore::<Relation>(story.id, repos).await?;
    purge_lore::<Character>(story.id, repos).await?;
    purge_lore::<Location>(story.id, repos).await?;
    purge_lore::<Note>(story.id, repos).await?;
    purge_lore::<Tag>(story.id, repos).await?;
    purge_lore::<WorldRule>(story.id, repos).await?;

    repos.stories.delete(story.id).await?;

    info!(
        command = command.command_type(),
        chapters = chapters.len(),
        scenes,
        "story deleted"
    );
    Ok(true)
}

/// Handles the `CreateChapter` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank title or negative index,
/// `DomainError::NotFound`/`Forbidden` if the story is not accessible, and
/// propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, story_id = %command.story_id))]
pub async fn handle_create_chapter(
    command: &CreateChapter,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<ChapterView, DomainError> {
    let story = load_story_for(command.actor(), command.story_id, repos).await?;
    let title = required_text("title", &command.title)?;
    let index = match command.index {
        Some(index) => non_negative_index("index", index)?,
        None => {
            let count = repos.chapters.find_by_story_id(story.id).await?.len();
            i32::try_from(count)
                .map_err(|_| DomainError::Validation("too many chapters".into()))?
        }
    };

    let now = clock.now();
    let chapter = Chapter {
        id: new_id(),
        story_id: story.id,
        title,
        index,
        created_at: now,
        updated_at: now,
    };
    repos.chapters.insert(&chapter).await?;

    info!(command = command.command_type(), chapter_id = %chapter.id, "chapter created");
    Ok(ChapterView::from(&chapter))
}

/// Handles the `UpdateChapter` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank title or negative index,
/// `DomainError::NotFound`/`Forbidden` if the chapter is not accessible, and
/// propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, chapter_id = %command.chapter_id))]
pub async fn handle_update_chapter(
    command: &UpdateChapter,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<ChapterView, DomainError> {
    let (mut chapter, _) = load_chapter_for(command.actor(), command.chapter_id, repos).await?;

    if let Some(title) = &command.title {
        chapter.title = required_text("title", title)?;
    }
    if let Some(index) = command.index {
        chapter.index = non_negative_index("index", index)?;
    }
    chapter.updated_at = clock.now();

    repos.chapters.update(&chapter).await?;

    info!(command = command.command_type(), "chapter updated");
    Ok(ChapterView::from(&chapter))
}

/// Handles the `DeleteChapter` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound`/`Forbidden` if the chapter is not
/// accessible and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, chapter_id = %command.chapter_id))]
pub async fn handle_delete_chapter(
    command: &DeleteChapter,
    repos: &Repositories,
) -> Result<bool, DomainError> {
    let (chapter, _) = load_chapter_for(command.actor(), command.chapter_id, repos).await?;

    let scenes = purge_chapter(chapter.id, repos).await?;

    info!(command = command.command_type(), scenes, "chapter deleted");
    Ok(true)
}
