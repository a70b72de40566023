//! Command handlers for the Narrative context.
//!
//! Scene handlers persist the scene and then re-run the implicit choice
//! synchronizer for every chapter whose scene order may have changed.
//! Choice handlers guard the explicit/implicit split.

use storyloom_core::access::{Actor, load_chapter_for, load_scene_for};
use storyloom_core::clock::Clock;
use storyloom_core::command::Command;
use storyloom_core::error::DomainError;
use storyloom_core::model::{
    Choice, EntityKind, IMPLICIT_CHOICE_TEXT, Scene, Story, StoryType, new_id,
};
use storyloom_core::repository::Repositories;
use storyloom_core::validation::{non_negative_index, required_text};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::query_handlers::{ChoiceView, SceneView};
use crate::application::synchronizer::sync_implicit_choices;
use crate::domain::commands::{
    CreateChoice, CreateScene, DeleteChoice, DeleteScene, UpdateChoice, UpdateScene,
};

/// Index given to a scene appended without an explicit position.
async fn next_scene_index(chapter_id: Uuid, repos: &Repositories) -> Result<i32, DomainError> {
    let scenes = repos.scenes.find_by_chapter_id(chapter_id).await?;
    Ok(scenes
        .iter()
        .map(|s| s.index)
        .max()
        .map_or(0, |max| max.saturating_add(1)))
}

/// Handles the `CreateScene` command: persists the scene, then rebuilds the
/// chapter's implicit chain.
///
/// # Errors
///
/// Returns `DomainError::NotFound`/`Forbidden` if the chapter is not
/// accessible, `DomainError::Validation` for a blank title or negative index,
/// and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, chapter_id = %command.chapter_id))]
pub async fn handle_create_scene(
    command: &CreateScene,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<SceneView, DomainError> {
    let (chapter, _) = load_chapter_for(command.actor(), command.chapter_id, repos).await?;
    let title = required_text("title", &command.title)?;
    let index = match command.index {
        Some(index) => non_negative_index("index", index)?,
        None => next_scene_index(chapter.id, repos).await?,
    };

    let now = clock.now();
    let scene = Scene {
        id: new_id(),
        chapter_id: chapter.id,
        title,
        content: command.content.clone(),
        index,
        created_at: now,
        updated_at: now,
    };
    repos.scenes.insert(&scene).await?;

    let outcome = sync_implicit_choices(chapter.id, repos, clock).await?;
    info!(command = command.command_type(), scene_id = %scene.id, ?outcome, "scene created");

    Ok(SceneView::from(&scene))
}

/// Handles the `UpdateScene` command: merges the provided fields, persists,
/// and rebuilds the implicit chain of the scene's chapter (and of the chapter
/// it left, when moved).
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the scene does not exist or is not in
/// `command.chapter_id`, `DomainError::Forbidden` for foreign stories,
/// `DomainError::Validation` for invalid fields or a move across stories,
/// and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, scene_id = %command.scene_id))]
pub async fn handle_update_scene(
    command: &UpdateScene,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<SceneView, DomainError> {
    let mut scene = repos
        .scenes
        .find_by_id(command.scene_id)
        .await?
        .filter(|s| s.chapter_id == command.chapter_id)
        .ok_or_else(|| DomainError::not_found(EntityKind::Scene, command.scene_id))?;
    let (_, story) = load_chapter_for(command.actor(), scene.chapter_id, repos).await?;

    let previous_chapter_id = scene.chapter_id;
    if let Some(target_id) = command.move_to_chapter_id {
        if target_id != scene.chapter_id {
            let (target, _) = load_chapter_for(command.actor(), target_id, repos).await?;
            if target.story_id != story.id {
                return Err(DomainError::Validation(
                    "a scene can only move between chapters of the same story".into(),
                ));
            }
            scene.chapter_id = target.id;
        }
    }
    if let Some(title) = &command.title {
        scene.title = required_text("title", title)?;
    }
    if let Some(content) = &command.content {
        scene.content.clone_from(content);
    }
    if let Some(index) = command.index {
        scene.index = non_negative_index("index", index)?;
    }
    scene.updated_at = clock.now();

    repos.scenes.update(&scene).await?;

    let outcome = sync_implicit_choices(scene.chapter_id, repos, clock).await?;
    if previous_chapter_id != scene.chapter_id {
        let left = sync_implicit_choices(previous_chapter_id, repos, clock).await?;
        info!(from = %previous_chapter_id, to = %scene.chapter_id, ?left, "scene moved");
    }
    info!(command = command.command_type(), ?outcome, "scene updated");

    Ok(SceneView::from(&scene))
}

/// Handles the `DeleteScene` command: removes the scene and every choice
/// leading from or to it, then rebuilds its former chapter's implicit chain.
///
/// # Errors
///
/// Returns `DomainError::NotFound`/`Forbidden` if the scene is not
/// accessible and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, scene_id = %command.scene_id))]
pub async fn handle_delete_scene(
    command: &DeleteScene,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<bool, DomainError> {
    let (scene, chapter, _) = load_scene_for(command.actor(), command.scene_id, repos).await?;

    repos.choices.delete_touching_scene(scene.id).await?;
    repos.scenes.delete(scene.id).await?;

    let outcome = sync_implicit_choices(chapter.id, repos, clock).await?;
    info!(command = command.command_type(), ?outcome, "scene deleted");

    Ok(true)
}

/// Resolves `scene_id` and checks it lives in `story`.
async fn scene_in_story(
    actor: &Actor,
    scene_id: Uuid,
    story: &Story,
    repos: &Repositories,
) -> Result<Scene, DomainError> {
    let (scene, _, target_story) = load_scene_for(actor, scene_id, repos).await?;
    if target_story.id != story.id {
        return Err(DomainError::Validation(
            "a choice can only link scenes of the same story".into(),
        ));
    }
    Ok(scene)
}

/// Handles the `CreateChoice` command.
///
/// Explicit choices are rejected in linear stories, whose navigation is
/// derived from scene order. Both ends must belong to the same story. The
/// choice is stored as-is; no synchronization runs.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an explicit choice in a linear
/// story, scenes of different stories or a blank label;
/// `DomainError::NotFound`/`Forbidden` if a scene is not accessible; and
/// propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, scene_id = %command.scene_id))]
pub async fn handle_create_choice(
    command: &CreateChoice,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<ChoiceView, DomainError> {
    let (source, _, story) = load_scene_for(command.actor(), command.scene_id, repos).await?;

    if story.story_type == StoryType::Linear && !command.is_implicit {
        return Err(DomainError::Validation(
            "explicit choices are not allowed in linear stories".into(),
        ));
    }

    let target = scene_in_story(command.actor(), command.next_scene_id, &story, repos).await?;

    let text = match (&command.text, command.is_implicit) {
        (Some(text), _) => required_text("text", text)?,
        (None, true) => IMPLICIT_CHOICE_TEXT.to_owned(),
        (None, false) => return Err(DomainError::Validation("text must not be empty".into())),
    };

    let now = clock.now();
    let choice = Choice {
        id: new_id(),
        scene_id: source.id,
        next_scene_id: target.id,
        text,
        is_implicit: command.is_implicit,
        created_at: now,
        updated_at: now,
    };
    repos.choices.create(&choice).await?;

    info!(command = command.command_type(), choice_id = %choice.id, "choice created");
    Ok(ChoiceView::from(&choice))
}

/// Loads a choice and its story for modification.
///
/// Implicit choices of linear stories belong to the synchronizer and are
/// refused; in branching stories nothing maintains them, so they are editable.
async fn load_editable_choice(
    actor: &Actor,
    choice_id: Uuid,
    repos: &Repositories,
) -> Result<(Choice, Story), DomainError> {
    let choice = repos
        .choices
        .find_by_id(choice_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Choice, choice_id))?;
    let (_, _, story) = load_scene_for(actor, choice.scene_id, repos).await?;
    if choice.is_implicit && story.story_type == StoryType::Linear {
        return Err(DomainError::Validation(
            "implicit choices of linear stories are maintained automatically".into(),
        ));
    }
    Ok((choice, story))
}

/// Handles the `UpdateChoice` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for implicit choices of linear stories,
/// a blank label or
/// a destination in another story; `DomainError::NotFound`/`Forbidden` if the
/// choice is not accessible; and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, choice_id = %command.choice_id))]
pub async fn handle_update_choice(
    command: &UpdateChoice,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<ChoiceView, DomainError> {
    let (mut choice, story) = load_editable_choice(command.actor(), command.choice_id, repos).await?;

    if let Some(text) = &command.text {
        choice.text = required_text("text", text)?;
    }
    if let Some(next_scene_id) = command.next_scene_id {
        let target = scene_in_story(command.actor(), next_scene_id, &story, repos).await?;
        choice.next_scene_id = target.id;
    }
    choice.updated_at = clock.now();

    repos.choices.update(&choice).await?;

    info!(command = command.command_type(), "choice updated");
    Ok(ChoiceView::from(&choice))
}

/// Handles the `DeleteChoice` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for implicit choices of linear stories,
/// `DomainError::NotFound`/`Forbidden` if the choice is not accessible, and
/// propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, choice_id = %command.choice_id))]
pub async fn handle_delete_choice(
    command: &DeleteChoice,
    repos: &Repositories,
) -> Result<bool, DomainError> {
    let (choice, _) = load_editable_choice(command.actor(), command.choice_id, repos).await?;

    repos.choices.delete(choice.id, choice.scene_id).await?;

    info!(command = command.command_type(), "choice deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use storyloom_core::access::Actor;
    use storyloom_core::model::{Chapter, StoryType};
    use storyloom_core::repository::{ChapterRepository, ChoiceRepository, StoryRepository};
    use storyloom_test_support::fixtures::{chapter, explicit_choice, story};
    use storyloom_test_support::{FailingStore, InMemoryStore, SteppingClock};
    use uuid::Uuid;

    use super::*;

    struct World {
        store: Arc<InMemoryStore>,
        repos: Repositories,
        actor: Actor,
        clock: SteppingClock,
        story: Story,
        chapter: Chapter,
    }

    impl World {
        async fn new(story_type: StoryType) -> Self {
            let owner = Uuid::new_v4();
            let store = InMemoryStore::new();
            let repos = store.repositories();
            let story = story(owner, story_type);
            let chapter = chapter(story.id);
            StoryRepository::insert(store.as_ref(), &story).await.unwrap();
            ChapterRepository::insert(store.as_ref(), &chapter).await.unwrap();
            Self {
                store,
                repos,
                actor: Actor::author(owner),
                clock: SteppingClock::starting_at(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()),
                story,
                chapter,
            }
        }

        async fn add_chapter(&self) -> Chapter {
            let mut extra = chapter(self.story.id);
            extra.index = 1;
            ChapterRepository::insert(self.store.as_ref(), &extra).await.unwrap();
            extra
        }

        async fn create_scene_in(&self, chapter_id: Uuid, title: &str, index: i32) -> SceneView {
            let command = CreateScene {
                correlation_id: Uuid::new_v4(),
                actor: self.actor,
                chapter_id,
                title: title.into(),
                content: String::new(),
                index: Some(index),
            };
            handle_create_scene(&command, &self.clock, &self.repos)
                .await
                .unwrap()
        }

        async fn create_scene(&self, title: &str, index: i32) -> SceneView {
            self.create_scene_in(self.chapter.id, title, index).await
        }

        fn update(&self, scene: &SceneView) -> UpdateScene {
            UpdateScene {
                correlation_id: Uuid::new_v4(),
                actor: self.actor,
                scene_id: scene.id,
                chapter_id: scene.chapter_id,
                move_to_chapter_id: None,
                title: None,
                content: None,
                index: None,
            }
        }

        fn implicit_set(&self) -> HashSet<(Uuid, Uuid)> {
            self.store.implicit_pairs().into_iter().collect()
        }
    }

    fn set(pairs: &[(Uuid, Uuid)]) -> HashSet<(Uuid, Uuid)> {
        pairs.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_appending_scene_extends_the_chain() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let c = world.create_scene("C", 2).await;

        // Act
        let d = world.create_scene("D", 3).await;

        // Assert
        assert_eq!(
            world.implicit_set(),
            set(&[(a.id, b.id), (b.id, c.id), (c.id, d.id)])
        );
    }

    #[tokio::test]
    async fn test_deleting_scene_bridges_the_gap() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let c = world.create_scene("C", 2).await;
        let d = world.create_scene("D", 3).await;
        let command = DeleteScene {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            scene_id: c.id,
        };

        // Act
        let deleted = handle_delete_scene(&command, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        assert!(deleted);
        assert_eq!(world.implicit_set(), set(&[(a.id, b.id), (b.id, d.id)]));
    }

    #[tokio::test]
    async fn test_reindexing_scene_reorders_the_chain() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let c = world.create_scene("C", 2).await;
        let d = world.create_scene("D", 3).await;
        let command = UpdateScene {
            index: Some(3),
            ..world.update(&b)
        };

        // Act
        let updated = handle_update_scene(&command, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated.index, 3);
        assert_eq!(
            world.implicit_set(),
            set(&[(a.id, c.id), (c.id, d.id), (d.id, b.id)])
        );
    }

    #[tokio::test]
    async fn test_scene_without_index_is_appended_after_the_last() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 4).await;
        let command = CreateScene {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            chapter_id: world.chapter.id,
            title: "B".into(),
            content: "It was *late*.".into(),
            index: None,
        };

        // Act
        let b = handle_create_scene(&command, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        assert_eq!(b.index, 5);
        assert_eq!(b.word_count, 3);
        assert_eq!(world.implicit_set(), set(&[(a.id, b.id)]));
    }

    #[tokio::test]
    async fn test_branching_story_gets_no_implicit_choices() {
        // Arrange
        let world = World::new(StoryType::Branching).await;

        // Act
        world.create_scene("A", 0).await;
        world.create_scene("B", 1).await;
        world.create_scene("C", 2).await;

        // Assert
        assert!(world.store.all_choices().is_empty());
    }

    #[tokio::test]
    async fn test_create_scene_rejects_negative_index() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let command = CreateScene {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            chapter_id: world.chapter.id,
            title: "A".into(),
            content: String::new(),
            index: Some(-1),
        };

        // Act
        let result = handle_create_scene(&command, &world.clock, &world.repos).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_scene_in_foreign_story_is_forbidden() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let command = CreateScene {
            correlation_id: Uuid::new_v4(),
            actor: Actor::author(Uuid::new_v4()),
            chapter_id: world.chapter.id,
            title: "Intruder".into(),
            content: String::new(),
            index: None,
        };

        // Act
        let result = handle_create_scene(&command, &world.clock, &world.repos).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_scene_in_wrong_chapter_returns_not_found() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 0).await;
        let command = UpdateScene {
            chapter_id: Uuid::new_v4(),
            title: Some("Renamed".into()),
            ..world.update(&a)
        };

        // Act
        let result = handle_update_scene(&command, &world.clock, &world.repos).await;

        // Assert
        match result {
            Err(DomainError::NotFound { entity, id }) => {
                assert_eq!(entity, EntityKind::Scene);
                assert_eq!(id, a.id);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_moving_scene_rebuilds_both_chapters() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let second = world.add_chapter().await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let c = world.create_scene("C", 2).await;
        let x = world.create_scene_in(second.id, "X", 0).await;
        let command = UpdateScene {
            move_to_chapter_id: Some(second.id),
            index: Some(1),
            ..world.update(&b)
        };

        // Act
        let moved = handle_update_scene(&command, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        assert_eq!(moved.chapter_id, second.id);
        assert_eq!(world.implicit_set(), set(&[(a.id, c.id), (x.id, b.id)]));
    }

    #[tokio::test]
    async fn test_moving_scene_to_another_story_is_rejected() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 0).await;
        let other_story = story(world.actor.user_id, StoryType::Linear);
        let foreign = chapter(other_story.id);
        StoryRepository::insert(world.store.as_ref(), &other_story)
            .await
            .unwrap();
        ChapterRepository::insert(world.store.as_ref(), &foreign)
            .await
            .unwrap();
        let command = UpdateScene {
            move_to_chapter_id: Some(foreign.id),
            ..world.update(&a)
        };

        // Act
        let result = handle_update_scene(&command, &world.clock, &world.repos).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_deleting_scene_removes_choices_pointing_at_it() {
        // Arrange
        let world = World::new(StoryType::Branching).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let into_b = explicit_choice(a.id, b.id, "Follow the lantern");
        world.store.create(&into_b).await.unwrap();
        let command = DeleteScene {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            scene_id: b.id,
        };

        // Act
        handle_delete_scene(&command, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        assert!(world.store.all_choices().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_choice_in_linear_story_is_rejected() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let command = CreateChoice {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            scene_id: b.id,
            next_scene_id: a.id,
            text: Some("Go back".into()),
            is_implicit: false,
        };

        // Act
        let result = handle_create_choice(&command, &world.clock, &world.repos).await;

        // Assert
        match result {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "explicit choices are not allowed in linear stories");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_implicit_choice_in_linear_story_is_accepted() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let command = CreateChoice {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            scene_id: b.id,
            next_scene_id: a.id,
            text: None,
            is_implicit: true,
        };

        // Act
        let view = handle_create_choice(&command, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        assert!(view.is_implicit);
        assert_eq!(view.text, IMPLICIT_CHOICE_TEXT);
        assert_eq!((view.scene_id, view.next_scene_id), (b.id, a.id));
    }

    #[tokio::test]
    async fn test_explicit_choice_in_branching_story_survives_scene_mutations() {
        // Arrange
        let world = World::new(StoryType::Branching).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let command = CreateChoice {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            scene_id: a.id,
            next_scene_id: b.id,
            text: Some("Open the door".into()),
            is_implicit: false,
        };
        let created = handle_create_choice(&command, &world.clock, &world.repos)
            .await
            .unwrap();

        // Act
        world.create_scene("C", 2).await;
        let update = UpdateScene {
            index: Some(7),
            ..world.update(&a)
        };
        handle_update_scene(&update, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        let choices = world.store.all_choices();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].id, created.id);
        assert_eq!(choices[0].text, "Open the door");
        assert!(!choices[0].is_implicit);
    }

    #[tokio::test]
    async fn test_choice_across_stories_is_rejected() {
        // Arrange
        let world = World::new(StoryType::Branching).await;
        let a = world.create_scene("A", 0).await;
        let other_story = story(world.actor.user_id, StoryType::Branching);
        let other_chapter = chapter(other_story.id);
        StoryRepository::insert(world.store.as_ref(), &other_story)
            .await
            .unwrap();
        ChapterRepository::insert(world.store.as_ref(), &other_chapter)
            .await
            .unwrap();
        let elsewhere = world.create_scene_in(other_chapter.id, "Elsewhere", 0).await;
        let command = CreateChoice {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            scene_id: a.id,
            next_scene_id: elsewhere.id,
            text: Some("Cross over".into()),
            is_implicit: false,
        };

        // Act
        let result = handle_create_choice(&command, &world.clock, &world.repos).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_explicit_choice_requires_text() {
        // Arrange
        let world = World::new(StoryType::Branching).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let command = CreateChoice {
            correlation_id: Uuid::new_v4(),
            actor: world.actor,
            scene_id: a.id,
            next_scene_id: b.id,
            text: None,
            is_implicit: false,
        };

        // Act
        let result = handle_create_choice(&command, &world.clock, &world.repos).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_implicit_choices_of_linear_story_cannot_be_edited_or_deleted() {
        // Arrange
        let world = World::new(StoryType::Linear).await;
        world.create_scene("A", 0).await;
        world.create_scene("B", 1).await;
        let link = world.store.all_choices().remove(0);

        // Act
        let edit = handle_update_choice(
            &UpdateChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                choice_id: link.id,
                text: Some("Onward".into()),
                next_scene_id: None,
            },
            &world.clock,
            &world.repos,
        )
        .await;
        let delete = handle_delete_choice(
            &DeleteChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                choice_id: link.id,
            },
            &world.repos,
        )
        .await;

        // Assert
        assert!(matches!(edit, Err(DomainError::Validation(_))));
        assert!(matches!(delete, Err(DomainError::Validation(_))));
        assert_eq!(world.store.all_choices(), vec![link]);
    }

    #[tokio::test]
    async fn test_implicit_choice_in_branching_story_can_be_deleted() {
        // Arrange
        let world = World::new(StoryType::Branching).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let link = handle_create_choice(
            &CreateChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                scene_id: a.id,
                next_scene_id: b.id,
                text: None,
                is_implicit: true,
            },
            &world.clock,
            &world.repos,
        )
        .await
        .unwrap();

        // Act
        let deleted = handle_delete_choice(
            &DeleteChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                choice_id: link.id,
            },
            &world.repos,
        )
        .await
        .unwrap();
        let reindex = UpdateScene {
            index: Some(9),
            ..world.update(&a)
        };
        handle_update_scene(&reindex, &world.clock, &world.repos)
            .await
            .unwrap();

        // Assert
        assert!(deleted);
        assert!(world.store.all_choices().is_empty());
    }

    #[tokio::test]
    async fn test_implicit_choice_in_branching_story_can_be_relabelled() {
        // Arrange
        let world = World::new(StoryType::Branching).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let link = handle_create_choice(
            &CreateChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                scene_id: a.id,
                next_scene_id: b.id,
                text: None,
                is_implicit: true,
            },
            &world.clock,
            &world.repos,
        )
        .await
        .unwrap();

        // Act
        let updated = handle_update_choice(
            &UpdateChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                choice_id: link.id,
                text: Some("Follow the gulls".into()),
                next_scene_id: None,
            },
            &world.clock,
            &world.repos,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(updated.text, "Follow the gulls");
        assert!(updated.is_implicit);
    }

    #[tokio::test]
    async fn test_explicit_choice_can_be_retargeted_and_deleted() {
        // Arrange
        let world = World::new(StoryType::Branching).await;
        let a = world.create_scene("A", 0).await;
        let b = world.create_scene("B", 1).await;
        let c = world.create_scene("C", 2).await;
        let created = handle_create_choice(
            &CreateChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                scene_id: a.id,
                next_scene_id: b.id,
                text: Some("Left".into()),
                is_implicit: false,
            },
            &world.clock,
            &world.repos,
        )
        .await
        .unwrap();

        // Act
        let updated = handle_update_choice(
            &UpdateChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                choice_id: created.id,
                text: Some("Right".into()),
                next_scene_id: Some(c.id),
            },
            &world.clock,
            &world.repos,
        )
        .await
        .unwrap();
        let deleted = handle_delete_choice(
            &DeleteChoice {
                correlation_id: Uuid::new_v4(),
                actor: world.actor,
                choice_id: created.id,
            },
            &world.repos,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(updated.text, "Right");
        assert_eq!(updated.next_scene_id, c.id);
        assert!(deleted);
        assert!(world.store.all_choices().is_empty());
    }

    #[tokio::test]
    async fn test_create_scene_propagates_repository_failure() {
        // Arrange
        let repos = FailingStore::repositories();
        let clock = SteppingClock::starting_at(Utc::now());
        let command = CreateScene {
            correlation_id: Uuid::new_v4(),
            actor: Actor::author(Uuid::new_v4()),
            chapter_id: Uuid::new_v4(),
            title: "A".into(),
            content: String::new(),
            index: Some(0),
        };

        // Act
        let result = handle_create_scene(&command, &clock, &repos).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
