//! Implicit choice synchronizer.
//!
//! Runs after every scene mutation. For chapters of linear stories it
//! rebuilds the chain of implicit choices so that each scene links to its
//! successor by index; for branching stories it does nothing.

use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::model::{EntityKind, StoryType, new_id};
use storyloom_core::repository::Repositories;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::implicit_chain::{narrative_order, plan_rewrite};

/// What a synchronizer run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The chapter belongs to a branching story; nothing was touched.
    NotLinear,
    /// The implicit choices already formed the right chain.
    InSync {
        /// Number of links in the chain.
        links: usize,
    },
    /// The chain was rewritten.
    Rebuilt {
        /// Implicit choices deleted.
        removed: usize,
        /// Implicit choices created.
        added: usize,
    },
}

/// Brings the implicit choices of `chapter_id` back in line with its scene
/// order.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the chapter or its story is missing and
/// propagates any repository failure unchanged.
#[instrument(skip(repos, clock))]
pub async fn sync_implicit_choices(
    chapter_id: Uuid,
    repos: &Repositories,
    clock: &dyn Clock,
) -> Result<SyncOutcome, DomainError> {
    let chapter = repos
        .chapters
        .find_by_id(chapter_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Chapter, chapter_id))?;
    let story = repos
        .stories
        .find_by_id(chapter.story_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Story, chapter.story_id))?;

    if story.story_type != StoryType::Linear {
        debug!(story_id = %story.id, "story is branching; implicit chain not maintained");
        return Ok(SyncOutcome::NotLinear);
    }

    let scenes = narrative_order(repos.scenes.find_by_chapter_id(chapter_id).await?);

    let mut existing = Vec::new();
    for scene in &scenes {
        existing.extend(repos.choices.find_by_scene_id(scene.id).await?);
    }

    let rewrite = plan_rewrite(chapter_id, &scenes, &existing, clock.now(), new_id);
    if rewrite.is_empty() {
        let links = scenes.len().saturating_sub(1);
        debug!(links, "implicit chain already in sync");
        return Ok(SyncOutcome::InSync { links });
    }

    repos.choices.rewrite_implicit_chain(&rewrite).await?;

    let outcome = SyncOutcome::Rebuilt {
        removed: rewrite.removed.len(),
        added: rewrite.added.len(),
    };
    info!(?outcome, scenes = scenes.len(), "implicit chain rebuilt");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storyloom_core::model::{Chapter, Scene, Story, StoryType};
    use storyloom_core::repository::{
        ChapterRepository, ChoiceRepository, Repositories, SceneRepository, StoryRepository,
    };
    use storyloom_test_support::fixtures::{chapter, explicit_choice, fixed_now, scene, story};
    use storyloom_test_support::{FailingStore, FixedClock, InMemoryStore};
    use uuid::Uuid;

    use super::*;

    struct Seeded {
        store: Arc<InMemoryStore>,
        repos: Repositories,
        chapter: Chapter,
        scenes: Vec<Scene>,
    }

    async fn seed(story_type: StoryType, indices: &[i32]) -> Seeded {
        let store = InMemoryStore::new();
        let repos = store.repositories();
        let story: Story = story(Uuid::new_v4(), story_type);
        let chapter = chapter(story.id);
        StoryRepository::insert(store.as_ref(), &story).await.unwrap();
        ChapterRepository::insert(store.as_ref(), &chapter).await.unwrap();
        let mut scenes = Vec::new();
        for (n, index) in indices.iter().enumerate() {
            let s = scene(chapter.id, &format!("Scene {n}"), *index);
            SceneRepository::insert(store.as_ref(), &s).await.unwrap();
            scenes.push(s);
        }
        Seeded {
            store,
            repos,
            chapter,
            scenes,
        }
    }

    #[tokio::test]
    async fn test_sync_links_each_scene_to_its_successor() {
        // Arrange
        let seeded = seed(StoryType::Linear, &[2, 0, 1]).await;
        let clock = FixedClock(fixed_now());
        let [c, a, b] = [&seeded.scenes[0], &seeded.scenes[1], &seeded.scenes[2]];

        // Act
        let outcome = sync_implicit_choices(seeded.chapter.id, &seeded.repos, &clock)
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome, SyncOutcome::Rebuilt { removed: 0, added: 2 });
        assert_eq!(seeded.store.implicit_pairs(), vec![(a.id, b.id), (b.id, c.id)]);
    }

    #[tokio::test]
    async fn test_sync_is_noop_for_branching_story() {
        // Arrange
        let seeded = seed(StoryType::Branching, &[0, 1, 2, 3]).await;
        let clock = FixedClock(fixed_now());

        // Act
        let outcome = sync_implicit_choices(seeded.chapter.id, &seeded.repos, &clock)
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome, SyncOutcome::NotLinear);
        assert!(seeded.store.all_choices().is_empty());
        assert_eq!(seeded.store.chain_rewrite_count(), 0);
    }

    #[tokio::test]
    async fn test_sync_preserves_explicit_choices() {
        // Arrange
        let seeded = seed(StoryType::Linear, &[0, 1]).await;
        let clock = FixedClock(fixed_now());
        let (a, b) = (&seeded.scenes[0], &seeded.scenes[1]);
        let authored = explicit_choice(b.id, a.id, "Return to the shore");
        seeded.store.create(&authored).await.unwrap();

        // Act
        sync_implicit_choices(seeded.chapter.id, &seeded.repos, &clock)
            .await
            .unwrap();

        // Assert
        let choices = seeded.store.all_choices();
        assert!(choices.contains(&authored));
        assert_eq!(seeded.store.implicit_pairs(), vec![(a.id, b.id)]);
    }

    #[tokio::test]
    async fn test_sync_twice_yields_same_chain_without_duplicates() {
        // Arrange
        let seeded = seed(StoryType::Linear, &[0, 1, 2]).await;
        let clock = FixedClock(fixed_now());

        // Act
        sync_implicit_choices(seeded.chapter.id, &seeded.repos, &clock)
            .await
            .unwrap();
        let first = seeded.store.implicit_pairs();
        let outcome = sync_implicit_choices(seeded.chapter.id, &seeded.repos, &clock)
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome, SyncOutcome::InSync { links: 2 });
        assert_eq!(seeded.store.implicit_pairs(), first);
        assert_eq!(seeded.store.chain_rewrite_count(), 1);
    }

    #[tokio::test]
    async fn test_sync_of_empty_chapter_reports_zero_links() {
        // Arrange
        let seeded = seed(StoryType::Linear, &[]).await;
        let clock = FixedClock(fixed_now());

        // Act
        let outcome = sync_implicit_choices(seeded.chapter.id, &seeded.repos, &clock)
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome, SyncOutcome::InSync { links: 0 });
    }

    #[tokio::test]
    async fn test_sync_returns_not_found_for_unknown_chapter() {
        // Arrange
        let seeded = seed(StoryType::Linear, &[0]).await;
        let clock = FixedClock(fixed_now());
        let missing = Uuid::new_v4();

        // Act
        let result = sync_implicit_choices(missing, &seeded.repos, &clock).await;

        // Assert
        match result {
            Err(DomainError::NotFound { entity, id }) => {
                assert_eq!(entity, EntityKind::Chapter);
                assert_eq!(id, missing);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sync_propagates_choice_persistence_failure() {
        // Arrange
        let seeded = seed(StoryType::Linear, &[0, 1]).await;
        let clock = FixedClock(fixed_now());
        let repos = Repositories {
            choices: FailingStore::repositories().choices,
            ..seeded.repos.clone()
        };

        // Act
        let result = sync_implicit_choices(seeded.chapter.id, &repos, &clock).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
