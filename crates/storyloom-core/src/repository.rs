//! Repository abstractions.
//!
//! Each context persists through these traits; `storyloom-store` provides
//! the PostgreSQL implementations and `storyloom-test-support` the in-memory
//! ones.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{
    Chapter, Character, Choice, ImplicitChainRewrite, Location, LoreEntry, Note, Relation, Scene,
    Story, Tag, WorldRule,
};

/// Persistence for stories.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Looks up a story by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Story>, DomainError>;

    /// Lists the stories owned by `owner_id`, oldest first.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Story>, DomainError>;

    /// Inserts a new story.
    async fn insert(&self, story: &Story) -> Result<(), DomainError>;

    /// Overwrites an existing story.
    async fn update(&self, story: &Story) -> Result<(), DomainError>;

    /// Removes a story row.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

/// Persistence for chapters.
#[async_trait]
pub trait ChapterRepository: Send + Sync {
    /// Looks up a chapter by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chapter>, DomainError>;

    /// Lists a story's chapters ordered by index.
    async fn find_by_story_id(&self, story_id: Uuid) -> Result<Vec<Chapter>, DomainError>;

    /// Inserts a new chapter.
    async fn insert(&self, chapter: &Chapter) -> Result<(), DomainError>;

    /// Overwrites an existing chapter.
    async fn update(&self, chapter: &Chapter) -> Result<(), DomainError>;

    /// Removes a chapter row.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

/// Persistence for scenes.
#[async_trait]
pub trait SceneRepository: Send + Sync {
    /// Looks up a scene by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Scene>, DomainError>;

    /// Lists a chapter's scenes, least recently written first.
    ///
    /// The result is not sorted by `index`; callers that need narrative
    /// order sort stably on top of this load order.
    async fn find_by_chapter_id(&self, chapter_id: Uuid) -> Result<Vec<Scene>, DomainError>;

    /// Inserts a new scene.
    async fn insert(&self, scene: &Scene) -> Result<(), DomainError>;

    /// Overwrites an existing scene.
    async fn update(&self, scene: &Scene) -> Result<(), DomainError>;

    /// Removes a scene row.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

/// Persistence for choices.
#[async_trait]
pub trait ChoiceRepository: Send + Sync {
    /// Looks up a choice by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Choice>, DomainError>;

    /// Lists the choices offered in `scene_id`, oldest first.
    async fn find_by_scene_id(&self, scene_id: Uuid) -> Result<Vec<Choice>, DomainError>;

    /// Persists a new choice.
    async fn create(&self, choice: &Choice) -> Result<(), DomainError>;

    /// Overwrites an existing choice.
    async fn update(&self, choice: &Choice) -> Result<(), DomainError>;

    /// Removes the choice `choice_id` offered in `scene_id`.
    async fn delete(&self, choice_id: Uuid, scene_id: Uuid) -> Result<(), DomainError>;

    /// Removes every choice leaving from or leading to `scene_id`.
    async fn delete_touching_scene(&self, scene_id: Uuid) -> Result<(), DomainError>;

    /// Replaces a chapter's implicit choices.
    ///
    /// The default implementation issues the deletes and creates one by one;
    /// a failure part-way leaves the chain partially rebuilt until the next
    /// rewrite. Implementations backed by a transactional store override this
    /// to apply the whole rewrite atomically.
    async fn rewrite_implicit_chain(
        &self,
        rewrite: &ImplicitChainRewrite,
    ) -> Result<(), DomainError> {
        for stale in &rewrite.removed {
            self.delete(stale.id, stale.scene_id).await?;
        }
        for link in &rewrite.added {
            self.create(link).await?;
        }
        Ok(())
    }
}

/// Persistence for story-scoped worldbuilding entries.
#[async_trait]
pub trait LoreRepository<T: LoreEntry>: Send + Sync {
    /// Looks up an entry by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DomainError>;

    /// Lists a story's entries, oldest first.
    async fn find_by_story_id(&self, story_id: Uuid) -> Result<Vec<T>, DomainError>;

    /// Inserts a new entry.
    async fn insert(&self, entry: &T) -> Result<(), DomainError>;

    /// Overwrites an existing entry.
    async fn update(&self, entry: &T) -> Result<(), DomainError>;

    /// Removes an entry.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

/// The full set of repositories a request may touch.
///
/// Built once at startup around a single persistence handle and cloned
/// cheaply into every request.
#[derive(Clone)]
pub struct Repositories {
    /// Stories.
    pub stories: Arc<dyn StoryRepository>,
    /// Chapters.
    pub chapters: Arc<dyn ChapterRepository>,
    /// Scenes.
    pub scenes: Arc<dyn SceneRepository>,
    /// Choices.
    pub choices: Arc<dyn ChoiceRepository>,
    /// Characters.
    pub characters: Arc<dyn LoreRepository<Character>>,
    /// Character relations.
    pub relations: Arc<dyn LoreRepository<Relation>>,
    /// Locations.
    pub locations: Arc<dyn LoreRepository<Location>>,
    /// Notes.
    pub notes: Arc<dyn LoreRepository<Note>>,
    /// Tags.
    pub tags: Arc<dyn LoreRepository<Tag>>,
    /// World rules.
    pub world_rules: Arc<dyn LoreRepository<WorldRule>>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

/// Selects the repository for a given lore entry type out of [`Repositories`].
pub trait LoreSlot: LoreEntry {
    /// Returns the repository that stores `Self`.
    fn repository(repos: &Repositories) -> &dyn LoreRepository<Self>;
}

macro_rules! lore_slot {
    ($ty:ty, $field:ident) => {
        impl LoreSlot for $ty {
            fn repository(repos: &Repositories) -> &dyn LoreRepository<Self> {
                repos.$field.as_ref()
            }
        }
    };
}

lore_slot!(Character, characters);
lore_slot!(Relation, relations);
lore_slot!(Location, locations);
lore_slot!(Note, notes);
lore_slot!(Tag, tags);
lore_slot!(WorldRule, world_rules);
