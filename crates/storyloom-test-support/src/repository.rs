//! Test repositories — in-memory and failing implementations of the
//! repository traits.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storyloom_core::error::DomainError;
use storyloom_core::model::{
    Chapter, Character, Choice, ImplicitChainRewrite, Location, LoreEntry, Note, Relation, Scene,
    Story, Tag, WorldRule,
};
use storyloom_core::repository::{
    ChapterRepository, ChoiceRepository, LoreRepository, Repositories, SceneRepository,
    StoryRepository,
};
use uuid::Uuid;

/// An in-memory store for stories, chapters, scenes and choices.
///
/// Rows are kept in insertion order. Updating a scene moves it to the end,
/// mirroring the "least recently written first" load order of the
/// PostgreSQL repository.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    stories: Mutex<Vec<Story>>,
    chapters: Mutex<Vec<Chapter>>,
    scenes: Mutex<Vec<Scene>>,
    choices: Mutex<Vec<Choice>>,
    chain_rewrites: Mutex<usize>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bundles this store with fresh in-memory lore repositories.
    #[must_use]
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            stories: self.clone(),
            chapters: self.clone(),
            scenes: self.clone(),
            choices: self.clone(),
            characters: Arc::new(InMemoryLore::<Character>::default()),
            relations: Arc::new(InMemoryLore::<Relation>::default()),
            locations: Arc::new(InMemoryLore::<Location>::default()),
            notes: Arc::new(InMemoryLore::<Note>::default()),
            tags: Arc::new(InMemoryLore::<Tag>::default()),
            world_rules: Arc::new(InMemoryLore::<WorldRule>::default()),
        }
    }

    /// Returns a snapshot of every stored choice.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn all_choices(&self) -> Vec<Choice> {
        self.choices.lock().unwrap().clone()
    }

    /// Returns the `(scene_id, next_scene_id)` pairs of every implicit choice,
    /// in storage order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn implicit_pairs(&self) -> Vec<(Uuid, Uuid)> {
        self.choices
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_implicit)
            .map(|c| (c.scene_id, c.next_scene_id))
            .collect()
    }

    /// Returns how many times `rewrite_implicit_chain` was called.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn chain_rewrite_count(&self) -> usize {
        *self.chain_rewrites.lock().unwrap()
    }
}

fn upsert_in_place<T: Clone>(rows: &Mutex<Vec<T>>, row: &T, same: impl Fn(&T) -> bool) {
    let mut rows = rows.lock().unwrap();
    if let Some(existing) = rows.iter_mut().find(|r| same(r)) {
        *existing = row.clone();
    }
}

#[async_trait]
impl StoryRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Story>, DomainError> {
        Ok(self.stories.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Story>, DomainError> {
        Ok(self
            .stories
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, story: &Story) -> Result<(), DomainError> {
        self.stories.lock().unwrap().push(story.clone());
        Ok(())
    }

    async fn update(&self, story: &Story) -> Result<(), DomainError> {
        upsert_in_place(&self.stories, story, |s| s.id == story.id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.stories.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}

#[async_trait]
impl ChapterRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chapter>, DomainError> {
        Ok(self.chapters.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_story_id(&self, story_id: Uuid) -> Result<Vec<Chapter>, DomainError> {
        let mut chapters: Vec<Chapter> = self
            .chapters
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.story_id == story_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| c.index);
        Ok(chapters)
    }

    async fn insert(&self, chapter: &Chapter) -> Result<(), DomainError> {
        self.chapters.lock().unwrap().push(chapter.clone());
        Ok(())
    }

    async fn update(&self, chapter: &Chapter) -> Result<(), DomainError> {
        upsert_in_place(&self.chapters, chapter, |c| c.id == chapter.id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.chapters.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl SceneRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Scene>, DomainError> {
        Ok(self.scenes.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_chapter_id(&self, chapter_id: Uuid) -> Result<Vec<Scene>, DomainError> {
        Ok(self
            .scenes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.chapter_id == chapter_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, scene: &Scene) -> Result<(), DomainError> {
        self.scenes.lock().unwrap().push(scene.clone());
        Ok(())
    }

    async fn update(&self, scene: &Scene) -> Result<(), DomainError> {
        let mut scenes = self.scenes.lock().unwrap();
        if let Some(pos) = scenes.iter().position(|s| s.id == scene.id) {
            scenes.remove(pos);
            scenes.push(scene.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.scenes.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}

#[async_trait]
impl ChoiceRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Choice>, DomainError> {
        Ok(self.choices.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_scene_id(&self, scene_id: Uuid) -> Result<Vec<Choice>, DomainError> {
        Ok(self
            .choices
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.scene_id == scene_id)
            .cloned()
            .collect())
    }

    async fn create(&self, choice: &Choice) -> Result<(), DomainError> {
        self.choices.lock().unwrap().push(choice.clone());
        Ok(())
    }

    async fn update(&self, choice: &Choice) -> Result<(), DomainError> {
        upsert_in_place(&self.choices, choice, |c| c.id == choice.id);
        Ok(())
    }

    async fn delete(&self, choice_id: Uuid, scene_id: Uuid) -> Result<(), DomainError> {
        self.choices
            .lock()
            .unwrap()
            .retain(|c| !(c.id == choice_id && c.scene_id == scene_id));
        Ok(())
    }

    async fn delete_touching_scene(&self, scene_id: Uuid) -> Result<(), DomainError> {
        self.choices
            .lock()
            .unwrap()
            .retain(|c| c.scene_id != scene_id && c.next_scene_id != scene_id);
        Ok(())
    }

    async fn rewrite_implicit_chain(
        &self,
        rewrite: &ImplicitChainRewrite,
    ) -> Result<(), DomainError> {
        *self.chain_rewrites.lock().unwrap() += 1;
        let mut choices = self.choices.lock().unwrap();
        choices.retain(|c| !rewrite.removed.iter().any(|r| r.id == c.id));
        choices.extend(rewrite.added.iter().cloned());
        Ok(())
    }
}

/// An in-memory repository for one kind of lore entry.
///
/// Enforces the per-story unique name of entries that declare one.
#[derive(Debug)]
pub struct InMemoryLore<T> {
    rows: Mutex<Vec<T>>,
}

impl<T> Default for InMemoryLore<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

impl<T: LoreEntry> InMemoryLore<T> {
    fn check_unique(rows: &[T], entry: &T) -> Result<(), DomainError> {
        let Some(name) = entry.unique_name() else {
            return Ok(());
        };
        let taken = rows.iter().any(|r| {
            r.id() != entry.id()
                && r.story_id() == entry.story_id()
                && r.unique_name().is_some_and(|n| n.eq_ignore_ascii_case(name))
        });
        if taken {
            return Err(DomainError::Conflict(format!(
                "{} name already in use: {name}",
                T::KIND
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: LoreEntry> LoreRepository<T> for InMemoryLore<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_story_id(&self, story_id: Uuid) -> Result<Vec<T>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.story_id() == story_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: &T) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Self::check_unique(&rows, entry)?;
        rows.push(entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &T) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        Self::check_unique(&rows, entry)?;
        if let Some(existing) = rows.iter_mut().find(|r| r.id() == entry.id()) {
            *existing = entry.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|r| r.id() != id);
        Ok(())
    }
}

/// A store whose every operation returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    /// Bundles failing implementations of every repository.
    #[must_use]
    pub fn repositories() -> Repositories {
        let store = Arc::new(Self);
        Repositories {
            stories: store.clone(),
            chapters: store.clone(),
            scenes: store.clone(),
            choices: store.clone(),
            characters: store.clone(),
            relations: store.clone(),
            locations: store.clone(),
            notes: store.clone(),
            tags: store.clone(),
            world_rules: store,
        }
    }
}

fn refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl StoryRepository for FailingStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Story>, DomainError> {
        refused()
    }

    async fn find_by_owner(&self, _owner_id: Uuid) -> Result<Vec<Story>, DomainError> {
        refused()
    }

    async fn insert(&self, _story: &Story) -> Result<(), DomainError> {
        refused()
    }

    async fn update(&self, _story: &Story) -> Result<(), DomainError> {
        refused()
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        refused()
    }
}

#[async_trait]
impl ChapterRepository for FailingStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Chapter>, DomainError> {
        refused()
    }

    async fn find_by_story_id(&self, _story_id: Uuid) -> Result<Vec<Chapter>, DomainError> {
        refused()
    }

    async fn insert(&self, _chapter: &Chapter) -> Result<(), DomainError> {
        refused()
    }

    async fn update(&self, _chapter: &Chapter) -> Result<(), DomainError> {
        refused()
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        refused()
    }
}

#[async_trait]
impl SceneRepository for FailingStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Scene>, DomainError> {
        refused()
    }

    async fn find_by_chapter_id(&self, _chapter_id: Uuid) -> Result<Vec<Scene>, DomainError> {
        refused()
    }

    async fn insert(&self, _scene: &Scene) -> Result<(), DomainError> {
        refused()
    }

    async fn update(&self, _scene: &Scene) -> Result<(), DomainError> {
        refused()
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        refused()
    }
}

#[async_trait]
impl ChoiceRepository for FailingStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Choice>, DomainError> {
        refused()
    }

    async fn find_by_scene_id(&self, _scene_id: Uuid) -> Result<Vec<Choice>, DomainError> {
        refused()
    }

    async fn create(&self, _choice: &Choice) -> Result<(), DomainError> {
        refused()
    }

    async fn update(&self, _choice: &Choice) -> Result<(), DomainError> {
        refused()
    }

    async fn delete(&self, _choice_id: Uuid, _scene_id: Uuid) -> Result<(), DomainError> {
        refused()
    }

    async fn delete_touching_scene(&self, _scene_id: Uuid) -> Result<(), DomainError> {
        refused()
    }
}

#[async_trait]
impl<T: LoreEntry> LoreRepository<T> for FailingStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<T>, DomainError> {
        refused()
    }

    async fn find_by_story_id(&self, _story_id: Uuid) -> Result<Vec<T>, DomainError> {
        refused()
    }

    async fn insert(&self, _entry: &T) -> Result<(), DomainError> {
        refused()
    }

    async fn update(&self, _entry: &T) -> Result<(), DomainError> {
        refused()
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        refused()
    }
}
