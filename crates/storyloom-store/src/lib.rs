//! `PostgreSQL` persistence for Storyloom.
//!
//! One repository type per table family, all sharing a single [`PgPool`].
//! The schema lives in the workspace `migrations/` directory.

use std::sync::Arc;

use sqlx::PgPool;
use storyloom_core::model::{Character, Location, Note, Relation, Tag, WorldRule};
use storyloom_core::repository::Repositories;

mod error;
pub mod lore;
pub mod narrative;
pub mod stories;

pub use lore::{LoreTable, PgLoreRepository};
pub use narrative::{PgChoiceRepository, PgSceneRepository};
pub use stories::{PgChapterRepository, PgStoryRepository};

/// Builds every repository around `pool`.
#[must_use]
pub fn repositories(pool: &PgPool) -> Repositories {
    Repositories {
        stories: Arc::new(PgStoryRepository::new(pool.clone())),
        chapters: Arc::new(PgChapterRepository::new(pool.clone())),
        scenes: Arc::new(PgSceneRepository::new(pool.clone())),
        choices: Arc::new(PgChoiceRepository::new(pool.clone())),
        characters: Arc::new(PgLoreRepository::<Character>::new(pool.clone())),
        relations: Arc::new(PgLoreRepository::<Relation>::new(pool.clone())),
        locations: Arc::new(PgLoreRepository::<Location>::new(pool.clone())),
        notes: Arc::new(PgLoreRepository::<Note>::new(pool.clone())),
        tags: Arc::new(PgLoreRepository::<Tag>::new(pool.clone())),
        world_rules: Arc::new(PgLoreRepository::<WorldRule>::new(pool.clone())),
    }
}
