//! Story and chapter tables.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use storyloom_core::error::DomainError;
use storyloom_core::model::{Chapter, Story};
use storyloom_core::repository::{ChapterRepository, StoryRepository};
use uuid::Uuid;

use crate::error::{db_error, decode_text};

const STORY_COLUMNS: &str = "id, owner_id, title, synopsis, story_type, created_at, updated_at";
const CHAPTER_COLUMNS: &str = "id, story_id, title, position, created_at, updated_at";

fn story_from_row(row: &PgRow) -> Result<Story, DomainError> {
    let story_type: String = row.get("story_type");
    Ok(Story {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        synopsis: row.get("synopsis"),
        story_type: decode_text("story_type", &story_type)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn chapter_from_row(row: &PgRow) -> Chapter {
    Chapter {
        id: row.get("id"),
        story_id: row.get("story_id"),
        title: row.get("title"),
        index: row.get("position"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// PostgreSQL-backed story repository.
#[derive(Debug, Clone)]
pub struct PgStoryRepository {
    pool: PgPool,
}

impl PgStoryRepository {
    /// Creates a new `PgStoryRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryRepository for PgStoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Story>, DomainError> {
        let row = sqlx::query(&format!("SELECT {STORY_COLUMNS} FROM stories WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(story_from_row).transpose()
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Story>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {STORY_COLUMNS} FROM stories WHERE owner_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows.iter().map(story_from_row).collect()
    }

    async fn insert(&self, story: &Story) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO stories (id, owner_id, title, synopsis, story_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(story.id)
        .bind(story.owner_id)
        .bind(&story.title)
        .bind(&story.synopsis)
        .bind(story.story_type.as_str())
        .bind(story.created_at)
        .bind(story.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, story: &Story) -> Result<(), DomainError> {
        sqlx::query(
            r"
            UPDATE stories
            SET title = $2, synopsis = $3, story_type = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(story.id)
        .bind(&story.title)
        .bind(&story.synopsis)
        .bind(story.story_type.as_str())
        .bind(story.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

/// PostgreSQL-backed chapter repository.
#[derive(Debug, Clone)]
pub struct PgChapterRepository {
    pool: PgPool,
}

impl PgChapterRepository {
    /// Creates a new `PgChapterRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChapterRepository for PgChapterRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chapter>, DomainError> {
        let row = sqlx::query(&format!("SELECT {CHAPTER_COLUMNS} FROM chapters WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.as_ref().map(chapter_from_row))
    }

    async fn find_by_story_id(&self, story_id: Uuid) -> Result<Vec<Chapter>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE story_id = $1 \
             ORDER BY position, created_at, id"
        ))
        .bind(story_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.iter().map(chapter_from_row).collect())
    }

    async fn insert(&self, chapter: &Chapter) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO chapters (id, story_id, title, position, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(chapter.id)
        .bind(chapter.story_id)
        .bind(&chapter.title)
        .bind(chapter.index)
        .bind(chapter.created_at)
        .bind(chapter.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, chapter: &Chapter) -> Result<(), DomainError> {
        sqlx::query("UPDATE chapters SET title = $2, position = $3, updated_at = $4 WHERE id = $1")
            .bind(chapter.id)
            .bind(&chapter.title)
            .bind(chapter.index)
            .bind(chapter.updated_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM chapters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
