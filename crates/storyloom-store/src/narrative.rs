//! Scene and choice tables.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};
use storyloom_core::error::DomainError;
use storyloom_core::model::{Choice, ImplicitChainRewrite, Scene};
use storyloom_core::repository::{ChoiceRepository, SceneRepository};
use tracing::debug;
use uuid::Uuid;

use crate::error::db_error;

const SCENE_COLUMNS: &str = "id, chapter_id, title, content, position, created_at, updated_at";
const CHOICE_COLUMNS: &str =
    "id, scene_id, next_scene_id, text, is_implicit, created_at, updated_at";

fn scene_from_row(row: &PgRow) -> Scene {
    Scene {
        id: row.get("id"),
        chapter_id: row.get("chapter_id"),
        title: row.get("title"),
        content: row.get("content"),
        index: row.get("position"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn choice_from_row(row: &PgRow) -> Choice {
    Choice {
        id: row.get("id"),
        scene_id: row.get("scene_id"),
        next_scene_id: row.get("next_scene_id"),
        text: row.get("text"),
        is_implicit: row.get("is_implicit"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// PostgreSQL-backed scene repository.
#[derive(Debug, Clone)]
pub struct PgSceneRepository {
    pool: PgPool,
}

impl PgSceneRepository {
    /// Creates a new `PgSceneRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SceneRepository for PgSceneRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Scene>, DomainError> {
        let row = sqlx::query(&format!("SELECT {SCENE_COLUMNS} FROM scenes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.as_ref().map(scene_from_row))
    }

    async fn find_by_chapter_id(&self, chapter_id: Uuid) -> Result<Vec<Scene>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {SCENE_COLUMNS} FROM scenes WHERE chapter_id = $1 ORDER BY updated_at, id"
        ))
        .bind(chapter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.iter().map(scene_from_row).collect())
    }

    async fn insert(&self, scene: &Scene) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO scenes (id, chapter_id, title, content, position, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(scene.id)
        .bind(scene.chapter_id)
        .bind(&scene.title)
        .bind(&scene.content)
        .bind(scene.index)
        .bind(scene.created_at)
        .bind(scene.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, scene: &Scene) -> Result<(), DomainError> {
        sqlx::query(
            r"
            UPDATE scenes
            SET chapter_id = $2, title = $3, content = $4, position = $5, updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(scene.id)
        .bind(scene.chapter_id)
        .bind(&scene.title)
        .bind(&scene.content)
        .bind(scene.index)
        .bind(scene.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

/// PostgreSQL-backed choice repository.
#[derive(Debug, Clone)]
pub struct PgChoiceRepository {
    pool: PgPool,
}

impl PgChoiceRepository {
    /// Creates a new `PgChoiceRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_choice<'e>(
    executor: impl PgExecutor<'e>,
    choice: &Choice,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO choices (id, scene_id, next_scene_id, text, is_implicit, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(choice.id)
    .bind(choice.scene_id)
    .bind(choice.next_scene_id)
    .bind(&choice.text)
    .bind(choice.is_implicit)
    .bind(choice.created_at)
    .bind(choice.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl ChoiceRepository for PgChoiceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Choice>, DomainError> {
        let row = sqlx::query(&format!("SELECT {CHOICE_COLUMNS} FROM choices WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.as_ref().map(choice_from_row))
    }

    async fn find_by_scene_id(&self, scene_id: Uuid) -> Result<Vec<Choice>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {CHOICE_COLUMNS} FROM choices WHERE scene_id = $1 ORDER BY created_at, id"
        ))
        .bind(scene_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.iter().map(choice_from_row).collect())
    }

    async fn create(&self, choice: &Choice) -> Result<(), DomainError> {
        insert_choice(&self.pool, choice).await.map_err(db_error)
    }

    async fn update(&self, choice: &Choice) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE choices SET next_scene_id = $2, text = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(choice.id)
        .bind(choice.next_scene_id)
        .bind(&choice.text)
        .bind(choice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn delete(&self, choice_id: Uuid, scene_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM choices WHERE id = $1 AND scene_id = $2")
            .bind(choice_id)
            .bind(scene_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete_touching_scene(&self, scene_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM choices WHERE scene_id = $1 OR next_scene_id = $1")
            .bind(scene_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn rewrite_implicit_chain(
        &self,
        rewrite: &ImplicitChainRewrite,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let stale: Vec<Uuid> = rewrite.removed.iter().map(|c| c.id).collect();
        sqlx::query("DELETE FROM choices WHERE id = ANY($1) AND is_implicit")
            .bind(&stale)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for link in &rewrite.added {
            insert_choice(&mut *tx, link).await.map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        debug!(
            chapter_id = %rewrite.chapter_id,
            removed = stale.len(),
            added = rewrite.added.len(),
            "implicit chain rewritten"
        );
        Ok(())
    }
}
