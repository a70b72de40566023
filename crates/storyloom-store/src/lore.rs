//! Worldbuilding tables.
//!
//! Every lore kind has its own table with the same `id`, `story_id`,
//! `created_at`, `updated_at` frame; [`LoreTable`] describes the remaining
//! columns so one generic repository serves all of them.

use std::fmt::Write as _;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use storyloom_core::error::DomainError;
use storyloom_core::model::{Character, Location, LoreEntry, Note, Relation, Tag, WorldRule};
use storyloom_core::repository::LoreRepository;
use uuid::Uuid;

use crate::error::db_error;

/// A prepared statement awaiting its bind values.
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Table layout of a lore entry kind.
pub trait LoreTable: LoreEntry {
    /// Table name.
    const TABLE: &'static str;
    /// Kind-specific columns, in bind order.
    const COLUMNS: &'static [&'static str];

    /// Maps a full row onto the entry.
    fn from_row(row: &PgRow) -> Self;

    /// `(created_at, updated_at)`.
    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>);

    /// Binds the kind-specific columns in [`Self::COLUMNS`] order.
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

fn select_sql<T: LoreTable>(filter: &str) -> String {
    format!(
        "SELECT id, story_id, created_at, updated_at, {} FROM {} WHERE {filter} = $1 \
         ORDER BY created_at, id",
        T::COLUMNS.join(", "),
        T::TABLE
    )
}

fn insert_sql<T: LoreTable>() -> String {
    let mut placeholders = String::from("$1, $2, $3, $4");
    for n in 0..T::COLUMNS.len() {
        let _ = write!(placeholders, ", ${}", n + 5);
    }
    format!(
        "INSERT INTO {} (id, story_id, created_at, updated_at, {}) VALUES ({placeholders})",
        T::TABLE,
        T::COLUMNS.join(", ")
    )
}

fn update_sql<T: LoreTable>() -> String {
    let assignments: Vec<String> = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(n, column)| format!("{column} = ${}", n + 3))
        .collect();
    format!(
        "UPDATE {} SET updated_at = $2, {} WHERE id = $1",
        T::TABLE,
        assignments.join(", ")
    )
}

/// PostgreSQL-backed repository for one lore kind.
#[derive(Debug)]
pub struct PgLoreRepository<T> {
    pool: PgPool,
    kind: PhantomData<fn() -> T>,
}

impl<T> Clone for PgLoreRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            kind: PhantomData,
        }
    }
}

impl<T: LoreTable> PgLoreRepository<T> {
    /// Creates a new `PgLoreRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            kind: PhantomData,
        }
    }
}

#[async_trait]
impl<T: LoreTable> LoreRepository<T> for PgLoreRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DomainError> {
        let row = sqlx::query(&select_sql::<T>("id"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.as_ref().map(T::from_row))
    }

    async fn find_by_story_id(&self, story_id: Uuid) -> Result<Vec<T>, DomainError> {
        let rows = sqlx::query(&select_sql::<T>("story_id"))
            .bind(story_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(rows.iter().map(T::from_row).collect())
    }

    async fn insert(&self, entry: &T) -> Result<(), DomainError> {
        let sql = insert_sql::<T>();
        let (created_at, updated_at) = entry.timestamps();
        let query = sqlx::query(&sql)
            .bind(entry.id())
            .bind(entry.story_id())
            .bind(created_at)
            .bind(updated_at);
        entry
            .bind_columns(query)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, entry: &T) -> Result<(), DomainError> {
        let sql = update_sql::<T>();
        let (_, updated_at) = entry.timestamps();
        let query = sqlx::query(&sql).bind(entry.id()).bind(updated_at);
        entry
            .bind_columns(query)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::TABLE))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

impl LoreTable for Character {
    const TABLE: &'static str = "characters";
    const COLUMNS: &'static [&'static str] = &["name", "description", "role"];

    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            story_id: row.get("story_id"),
            name: row.get("name"),
            description: row.get("description"),
            role: row.get("role"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.name)
            .bind(&self.description)
            .bind(&self.role)
    }
}

impl LoreTable for Relation {
    const TABLE: &'static str = "relations";
    const COLUMNS: &'static [&'static str] =
        &["from_character_id", "to_character_id", "kind", "description"];

    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            story_id: row.get("story_id"),
            from_character_id: row.get("from_character_id"),
            to_character_id: row.get("to_character_id"),
            kind: row.get("kind"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.from_character_id)
            .bind(self.to_character_id)
            .bind(&self.kind)
            .bind(&self.description)
    }
}

impl LoreTable for Location {
    const TABLE: &'static str = "locations";
    const COLUMNS: &'static [&'static str] = &["name", "description"];

    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            story_id: row.get("story_id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.name).bind(&self.description)
    }
}

impl LoreTable for Note {
    const TABLE: &'static str = "notes";
    const COLUMNS: &'static [&'static str] = &["title", "content"];

    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            story_id: row.get("story_id"),
            title: row.get("title"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.title).bind(&self.content)
    }
}

impl LoreTable for Tag {
    const TABLE: &'static str = "tags";
    const COLUMNS: &'static [&'static str] = &["name", "color"];

    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            story_id: row.get("story_id"),
            name: row.get("name"),
            color: row.get("color"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.name).bind(&self.color)
    }
}

impl LoreTable for WorldRule {
    const TABLE: &'static str = "world_rules";
    const COLUMNS: &'static [&'static str] = &["title", "description"];

    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            story_id: row.get("story_id"),
            title: row.get("title"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.created_at, self.updated_at)
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.title).bind(&self.description)
    }
}
