//! Scenes and their position within a chapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of narrative inside a chapter.
///
/// `index` orders scenes within their chapter. It is not unique; when two
/// scenes share an index the one written most recently sorts last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier.
    pub id: Uuid,
    /// Owning chapter.
    pub chapter_id: Uuid,
    /// Display title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Narrative position within the chapter.
    pub index: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
