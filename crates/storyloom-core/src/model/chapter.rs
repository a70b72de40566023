//! Chapters group scenes within a story.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chapter groups scenes inside a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter identifier.
    pub id: Uuid,
    /// Parent story.
    pub story_id: Uuid,
    /// Display title.
    pub title: String,
    /// Position among the story's chapters.
    pub index: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
