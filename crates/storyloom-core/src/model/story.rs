//! Stories and their linear or branching type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// How scene-to-scene navigation is produced for a story.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryType {
    /// Scenes follow each other strictly by index; choices are derived.
    #[default]
    Linear,
    /// Choices are authored explicitly.
    Branching,
}

impl StoryType {
    /// Returns the persisted name of this type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Branching => "branching",
        }
    }

    /// Checks whether a story of this type may become `next`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for `branching -> linear`.
    pub fn transition_to(self, next: Self) -> Result<Self, DomainError> {
        match (self, next) {
            (Self::Branching, Self::Linear) => Err(DomainError::Validation(
                "a branching story cannot be converted back to linear".into(),
            )),
            _ => Ok(next),
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "branching" => Ok(Self::Branching),
            other => Err(DomainError::Validation(format!(
                "unknown story type: {other}"
            ))),
        }
    }
}

/// A writing project owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Story identifier.
    pub id: Uuid,
    /// The user who owns the story.
    pub owner_id: Uuid,
    /// Display title.
    pub title: String,
    /// Optional short synopsis.
    pub synopsis: Option<String>,
    /// Navigation mode.
    pub story_type: StoryType,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
