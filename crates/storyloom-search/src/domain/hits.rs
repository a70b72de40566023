//! Search results and matching rules.

use serde::Serialize;
use storyloom_core::error::DomainError;
use storyloom_core::model::{
    Chapter, Character, Location, Note, Relation, Scene, Story, Tag, WorldRule,
};

/// One matching entity, serialized as `{ "kind": ..., "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SearchHit {
    Story(Story),
    Chapter(Chapter),
    Scene(Scene),
    Character(Character),
    Relation(Relation),
    Location(Location),
    Note(Note),
    Tag(Tag),
    WorldRule(WorldRule),
}

/// A normalized, non-empty search needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle(String);

impl Needle {
    /// Normalizes a raw query.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the query is blank.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("search query must not be empty".into()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns `true` if any of `fields` contains the needle, ignoring case.
    #[must_use]
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&self.0))
    }

    /// The normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
