//! Worldbuilding entries that hang directly off a story.
//!
//! Characters, relations, locations, notes, tags and world rules share one
//! lifecycle (create, read, list by story, patch, delete), captured by the
//! [`LoreEntry`] trait so that handlers, routes and repositories can be
//! written once.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityKind;
use crate::error::DomainError;
use crate::validation::{optional_text, required_text};

/// Behavior shared by all story-scoped worldbuilding entries.
pub trait LoreEntry: Clone + Debug + Serialize + Send + Sync + 'static {
    /// Payload accepted when creating an entry.
    type Draft: DeserializeOwned + Debug + Send + Sync + 'static;
    /// Payload accepted when partially updating an entry.
    type Patch: DeserializeOwned + Debug + Send + Sync + 'static;

    /// The entity kind, used in errors and search results.
    const KIND: EntityKind;

    /// Entry identifier.
    fn id(&self) -> Uuid;

    /// The story the entry belongs to.
    fn story_id(&self) -> Uuid;

    /// Builds a validated entry from a creation payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a required field is blank.
    fn from_draft(
        id: Uuid,
        story_id: Uuid,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError>;

    /// Merges the fields present in `patch`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a required field is blanked.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>) -> Result<(), DomainError>;

    /// Text fields matched by global search.
    fn search_fields(&self) -> Vec<&str>;

    /// Characters this entry points at; they must live in the same story.
    fn referenced_characters(&self) -> Vec<Uuid> {
        Vec::new()
    }

    /// A name that must be unique (case-insensitively) within the story.
    fn unique_name(&self) -> Option<&str> {
        None
    }
}

fn opt_fields<'a>(fields: impl IntoIterator<Item = &'a Option<String>>) -> impl Iterator<Item = &'a str> {
    fields.into_iter().filter_map(Option::as_deref)
}

// --- characters ---

/// A person (or creature) appearing in the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Character identifier.
    pub id: Uuid,
    /// Parent story.
    pub story_id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Narrative role (protagonist, mentor, ...).
    pub role: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for [`Character`].
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterDraft {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Narrative role.
    pub role: Option<String>,
}

/// Partial update for [`Character`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New role.
    pub role: Option<String>,
}

impl LoreEntry for Character {
    type Draft = CharacterDraft;
    type Patch = CharacterPatch;

    const KIND: EntityKind = EntityKind::Character;

    fn id(&self) -> Uuid {
        self.id
    }

    fn story_id(&self) -> Uuid {
        self.story_id
    }

    fn from_draft(
        id: Uuid,
        story_id: Uuid,
        draft: CharacterDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            story_id,
            name: required_text("name", &draft.name)?,
            description: optional_text(draft.description),
            role: optional_text(draft.role),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: CharacterPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(name) = patch.name {
            self.name = required_text("name", &name)?;
        }
        if patch.description.is_some() {
            self.description = optional_text(patch.description);
        }
        if patch.role.is_some() {
            self.role = optional_text(patch.role);
        }
        self.updated_at = now;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(opt_fields([&self.description, &self.role]))
            .collect()
    }
}

// --- relations ---

/// A directed relationship between two characters of the same story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation identifier.
    pub id: Uuid,
    /// Parent story.
    pub story_id: Uuid,
    /// The character the relation starts from.
    pub from_character_id: Uuid,
    /// The character the relation points to.
    pub to_character_id: Uuid,
    /// Kind of relationship (sibling, rival, ...).
    pub kind: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for [`Relation`].
#[derive(Debug, Clone, Deserialize)]
pub struct RelationDraft {
    /// Source character.
    pub from_character_id: Uuid,
    /// Target character.
    pub to_character_id: Uuid,
    /// Kind of relationship.
    pub kind: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// Partial update for [`Relation`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationPatch {
    /// New source character.
    pub from_character_id: Option<Uuid>,
    /// New target character.
    pub to_character_id: Option<Uuid>,
    /// New kind.
    pub kind: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl Relation {
    fn check_endpoints(&self) -> Result<(), DomainError> {
        if self.from_character_id == self.to_character_id {
            return Err(DomainError::Validation(
                "a relation must connect two different characters".into(),
            ));
        }
        Ok(())
    }
}

impl LoreEntry for Relation {
    type Draft = RelationDraft;
    type Patch = RelationPatch;

    const KIND: EntityKind = EntityKind::Relation;

    fn id(&self) -> Uuid {
        self.id
    }

    fn story_id(&self) -> Uuid {
        self.story_id
    }

    fn from_draft(
        id: Uuid,
        story_id: Uuid,
        draft: RelationDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let relation = Self {
            id,
            story_id,
            from_character_id: draft.from_character_id,
            to_character_id: draft.to_character_id,
            kind: required_text("kind", &draft.kind)?,
            description: optional_text(draft.description),
            created_at: now,
            updated_at: now,
        };
        relation.check_endpoints()?;
        Ok(relation)
    }

    fn apply_patch(&mut self, patch: RelationPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(from) = patch.from_character_id {
            self.from_character_id = from;
        }
        if let Some(to) = patch.to_character_id {
            self.to_character_id = to;
        }
        if let Some(kind) = patch.kind {
            self.kind = required_text("kind", &kind)?;
        }
        if patch.description.is_some() {
            self.description = optional_text(patch.description);
        }
        self.check_endpoints()?;
        self.updated_at = now;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.kind.as_str())
            .chain(opt_fields([&self.description]))
            .collect()
    }

    fn referenced_characters(&self) -> Vec<Uuid> {
        vec![self.from_character_id, self.to_character_id]
    }
}

// --- locations ---

/// A place in the story's world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Location identifier.
    pub id: Uuid,
    /// Parent story.
    pub story_id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for [`Location`].
#[derive(Debug, Clone, Deserialize)]
pub struct LocationDraft {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// Partial update for [`Location`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl LoreEntry for Location {
    type Draft = LocationDraft;
    type Patch = LocationPatch;

    const KIND: EntityKind = EntityKind::Location;

    fn id(&self) -> Uuid {
        self.id
    }

    fn story_id(&self) -> Uuid {
        self.story_id
    }

    fn from_draft(
        id: Uuid,
        story_id: Uuid,
        draft: LocationDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            story_id,
            name: required_text("name", &draft.name)?,
            description: optional_text(draft.description),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: LocationPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(name) = patch.name {
            self.name = required_text("name", &name)?;
        }
        if patch.description.is_some() {
            self.description = optional_text(patch.description);
        }
        self.updated_at = now;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(opt_fields([&self.description]))
            .collect()
    }
}

// --- notes ---

/// A free-form research or planning note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note identifier.
    pub id: Uuid,
    /// Parent story.
    pub story_id: Uuid,
    /// Note title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for [`Note`].
#[derive(Debug, Clone, Deserialize)]
pub struct NoteDraft {
    /// Note title.
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
}

/// Partial update for [`Note`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePatch {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
}

impl LoreEntry for Note {
    type Draft = NoteDraft;
    type Patch = NotePatch;

    const KIND: EntityKind = EntityKind::Note;

    fn id(&self) -> Uuid {
        self.id
    }

    fn story_id(&self) -> Uuid {
        self.story_id
    }

    fn from_draft(
        id: Uuid,
        story_id: Uuid,
        draft: NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            story_id,
            title: required_text("title", &draft.title)?,
            content: draft.content,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: NotePatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(title) = patch.title {
            self.title = required_text("title", &title)?;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = now;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }
}

// --- tags ---

/// A label used to organize a story's material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier.
    pub id: Uuid,
    /// Parent story.
    pub story_id: Uuid,
    /// Tag name, unique per story ignoring case.
    pub name: String,
    /// Optional display color (e.g. `#aa3300`).
    pub color: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for [`Tag`].
#[derive(Debug, Clone, Deserialize)]
pub struct TagDraft {
    /// Tag name.
    pub name: String,
    /// Display color.
    pub color: Option<String>,
}

/// Partial update for [`Tag`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagPatch {
    /// New name.
    pub name: Option<String>,
    /// New color.
    pub color: Option<String>,
}

impl LoreEntry for Tag {
    type Draft = TagDraft;
    type Patch = TagPatch;

    const KIND: EntityKind = EntityKind::Tag;

    fn id(&self) -> Uuid {
        self.id
    }

    fn story_id(&self) -> Uuid {
        self.story_id
    }

    fn from_draft(
        id: Uuid,
        story_id: Uuid,
        draft: TagDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            story_id,
            name: required_text("name", &draft.name)?,
            color: optional_text(draft.color),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: TagPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(name) = patch.name {
            self.name = required_text("name", &name)?;
        }
        if patch.color.is_some() {
            self.color = optional_text(patch.color);
        }
        self.updated_at = now;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn unique_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

// --- world rules ---

/// A rule of the story's world (magic system, physics, politics, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRule {
    /// Rule identifier.
    pub id: Uuid,
    /// Parent story.
    pub story_id: Uuid,
    /// Short title.
    pub title: String,
    /// Full statement of the rule.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for [`WorldRule`].
#[derive(Debug, Clone, Deserialize)]
pub struct WorldRuleDraft {
    /// Short title.
    pub title: String,
    /// Full statement.
    #[serde(default)]
    pub description: String,
}

/// Partial update for [`WorldRule`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldRulePatch {
    /// New title.
    pub title: Option<String>,
    /// New statement.
    pub description: Option<String>,
}

impl LoreEntry for WorldRule {
    type Draft = WorldRuleDraft;
    type Patch = WorldRulePatch;

    const KIND: EntityKind = EntityKind::WorldRule;

    fn id(&self) -> Uuid {
        self.id
    }

    fn story_id(&self) -> Uuid {
        self.story_id
    }

    fn from_draft(
        id: Uuid,
        story_id: Uuid,
        draft: WorldRuleDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            story_id,
            title: required_text("title", &draft.title)?,
            description: draft.description,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: WorldRulePatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(title) = patch.title {
            self.title = required_text("title", &title)?;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = now;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}
