//! Entity model shared by all contexts.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod chapter;
mod choice;
pub mod lore;
mod scene;
mod story;

pub use chapter::Chapter;
pub use choice::{Choice, IMPLICIT_CHOICE_TEXT, ImplicitChainRewrite};
pub use lore::{
    Character, CharacterDraft, CharacterPatch, Location, LocationDraft, LocationPatch, LoreEntry,
    Note, NoteDraft, NotePatch, Relation, RelationDraft, RelationPatch, Tag, TagDraft, TagPatch,
    WorldRule, WorldRuleDraft, WorldRulePatch,
};
pub use scene::Scene;
pub use story::{Story, StoryType};

/// Generates a new time-ordered entity identifier.
#[must_use]
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// Every kind of entity a story can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A story.
    Story,
    /// A chapter of a story.
    Chapter,
    /// A scene inside a chapter.
    Scene,
    /// A navigation link between scenes.
    Choice,
    /// A character.
    Character,
    /// A relation between two characters.
    Relation,
    /// A location.
    Location,
    /// A free-form note.
    Note,
    /// A tag.
    Tag,
    /// A world rule.
    WorldRule,
}

impl EntityKind {
    /// Returns the snake-case name used on the wire and in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Chapter => "chapter",
            Self::Scene => "scene",
            Self::Choice => "choice",
            Self::Character => "character",
            Self::Relation => "relation",
            Self::Location => "location",
            Self::Note => "note",
            Self::Tag => "tag",
            Self::WorldRule => "world_rule",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
