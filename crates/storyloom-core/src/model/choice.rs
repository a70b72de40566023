//! Choices linking one scene to another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text given to every auto-generated choice.
pub const IMPLICIT_CHOICE_TEXT: &str = "Next Scene (Implicit)";

/// A navigation link from one scene to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Choice identifier.
    pub id: Uuid,
    /// The scene the choice is offered in.
    pub scene_id: Uuid,
    /// The scene the choice leads to.
    pub next_scene_id: Uuid,
    /// Label shown to the reader.
    pub text: String,
    /// `true` when generated from scene order rather than authored.
    pub is_implicit: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Choice {
    /// Builds the implicit link `from -> to`.
    #[must_use]
    pub fn implicit(id: Uuid, from: Uuid, to: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            scene_id: from,
            next_scene_id: to,
            text: IMPLICIT_CHOICE_TEXT.to_owned(),
            is_implicit: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Replacement of a chapter's implicit choices.
///
/// Every choice in `removed` is deleted and every choice in `added` is
/// created. Repositories that support transactions apply both halves
/// atomically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImplicitChainRewrite {
    /// The chapter whose chain is being rebuilt.
    pub chapter_id: Uuid,
    /// Stale implicit choices.
    pub removed: Vec<Choice>,
    /// The freshly derived chain, in scene order.
    pub added: Vec<Choice>,
}

impl ImplicitChainRewrite {
    /// Returns `true` when applying the rewrite would not touch storage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}
