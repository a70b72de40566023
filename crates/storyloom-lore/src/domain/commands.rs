//! Commands for the Lore context.

use std::marker::PhantomData;

use storyloom_core::access::Actor;
use storyloom_core::command::Command;
use storyloom_core::model::LoreEntry;
use uuid::Uuid;

/// Command to add an entry of kind `T` to a story.
#[derive(Debug)]
pub struct CreateEntry<T: LoreEntry> {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The story receiving the entry.
    pub story_id: Uuid,
    /// Creation payload.
    pub draft: T::Draft,
}

impl<T: LoreEntry> Command for CreateEntry<T> {
    fn command_type(&self) -> &'static str {
        "lore.create_entry"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to partially update an entry of kind `T`.
#[derive(Debug)]
pub struct UpdateEntry<T: LoreEntry> {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The entry to edit.
    pub entry_id: Uuid,
    /// Fields to change.
    pub patch: T::Patch,
}

impl<T: LoreEntry> Command for UpdateEntry<T> {
    fn command_type(&self) -> &'static str {
        "lore.update_entry"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to delete an entry of kind `T`.
#[derive(Debug)]
pub struct DeleteEntry<T: LoreEntry> {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The entry to delete.
    pub entry_id: Uuid,
    kind: PhantomData<fn() -> T>,
}

impl<T: LoreEntry> DeleteEntry<T> {
    /// Creates a new `DeleteEntry` command.
    #[must_use]
    pub fn new(correlation_id: Uuid, actor: Actor, entry_id: Uuid) -> Self {
        Self {
            correlation_id,
            actor,
            entry_id,
            kind: PhantomData,
        }
    }
}

impl<T: LoreEntry> Command for DeleteEntry<T> {
    fn command_type(&self) -> &'static str {
        "lore.delete_entry"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}
