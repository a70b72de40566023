//! Command handlers for the Lore context.

use storyloom_core::access::load_story_for;
use storyloom_core::clock::Clock;
use storyloom_core::command::Command;
use storyloom_core::error::DomainError;
use storyloom_core::model::{EntityKind, LoreEntry, Story, new_id};
use storyloom_core::repository::{LoreSlot, Repositories};
use tracing::{info, instrument};

use crate::application::query_handlers::get_entry;
use crate::domain::commands::{CreateEntry, DeleteEntry, UpdateEntry};

/// Checks cross-entry constraints before `entry` is written.
async fn check_consistency<T: LoreSlot>(
    entry: &T,
    story: &Story,
    repos: &Repositories,
) -> Result<(), DomainError> {
    for character_id in entry.referenced_characters() {
        let in_story = repos
            .characters
            .find_by_id(character_id)
            .await?
            .is_some_and(|c| c.story_id == story.id);
        if !in_story {
            return Err(DomainError::Validation(format!(
                "character {character_id} is not part of story {}",
                story.id
            )));
        }
    }

    if let Some(name) = entry.unique_name() {
        let taken = T::repository(repos)
            .find_by_story_id(story.id)
            .await?
            .iter()
            .filter(|other| other.id() != entry.id())
            .any(|other| {
                other
                    .unique_name()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            });
        if taken {
            return Err(DomainError::Conflict(format!(
                "a {} named \"{name}\" already exists in this story",
                T::KIND
            )));
        }
    }
    Ok(())
}

/// Handles the `CreateEntry` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for invalid payloads or characters from
/// another story, `DomainError::Conflict` for a duplicate name,
/// `DomainError::NotFound`/`Forbidden` if the story is not accessible, and
/// propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, story_id = %command.story_id, kind = %T::KIND))]
pub async fn handle_create_entry<T: LoreSlot>(
    command: CreateEntry<T>,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<T, DomainError> {
    let story = load_story_for(command.actor(), command.story_id, repos).await?;
    let command_type = command.command_type();
    let entry = T::from_draft(new_id(), story.id, command.draft, clock.now())?;
    check_consistency(&entry, &story, repos).await?;

    T::repository(repos).insert(&entry).await?;

    info!(command = command_type, entry_id = %entry.id(), "lore entry created");
    Ok(entry)
}

/// Handles the `UpdateEntry` command.
///
/// # Errors
///
/// Same as [`handle_create_entry`], plus `DomainError::NotFound` for an
/// unknown entry.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, entry_id = %command.entry_id, kind = %T::KIND))]
pub async fn handle_update_entry<T: LoreSlot>(
    command: UpdateEntry<T>,
    clock: &dyn Clock,
    repos: &Repositories,
) -> Result<T, DomainError> {
    let mut entry: T = get_entry(command.actor(), command.entry_id, repos).await?;
    let story = load_story_for(command.actor(), entry.story_id(), repos).await?;
    let command_type = command.command_type();

    entry.apply_patch(command.patch, clock.now())?;
    check_consistency(&entry, &story, repos).await?;

    T::repository(repos).update(&entry).await?;

    info!(command = command_type, "lore entry updated");
    Ok(entry)
}

/// Handles the `DeleteEntry` command. Deleting a character also removes the
/// relations it takes part in.
///
/// # Errors
///
/// Returns `DomainError::NotFound`/`Forbidden` if the entry is not
/// accessible and propagates persistence failures.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, entry_id = %command.entry_id, kind = %T::KIND))]
pub async fn handle_delete_entry<T: LoreSlot>(
    command: &DeleteEntry<T>,
    repos: &Repositories,
) -> Result<bool, DomainError> {
    let entry: T = get_entry(command.actor(), command.entry_id, repos).await?;

    if T::KIND == EntityKind::Character {
        let relations = repos.relations.find_by_story_id(entry.story_id()).await?;
        for relation in relations
            .iter()
            .filter(|r| r.referenced_characters().contains(&entry.id()))
        {
            repos.relations.delete(relation.id).await?;
        }
    }
    T::repository(repos).delete(entry.id()).await?;

    info!(command = command.command_type(), "lore entry deleted");
    Ok(true)
}
