//! Query handlers for the Lore context.

use storyloom_core::access::{Actor, load_story_for};
use storyloom_core::error::DomainError;
use storyloom_core::repository::{LoreSlot, Repositories};
use uuid::Uuid;

/// Loads an entry and checks the actor may access its story.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the entry or its story is missing and
/// `DomainError::Forbidden` if the story belongs to someone else.
pub async fn get_entry<T: LoreSlot>(
    actor: &Actor,
    entry_id: Uuid,
    repos: &Repositories,
) -> Result<T, DomainError> {
    let entry = T::repository(repos)
        .find_by_id(entry_id)
        .await?
        .ok_or_else(|| DomainError::not_found(T::KIND, entry_id))?;
    load_story_for(actor, entry.story_id(), repos).await?;
    Ok(entry)
}

/// Lists a story's entries of kind `T`, oldest first.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the story is missing and
/// `DomainError::Forbidden` if it belongs to someone else.
pub async fn list_entries<T: LoreSlot>(
    actor: &Actor,
    story_id: Uuid,
    repos: &Repositories,
) -> Result<Vec<T>, DomainError> {
    let story = load_story_for(actor, story_id, repos).await?;
    T::repository(repos).find_by_story_id(story.id).await
}
