//! Query handlers for the Search context.

use storyloom_core::access::Actor;
use storyloom_core::error::DomainError;
use storyloom_core::model::{Character, Location, Note, Relation, Story, Tag, WorldRule};
use storyloom_core::repository::{LoreSlot, Repositories};
use tracing::{debug, instrument};

use crate::domain::hits::{Needle, SearchHit};

/// Query for everything matching `query` in the actor's stories.
#[derive(Debug, Clone)]
pub struct Search {
    /// Free-text query.
    pub query: String,
}

async fn search_lore<T: LoreSlot>(
    story: &Story,
    needle: &Needle,
    repos: &Repositories,
    wrap: fn(T) -> SearchHit,
    hits: &mut Vec<SearchHit>,
) -> Result<(), DomainError> {
    let entries = T::repository(repos).find_by_story_id(story.id).await?;
    hits.extend(
        entries
            .into_iter()
            .filter(|entry| needle.matches_any(entry.search_fields()))
            .map(wrap),
    );
    Ok(())
}

async fn search_story(
    story: Story,
    needle: &Needle,
    repos: &Repositories,
    hits: &mut Vec<SearchHit>,
) -> Result<(), DomainError> {
    for chapter in repos.chapters.find_by_story_id(story.id).await? {
        let mut scenes = repos.scenes.find_by_chapter_id(chapter.id).await?;
        scenes.sort_by_key(|s| s.index);
        if needle.matches_any([chapter.title.as_str()]) {
            hits.push(SearchHit::Chapter(chapter));
        }
        hits.extend(
            scenes
                .into_iter()
                .filter(|s| needle.matches_any([s.title.as_str(), s.content.as_str()]))
                .map(SearchHit::Scene),
        );
    }

    search_lore::<Character>(&story, needle, repos, SearchHit::Character, hits).await?;
    search_lore::<Relation>(&story, needle, repos, SearchHit::Relation, hits).await?;
    search_lore::<Location>(&story, needle, repos, SearchHit::Location, hits).await?;
    search_lore::<Note>(&story, needle, repos, SearchHit::Note, hits).await?;
    search_lore::<Tag>(&story, needle, repos, SearchHit::Tag, hits).await?;
    search_lore::<WorldRule>(&story, needle, repos, SearchHit::WorldRule, hits).await?;

    if needle.matches_any(std::iter::once(story.title.as_str()).chain(story.synopsis.as_deref())) {
        hits.insert(0, SearchHit::Story(story));
    }
    Ok(())
}

/// Searches the actor's stories and everything inside them.
///
/// Hits are grouped per story: the story itself, then chapters each followed
/// by their scenes, then lore entries by kind.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank query and propagates
/// persistence failures.
#[instrument(skip(repos), fields(user_id = %actor.user_id))]
pub async fn search(
    actor: &Actor,
    query: &Search,
    repos: &Repositories,
) -> Result<Vec<SearchHit>, DomainError> {
    let needle = Needle::parse(&query.query)?;

    let mut hits = Vec::new();
    for story in repos.stories.find_by_owner(actor.user_id).await? {
        let mut story_hits = Vec::new();
        search_story(story, &needle, repos, &mut story_hits).await?;
        hits.append(&mut story_hits);
    }

    debug!(needle = needle.as_str(), hits = hits.len(), "search finished");
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storyloom_core::model::{LoreEntry, StoryType, TagDraft, new_id};
    use storyloom_core::repository::{ChapterRepository, SceneRepository, StoryRepository};
    use storyloom_test_support::fixtures::{chapter, fixed_now, scene, story};
    use storyloom_test_support::{FailingStore, InMemoryStore};
    use uuid::Uuid;

    use super::*;

    async fn seed(store: &Arc<InMemoryStore>, repos: &Repositories, owner: Uuid) -> Story {
        let mut novel = story(owner, StoryType::Linear);
        novel.title = "Salt and Lantern".into();
        StoryRepository::insert(store.as_ref(), &novel).await.unwrap();
        let opening = chapter(novel.id);
        ChapterRepository::insert(store.as_ref(), &opening)
            .await
            .unwrap();
        let mut storm = scene(opening.id, "The Storm", 0);
        storm.content = "The LANTERN swung in the wind.".into();
        SceneRepository::insert(store.as_ref(), &storm).await.unwrap();
        SceneRepository::insert(store.as_ref(), &scene(opening.id, "Morning", 1))
            .await
            .unwrap();
        let tag = Tag::from_draft(
            new_id(),
            novel.id,
            TagDraft {
                name: "lanterns".into(),
                color: None,
            },
            fixed_now(),
        )
        .unwrap();
        repos.tags.insert(&tag).await.unwrap();
        novel
    }

    #[tokio::test]
    async fn test_search_finds_matches_at_every_level() {
        // Arrange
        let store = InMemoryStore::new();
        let repos = store.repositories();
        let owner = Uuid::new_v4();
        seed(&store, &repos, owner).await;

        // Act
        let hits = search(
            &Actor::author(owner),
            &Search {
                query: "lantern".into(),
            },
            &repos,
        )
        .await
        .unwrap();

        // Assert
        let kinds: Vec<&str> = hits
            .iter()
            .map(|hit| match hit {
                SearchHit::Story(_) => "story",
                SearchHit::Scene(_) => "scene",
                SearchHit::Tag(_) => "tag",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["story", "scene", "tag"]);
    }

    #[tokio::test]
    async fn test_search_ignores_other_authors_stories() {
        // Arrange
        let store = InMemoryStore::new();
        let repos = store.repositories();
        seed(&store, &repos, Uuid::new_v4()).await;

        // Act
        let hits = search(
            &Actor::author(Uuid::new_v4()),
            &Search {
                query: "lantern".into(),
            },
            &repos,
        )
        .await
        .unwrap();

        // Assert
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        // Arrange
        let repos = InMemoryStore::new().repositories();

        // Act
        let result = search(
            &Actor::author(Uuid::new_v4()),
            &Search { query: "  ".into() },
            &repos,
        )
        .await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_propagates_repository_failure() {
        // Act
        let result = search(
            &Actor::author(Uuid::new_v4()),
            &Search {
                query: "storm".into(),
            },
            &FailingStore::repositories(),
        )
        .await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
