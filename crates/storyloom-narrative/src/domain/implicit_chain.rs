//! Derivation of the implicit choice chain of a linear chapter.
//!
//! In a linear story every scene leads to the scene that follows it by
//! index. Those links are stored as ordinary choices flagged
//! `is_implicit`; this module computes which of them have to be dropped and
//! which created so that a chapter holds exactly one link per adjacent pair.

use chrono::{DateTime, Utc};
use storyloom_core::model::{Choice, ImplicitChainRewrite, Scene};
use uuid::Uuid;

/// Sorts scenes into narrative order: ascending `index`, keeping load order
/// among scenes that share an index.
#[must_use]
pub fn narrative_order(mut scenes: Vec<Scene>) -> Vec<Scene> {
    scenes.sort_by_key(|s| s.index);
    scenes
}

/// The `(from, to)` scene pairs a chapter's chain must consist of.
#[must_use]
pub fn chain_links(ordered: &[Scene]) -> Vec<(Uuid, Uuid)> {
    ordered.windows(2).map(|w| (w[0].id, w[1].id)).collect()
}

/// Plans the rewrite that brings a chapter's implicit choices in line with
/// `ordered`.
///
/// `existing` holds every choice currently offered by the chapter's scenes;
/// explicit ones are ignored. When the implicit choices already form the
/// wanted chain, the returned rewrite is empty.
pub fn plan_rewrite(
    chapter_id: Uuid,
    ordered: &[Scene],
    existing: &[Choice],
    now: DateTime<Utc>,
    mut next_id: impl FnMut() -> Uuid,
) -> ImplicitChainRewrite {
    let wanted = chain_links(ordered);
    let stale: Vec<Choice> = existing.iter().filter(|c| c.is_implicit).cloned().collect();

    let mut current: Vec<(Uuid, Uuid)> = stale
        .iter()
        .map(|c| (c.scene_id, c.next_scene_id))
        .collect();
    let mut target = wanted.clone();
    current.sort_unstable();
    target.sort_unstable();
    if current == target {
        return ImplicitChainRewrite {
            chapter_id,
            ..ImplicitChainRewrite::default()
        };
    }

    let added = wanted
        .into_iter()
        .map(|(from, to)| Choice::implicit(next_id(), from, to, now))
        .collect();

    ImplicitChainRewrite {
        chapter_id,
        removed: stale,
        added,
    }
}
