//! Entity builders with sensible defaults.

use chrono::{DateTime, TimeZone, Utc};
use storyloom_core::model::{Chapter, Choice, Scene, Story, StoryType, new_id};
use uuid::Uuid;

/// Fixed timestamp shared by fixtures.
///
/// # Panics
///
/// Never; the literal date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// A story owned by `owner_id`.
#[must_use]
pub fn story(owner_id: Uuid, story_type: StoryType) -> Story {
    Story {
        id: new_id(),
        owner_id,
        title: "The Lighthouse Keeper".to_owned(),
        synopsis: None,
        story_type,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

/// A chapter of `story_id` at position 0.
#[must_use]
pub fn chapter(story_id: Uuid) -> Chapter {
    Chapter {
        id: new_id(),
        story_id,
        title: "Arrival".to_owned(),
        index: 0,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

/// A scene of `chapter_id` with the given title and index.
#[must_use]
pub fn scene(chapter_id: Uuid, title: &str, index: i32) -> Scene {
    Scene {
        id: new_id(),
        chapter_id,
        title: title.to_owned(),
        content: String::new(),
        index,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

/// A user-authored choice `from -> to`.
#[must_use]
pub fn explicit_choice(from: Uuid, to: Uuid, text: &str) -> Choice {
    Choice {
        id: new_id(),
        scene_id: from,
        next_scene_id: to,
        text: text.to_owned(),
        is_implicit: false,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}
