//! Commands for the Stories context.

use storyloom_core::access::Actor;
use storyloom_core::command::Command;
use storyloom_core::model::StoryType;
use uuid::Uuid;

macro_rules! impl_command {
    ($ty:ty, $name:literal) => {
        impl Command for $ty {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn actor(&self) -> &Actor {
                &self.actor
            }
        }
    };
}

/// Command to start a new story.
#[derive(Debug, Clone)]
pub struct CreateStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user, who becomes the owner.
    pub actor: Actor,
    /// Story title.
    pub title: String,
    /// Optional synopsis.
    pub synopsis: Option<String>,
    /// Navigation mode; linear when omitted.
    pub story_type: Option<StoryType>,
}

impl_command!(CreateStory, "stories.create_story");

/// Command to edit a story.
#[derive(Debug, Clone)]
pub struct UpdateStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The story to edit.
    pub story_id: Uuid,
    /// New title.
    pub title: Option<String>,
    /// New synopsis; an empty string clears it.
    pub synopsis: Option<String>,
    /// New navigation mode.
    pub story_type: Option<StoryType>,
}

impl_command!(UpdateStory, "stories.update_story");

/// Command to delete a story and everything in it.
#[derive(Debug, Clone)]
pub struct DeleteStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The story to delete.
    pub story_id: Uuid,
}

impl_command!(DeleteStory, "stories.delete_story");

/// Command to add a chapter to a story.
#[derive(Debug, Clone)]
pub struct CreateChapter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The story receiving the chapter.
    pub story_id: Uuid,
    /// Chapter title.
    pub title: String,
    /// Position; defaults to the current chapter count.
    pub index: Option<i32>,
}

impl_command!(CreateChapter, "stories.create_chapter");

/// Command to edit a chapter.
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The chapter to edit.
    pub chapter_id: Uuid,
    /// New title.
    pub title: Option<String>,
    /// New position.
    pub index: Option<i32>,
}

impl_command!(UpdateChapter, "stories.update_chapter");

/// Command to delete a chapter with its scenes.
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The chapter to delete.
    pub chapter_id: Uuid,
}

impl_command!(DeleteChapter, "stories.delete_chapter");
