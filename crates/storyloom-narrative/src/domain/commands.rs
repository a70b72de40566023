//! Commands for the Narrative context.

use storyloom_core::access::Actor;
use storyloom_core::command::Command;
use uuid::Uuid;

/// Command to add a scene to a chapter.
#[derive(Debug, Clone)]
pub struct CreateScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The chapter receiving the scene.
    pub chapter_id: Uuid,
    /// Scene title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Narrative position; defaults to after the chapter's last scene.
    pub index: Option<i32>,
}

impl Command for CreateScene {
    fn command_type(&self) -> &'static str {
        "narrative.create_scene"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to edit a scene, possibly moving it to another chapter.
#[derive(Debug, Clone)]
pub struct UpdateScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The scene to edit.
    pub scene_id: Uuid,
    /// The chapter the caller believes the scene belongs to.
    pub chapter_id: Uuid,
    /// Destination chapter when moving the scene.
    pub move_to_chapter_id: Option<Uuid>,
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New narrative position.
    pub index: Option<i32>,
}

impl Command for UpdateScene {
    fn command_type(&self) -> &'static str {
        "narrative.update_scene"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to remove a scene.
#[derive(Debug, Clone)]
pub struct DeleteScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The scene to remove.
    pub scene_id: Uuid,
}

impl Command for DeleteScene {
    fn command_type(&self) -> &'static str {
        "narrative.delete_scene"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to author a choice between two scenes.
#[derive(Debug, Clone)]
pub struct CreateChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The scene offering the choice.
    pub scene_id: Uuid,
    /// The scene the choice leads to.
    pub next_scene_id: Uuid,
    /// Label; required for explicit choices.
    pub text: Option<String>,
    /// Whether the choice is flagged implicit.
    pub is_implicit: bool,
}

impl Command for CreateChoice {
    fn command_type(&self) -> &'static str {
        "narrative.create_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to edit an explicit choice.
#[derive(Debug, Clone)]
pub struct UpdateChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The choice to edit.
    pub choice_id: Uuid,
    /// New label.
    pub text: Option<String>,
    /// New destination scene.
    pub next_scene_id: Option<Uuid>,
}

impl Command for UpdateChoice {
    fn command_type(&self) -> &'static str {
        "narrative.update_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to remove an explicit choice.
#[derive(Debug, Clone)]
pub struct DeleteChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting user.
    pub actor: Actor,
    /// The choice to remove.
    pub choice_id: Uuid,
}

impl Command for DeleteChoice {
    fn command_type(&self) -> &'static str {
        "narrative.delete_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}
