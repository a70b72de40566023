//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::model::EntityKind;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: EntityKind,
        /// The identifier that did not resolve.
        id: Uuid,
    },

    /// The actor is not allowed to touch the entity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The write collides with existing state (e.g. a duplicate name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}
