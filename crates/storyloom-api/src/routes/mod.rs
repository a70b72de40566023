//! Route modules organized by bounded context.

use serde::Serialize;

pub mod health;
pub mod lore;
pub mod narrative;
pub mod search;
pub mod stories;

/// Response body returned by every DELETE endpoint.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Whether the resource was removed.
    pub deleted: bool,
}
