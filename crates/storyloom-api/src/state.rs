//! Shared application state.

use std::sync::Arc;

use storyloom_core::clock::Clock;
use storyloom_core::repository::Repositories;

/// Application state shared across all request handlers.
///
/// The database pool is owned by `main`; repositories hold clones of it.
#[derive(Clone)]
pub struct AppState {
    /// Clock for deterministic time.
    pub clock: Arc<dyn Clock>,
    /// Persistence for every entity.
    pub repos: Repositories,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repos: Repositories) -> Self {
        Self { clock, repos }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("repos", &self.repos)
            .finish_non_exhaustive()
    }
}
