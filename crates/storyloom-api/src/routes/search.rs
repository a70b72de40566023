//! Global search endpoint.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use storyloom_search::application::query_handlers::{self, Search};
use storyloom_search::domain::hits::SearchHit;
use tracing::instrument;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Query string for GET /search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query.
    #[serde(default)]
    pub q: String,
}

/// GET /search?q=
#[instrument(skip(state), fields(user_id = %actor.user_id))]
async fn search(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let query = Search { query: params.q };
    Ok(Json(query_handlers::search(&actor, &query, &state.repos).await?))
}

/// Returns the search router.
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}
