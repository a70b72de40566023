//! Storyloom HTTP API.
//!
//! The binary in `main.rs` wires configuration, telemetry and the database
//! pool around [`app`]; integration tests build the same router.

use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Builds the complete router, all resources nested under `/api/v1`.
pub fn app(state: state::AppState) -> Router {
    let api = Router::new()
        .merge(routes::health::router())
        .merge(routes::stories::router())
        .merge(routes::narrative::router())
        .merge(routes::lore::router())
        .merge(routes::search::router());

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Releases the pool and flushes telemetry after the server stops, then
/// returns how serving ended.
///
/// # Errors
///
/// Returns `AppError::Server` if `served` failed.
pub async fn wind_down(
    served: std::io::Result<()>,
    pool: &PgPool,
    telemetry: telemetry::Telemetry,
) -> Result<(), error::AppError> {
    pool.close().await;
    info!("database pool closed");
    telemetry.shutdown();
    served.map_err(error::AppError::from)
}
