//! Storyloom API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use storyloom_api::config::Config;
use storyloom_api::error::AppError;
use storyloom_api::state::AppState;
use storyloom_api::telemetry;
use storyloom_core::clock::SystemClock;
use tracing::{info, warn};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!("Starting Storyloom API server");

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    if config.run_migrations {
        sqlx::migrate!("../../migrations").run(&pool).await?;
        info!("database migrations applied");
    }

    let state = AppState::new(Arc::new(SystemClock), storyloom_store::repositories(&pool));
    let app = storyloom_api::app(state);

    // Start server.
    let addr = config.listen_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    storyloom_api::wind_down(served, &pool, telemetry).await
}
