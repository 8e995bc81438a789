// SPDX-License-Identifier: MIT

//! Dayboard API Server
//!
//! A personal daily task board: sign in with GitHub, see what is due
//! today, and complete, defer, or delete tasks.

use dayboard::{config::Config, db::Db, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Dayboard API");

    // Open the database and ensure the schema
    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to open database");

    // Build shared state and router
    let state = Arc::new(AppState::new(config.clone(), db));
    let app = dayboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize logging with an env-filter that defaults to debug for this
/// crate and info for everything else.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dayboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
