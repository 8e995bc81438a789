// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod auth;
pub mod tasks;

use crate::middleware::require_session;
use crate::AppState;
use axum::{extract::Query, middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Deserialize)]
struct IndexParams {
    /// Error indicator set by failed logins (`?error=oauth_failed`).
    error: Option<String>,
}

#[derive(Serialize)]
struct IndexResponse {
    app: &'static str,
    login: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Public landing route. Points at the login flow and echoes back the
/// error indicator that failed logins redirect here with.
async fn index(Query(params): Query<IndexParams>) -> Json<IndexResponse> {
    Json(IndexResponse {
        app: "dayboard",
        login: auth::LOGIN_PATH,
        error: params.error,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .merge(auth::routes());

    // Protected routes (session required)
    let protected_routes = tasks::routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
