// SPDX-License-Identifier: MIT

use dayboard::config::Config;
use dayboard::db::Db;
use dayboard::models::user::OAuthProfile;
use dayboard::models::User;
use dayboard::routes::create_router;
use dayboard::services::session::SESSION_COOKIE;
use dayboard::AppState;
use std::sync::Arc;

/// Create a test app over a fresh in-memory SQLite database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_url("http://localhost:8080").await
}

/// Same, with an explicit app URL (drives the cookie `Secure` flag).
#[allow(dead_code)]
pub async fn create_test_app_with_url(app_url: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        app_url: app_url.to_string(),
        ..Config::default()
    };

    let db = Db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    let state = Arc::new(AppState::new(config, db));

    (create_router(state.clone()), state)
}

/// Seed a user as if they had signed in with GitHub.
#[allow(dead_code)]
pub async fn seed_user(state: &Arc<AppState>, provider_id: &str) -> User {
    let profile = OAuthProfile {
        provider: "github".to_string(),
        provider_id: provider_id.to_string(),
        email: Some(format!("{provider_id}@example.com")),
        name: Some(format!("Test User {provider_id}")),
        avatar_url: None,
        access_token: "gho_test_token".to_string(),
        refresh_token: None,
    };

    state
        .users
        .get_or_create(&profile)
        .await
        .expect("Failed to seed user")
}

/// Build a `Cookie` request-header value carrying a fresh session for a user.
#[allow(dead_code)]
pub fn session_cookie_for(state: &Arc<AppState>, user_id: i64) -> String {
    let token = state
        .sessions
        .issue(user_id)
        .expect("Failed to issue session token");
    format!("{SESSION_COOKIE}={token}")
}
