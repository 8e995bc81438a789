// SPDX-License-Identifier: MIT

//! Session authentication middleware.

use crate::error::AppError;
use crate::services::session::SESSION_COOKIE;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Authenticated user extracted from the session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Middleware guarding everything behind a valid session.
///
/// Reads the session cookie (with a bearer-header fallback for curl),
/// verifies it, and hands handlers a typed [`AuthUser`] extension. Requests
/// without a live session are bounced to the sign-in flow.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::Unauthorized),
        }
    };

    let user = state.sessions.verify(&token).await?;

    request.extensions_mut().insert(AuthUser { user_id: user.id });

    Ok(next.run(request).await)
}
