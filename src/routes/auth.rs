// SPDX-License-Identifier: MIT

//! GitHub OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::AppState;

/// Where unauthenticated requests get sent to sign in.
pub const LOGIN_PATH: &str = "/auth/github";

/// Where the browser lands after a successful login.
const TASKS_REDIRECT: &str = "/tasks";

/// Where the browser lands when any step of the login fails.
const LOGIN_FAILED_REDIRECT: &str = "/?error=oauth_failed";

/// How long an OAuth `state` parameter stays acceptable.
const STATE_MAX_AGE_MILLIS: u128 = 10 * 60 * 1000;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(LOGIN_PATH, get(auth_start))
        .route("/auth/github/callback", get(auth_callback))
        .route("/auth/logout", get(logout))
}

/// Start the login flow - redirect to GitHub authorization.
async fn auth_start(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let oauth_state = make_state(&state.config.oauth_state_key)?;
    let callback_url = format!("{}/auth/github/callback", state.config.app_url);

    let auth_url = format!(
        "https://github.com/login/oauth/authorize?\
         client_id={}&\
         redirect_uri={}&\
         scope=user:email&\
         state={}",
        state.config.github_client_id,
        urlencoding::encode(&callback_url),
        oauth_state
    );

    tracing::info!(
        client_id = %state.config.github_client_id,
        "Starting OAuth flow, redirecting to GitHub"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    // GitHub omits `code`/`state` when it reports an error instead
    code: Option<String>,
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code, create the user, set the session.
///
/// Every failure along the way lands the browser back on the front page
/// with an error indicator rather than surfacing an API error; the details
/// go to the log.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    match complete_login(&state, params).await {
        Ok(cookie) => (jar.add(cookie), Redirect::to(TASKS_REDIRECT)),
        Err(e) => {
            tracing::warn!(error = %e, "OAuth login failed");
            (jar, Redirect::to(LOGIN_FAILED_REDIRECT))
        }
    }
}

/// The fallible part of the callback: verify state, run the identity
/// exchange, upsert the user, and mint the session cookie.
async fn complete_login(
    state: &Arc<AppState>,
    params: CallbackParams,
) -> Result<Cookie<'static>> {
    if let Some(error) = params.error {
        return Err(AppError::GitHubApi(format!(
            "GitHub reported an authorization error: {}",
            error
        )));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("callback is missing the code parameter".to_string()))?;
    let oauth_state = params
        .state
        .ok_or_else(|| AppError::BadRequest("callback is missing the state parameter".to_string()))?;

    if !verify_state(&oauth_state, &state.config.oauth_state_key) {
        return Err(AppError::BadRequest(
            "invalid or expired state parameter".to_string(),
        ));
    }

    let redirect_uri = format!("{}/auth/github/callback", state.config.app_url);
    let profile = state.github.fetch_identity(&code, &redirect_uri).await?;
    let user = state.users.get_or_create(&profile).await?;

    let token = state.sessions.issue(user.id)?;
    Ok(state.sessions.session_cookie(token))
}

/// Logout - drop the session cookie and return to the front page.
///
/// Session tokens are stateless, so this clears the browser's copy; the
/// token itself stays valid until its expiry.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(state.sessions.removal_cookie());
    (jar, Redirect::to("/"))
}

/// Build a signed OAuth state parameter: `timestamp_hex|signature_hex`,
/// base64-encoded for the URL.
fn make_state(secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let payload = format!("{:x}", timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed_state = format!("{}|{}", payload, hex::encode(signature));

    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify the HMAC signature and decode the timestamp from an OAuth state
/// parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<u128> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "timestamp_hex|signature_hex"
    let (timestamp_hex, signature_hex) = state_str.split_once('|')?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(timestamp_hex.as_bytes());
    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    u128::from_str_radix(timestamp_hex, 16).ok()
}

/// Check that a state parameter is authentic and fresh.
fn verify_state(state: &str, secret: &[u8]) -> bool {
    let timestamp = match verify_and_decode_state(state, secret) {
        Some(ts) => ts,
        None => return false,
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    if now.saturating_sub(timestamp) > STATE_MAX_AGE_MILLIS {
        tracing::warn!("OAuth state parameter expired");
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_round_trips() {
        let secret = b"secret_key";
        let state = make_state(secret).unwrap();
        assert!(verify_state(&state, secret));
    }

    #[test]
    fn test_verify_state_invalid_signature() {
        let secret = b"secret_key";
        let payload = format!("{:x}", 1234567890u128);

        let state_data = format!("{}|{}", payload, "invalid_signature");
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        assert!(!verify_state(&encoded_state, secret));
    }

    #[test]
    fn test_verify_state_wrong_secret() {
        let secret = b"secret_key";
        let state = make_state(secret).unwrap();
        assert!(!verify_state(&state, b"wrong_key"));
    }

    #[test]
    fn test_verify_state_expired() {
        let secret = b"secret_key";
        // Signed correctly, but with a timestamp from 1970
        let payload = format!("{:x}", 1000u128);
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        let state_data = format!("{}|{}", payload, signature);
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        assert!(!verify_state(&encoded_state, secret));
    }

    #[test]
    fn test_verify_state_malformed() {
        let secret = b"secret_key";
        let encoded_state = URL_SAFE_NO_PAD.encode("no-delimiter-here");
        assert!(!verify_state(&encoded_state, secret));
        assert!(!verify_state("not base64 at all!", secret));
    }
}
