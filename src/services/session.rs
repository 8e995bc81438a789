// SPDX-License-Identifier: MIT

//! Session management: stateless signed tokens carried in a cookie.
//!
//! A session is an HS256 JWT whose `sub` is the local user id; `jti` gets a
//! fresh UUID per login so two logins never share a token. Verification is
//! strict about expiry (no leeway) and resolves the user row, so a session
//! for a since-deleted user is invalid even if the signature still checks
//! out. There is no server-side session table; logout clears the cookie and
//! an already-issued token simply ages out.

use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::AppError;
use crate::models::User;
use crate::services::users::UserDirectory;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "dayboard_session";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (local user id)
    pub sub: String,
    /// Session id, unique per login
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionService {
    users: UserDirectory,
    signing_key: Vec<u8>,
    lifetime_days: i64,
    secure_cookies: bool,
}

impl SessionService {
    pub fn new(config: &Config, users: UserDirectory) -> Self {
        Self {
            users,
            signing_key: config.jwt_signing_key.clone(),
            lifetime_days: config.session_lifetime_days,
            secure_cookies: config.serves_https(),
        }
    }

    /// Issue a fresh session token for a user.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
            .as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + (self.lifetime_days as usize) * 24 * 60 * 60,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_key),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session token creation failed: {}", e)))
    }

    /// Verify a session token and resolve it to its user.
    ///
    /// Any defect - bad signature, garbled claims, expiry, or a user that no
    /// longer exists - comes back as `Unauthorized`.
    pub async fn verify(&self, token: &str) -> Result<User, AppError> {
        let key = DecodingKey::from_secret(&self.signing_key);
        let mut validation = Validation::new(Algorithm::HS256);
        // Default leeway would keep expired tokens alive for another minute
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &key, &validation).map_err(|_| AppError::Unauthorized)?;

        let user_id: i64 = token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized)?;

        self.users
            .get(user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Build the session cookie carrying a freshly issued token.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::days(self.lifetime_days))
            .build()
    }

    /// Build the cookie handed to `CookieJar::remove` on logout.
    ///
    /// Attributes must match the ones the session cookie was set with, or
    /// browsers treat it as a different cookie and keep the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build()
    }
}
