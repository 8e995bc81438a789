// SPDX-License-Identifier: MIT

//! User model for storage and API.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Profile assembled from a provider after a successful OAuth exchange.
///
/// This is the input to user lookup-or-creation; it is never stored as-is.
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    pub provider: String,
    pub provider_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// A signed-in account, keyed by its OAuth identity.
///
/// One row per `(provider, provider_id)` pair; re-logins update the
/// profile fields and tokens in place rather than creating a new row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Local user id (primary key, referenced by tasks)
    pub id: i64,
    /// OAuth provider name (currently always "github")
    pub provider: String,
    /// Stable user id at the provider
    pub provider_id: String,
    /// Primary email, if the provider shared one
    pub email: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Provider access token from the latest login; never serialized out
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Provider refresh token, when the provider issues one
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// When the user first signed in (RFC 3339)
    pub created_at: String,
    /// Last profile/token refresh (RFC 3339)
    pub updated_at: String,
}
