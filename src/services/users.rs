// SPDX-License-Identifier: MIT

//! User directory - maps OAuth identities to local accounts.

use crate::db::Db;
use crate::error::AppError;
use crate::models::user::OAuthProfile;
use crate::models::User;

/// Lookup-or-create layer over the users table.
#[derive(Clone)]
pub struct UserDirectory {
    db: Db,
}

impl UserDirectory {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Resolve an OAuth identity to a local user, creating the account on
    /// first login. Re-logins refresh the stored profile and provider tokens
    /// but keep the same user id, so tasks stay attached.
    pub async fn get_or_create(&self, profile: &OAuthProfile) -> Result<User, AppError> {
        let user = self.db.upsert_user(profile).await?;

        tracing::info!(
            user_id = user.id,
            provider = %user.provider,
            "User signed in"
        );

        Ok(user)
    }

    /// Get a user by local id.
    pub async fn get(&self, user_id: i64) -> Result<Option<User>, AppError> {
        self.db.get_user(user_id).await
    }
}
