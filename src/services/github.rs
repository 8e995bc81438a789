// SPDX-License-Identifier: MIT

//! GitHub API client for the OAuth login flow.
//!
//! Handles:
//! - Authorization-code exchange
//! - Fetching the signed-in user's profile
//! - Resolving the primary email (requires the `user:email` scope)

use crate::error::AppError;
use crate::models::user::OAuthProfile;
use reqwest::header;
use serde::Deserialize;

/// Provider name recorded on user rows created through this client.
pub const PROVIDER: &str = "github";

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base_url: String,
    oauth_base_url: String,
    client_id: String,
    client_secret: String,
}

impl GithubClient {
    /// Create a new GitHub client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: "https://api.github.com".to_string(),
            oauth_base_url: "https://github.com/login/oauth".to_string(),
            client_id,
            client_secret,
        }
    }

    /// Run the full identity exchange for an authorization code.
    ///
    /// Exchanges the code for an access token, fetches the user profile, and
    /// resolves the primary email. The result is ready to be handed to user
    /// lookup-or-creation.
    pub async fn fetch_identity(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<OAuthProfile, AppError> {
        let token = self.exchange_code(code, redirect_uri).await?;
        let user = self.fetch_user(&token.access_token).await?;
        let email = self.fetch_primary_email(&token.access_token).await;

        Ok(OAuthProfile {
            provider: PROVIDER.to_string(),
            provider_id: user.id.to_string(),
            email: email.or(user.email),
            // GitHub profiles may have no display name; the login always exists
            name: user.name.or(Some(user.login)),
            avatar_url: user.avatar_url,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GithubToken, AppError> {
        let url = format!("{}/access_token", self.oauth_base_url);

        let response = self
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "GitHub token exchange failed");
            return Err(AppError::GitHubApi(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        // GitHub reports bad codes with a 200 response carrying an `error`
        // field, so a status check alone is not enough.
        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to parse token response: {}", e)))?;

        if let Some(error) = token.error {
            let details = token.error_description.unwrap_or_default();
            tracing::error!(error = %error, details = %details, "GitHub rejected the authorization code");
            return Err(AppError::GitHubApi(format!("Token exchange rejected: {}", error)));
        }

        match token.access_token {
            Some(access_token) => Ok(GithubToken {
                access_token,
                refresh_token: token.refresh_token,
            }),
            None => Err(AppError::GitHubApi(
                "Token response carried neither an access token nor an error".to_string(),
            )),
        }
    }

    /// Get the authenticated user's profile.
    pub async fn fetch_user(&self, access_token: &str) -> Result<GithubUser, AppError> {
        let url = format!("{}/user", self.api_base_url);
        self.get_json(&url, access_token).await
    }

    /// Resolve the user's primary email address.
    ///
    /// Best effort: if the token lacks the `user:email` scope or the request
    /// fails, the login proceeds without an email.
    pub async fn fetch_primary_email(&self, access_token: &str) -> Option<String> {
        let url = format!("{}/user/emails", self.api_base_url);

        let emails: Vec<GithubEmail> = match self.get_json(&url, access_token).await {
            Ok(emails) => emails,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch GitHub emails, continuing without");
                return None;
            }
        };

        pick_primary_email(&emails)
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            // GitHub rejects requests without a User-Agent
            .header(header::USER_AGENT, "dayboard")
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GitHubApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GitHubApi(format!("JSON parse error: {}", e)))
    }
}

/// Usable tokens from a completed code exchange.
#[derive(Debug, Clone)]
pub struct GithubToken {
    pub access_token: String,
    /// Only present for GitHub Apps with expiring tokens; plain OAuth apps
    /// never issue one.
    pub refresh_token: Option<String>,
}

/// Token exchange response from GitHub.
///
/// Success and failure share the same 200 envelope, hence all fields
/// being optional.
#[derive(Debug, Clone, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Profile response from `GET /user`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

/// Entry in the `GET /user/emails` response.
#[derive(Debug, Clone, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// Prefer the verified primary address, fall back to any verified one.
/// Unverified addresses are never used.
fn pick_primary_email(emails: &[GithubEmail]) -> Option<String> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .or_else(|| emails.iter().find(|e| e.verified))
        .map(|e| e.email.clone())
}
