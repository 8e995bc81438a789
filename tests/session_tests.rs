// SPDX-License-Identifier: MIT

//! Session token tests.
//!
//! A session is a signed HS256 JWT resolved back to a user row on every
//! verification. These tests pin down the issue/verify round trip, strict
//! expiry, and rejection of tampered or orphaned tokens.

use dayboard::error::AppError;
use dayboard::services::session::Claims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::time::{SystemTime, UNIX_EPOCH};

mod common;

fn unix_now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Sign arbitrary claims with a given key, bypassing the service.
fn sign_claims(claims: &Claims, key: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(key),
    )
    .unwrap()
}

#[tokio::test]
async fn issued_token_verifies_to_same_user() {
    let (_, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "12345").await;

    let token = state.sessions.issue(user.id).unwrap();
    let verified = state.sessions.verify(&token).await.unwrap();

    assert_eq!(verified.id, user.id);
    assert_eq!(verified.provider_id, "12345");
}

#[tokio::test]
async fn each_login_mints_a_distinct_token() {
    let (_, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "12345").await;

    let first = state.sessions.issue(user.id).unwrap();
    let second = state.sessions.issue(user.id).unwrap();

    // Same user, but the jti differs per login
    assert_ne!(first, second);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (_, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "12345").await;

    let now = unix_now();
    let claims = Claims {
        sub: user.id.to_string(),
        jti: "expired-session".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = sign_claims(&claims, &state.config.jwt_signing_key);

    let result = state.sessions.verify(&token).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn token_signed_with_wrong_key_is_rejected() {
    let (_, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "12345").await;

    let now = unix_now();
    let claims = Claims {
        sub: user.id.to_string(),
        jti: "forged-session".to_string(),
        iat: now,
        exp: now + 3600,
    };
    let token = sign_claims(&claims, b"some_other_signing_key_entirely");

    let result = state.sessions.verify(&token).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let (_, state) = common::create_test_app().await;
    let user = common::seed_user(&state, "12345").await;

    let token = state.sessions.issue(user.id).unwrap();

    // Flip a character in the payload segment
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    assert_eq!(parts.len(), 3);
    parts[1].push('x');
    let tampered = parts.join(".");

    let result = state.sessions.verify(&tampered).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn token_for_nonexistent_user_is_rejected() {
    let (_, state) = common::create_test_app().await;

    // Signature is valid, but no user row backs the subject
    let now = unix_now();
    let claims = Claims {
        sub: "999999".to_string(),
        jti: "orphaned-session".to_string(),
        iat: now,
        exp: now + 3600,
    };
    let token = sign_claims(&claims, &state.config.jwt_signing_key);

    let result = state.sessions.verify(&token).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn token_with_non_numeric_subject_is_rejected() {
    let (_, state) = common::create_test_app().await;

    let now = unix_now();
    let claims = Claims {
        sub: "not-a-user-id".to_string(),
        jti: "garbled-session".to_string(),
        iat: now,
        exp: now + 3600,
    };
    let token = sign_claims(&claims, &state.config.jwt_signing_key);

    let result = state.sessions.verify(&token).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (_, state) = common::create_test_app().await;

    let result = state.sessions.verify("not-even-a-jwt").await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}
