// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.
//!
//! Tokens are issued by the external auth provider; this service only
//! verifies them and turns the claims into the acting [`Identity`].

use crate::error::AppError;
use crate::models::identity::{Identity, DEFAULT_AVATAR};
use crate::models::route::LEGACY_KEY_PREFIX;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "ryda_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (stable user key)
    pub sub: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rides_led: Option<u32>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    fn into_identity(self) -> Option<Identity> {
        let key = self.sub.trim();
        let name = self.name.trim();
        if key.is_empty() || name.is_empty() || key.starts_with(LEGACY_KEY_PREFIX) {
            return None;
        }

        Some(Identity {
            key: key.to_string(),
            display_name: name.to_string(),
            avatar: self
                .avatar
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            rating: self.rating.unwrap_or(0.0),
            rides_led: self.rides_led.unwrap_or(0),
        })
    }
}

/// Middleware that requires valid JWT authentication.
///
/// On success the request carries an [`Identity`] extension.
pub async fn require_auth(
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

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.to_string(),
            None => return Err(AppError::Unauthorized),
        }
    };

    let identity = verify_token(&token, &state.config.jwt_signing_key).ok_or_else(|| {
        tracing::debug!("Rejected request with invalid session token");
        AppError::InvalidToken
    })?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Verify `token` and return the identity it asserts.
pub fn verify_token(token: &str, signing_key: &[u8]) -> Option<Identity> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .ok()
        .and_then(|data| data.claims.into_identity())
}

/// Create a JWT for `identity`, valid for 30 days.
pub fn create_jwt(identity: &Identity, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: identity.key.clone(),
        name: identity.display_name.clone(),
        avatar: Some(identity.avatar.clone()),
        rating: Some(identity.rating),
        rides_led: Some(identity.rides_led),
        iat: now,
        exp: now + 30 * 24 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"unit_test_signing_key_32_bytes!!";

    #[test]
    fn test_token_round_trip() {
        let mut identity = Identity::new("rider-42", "Robin");
        identity.rating = 4.5;
        identity.rides_led = 3;

        let token = create_jwt(&identity, KEY).unwrap();
        let verified = verify_token(&token, KEY).unwrap();

        assert_eq!(verified, identity);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_jwt(&Identity::new("rider-42", "Robin"), KEY).unwrap();
        assert!(verify_token(&token, b"some_other_key_that_is_long_enough").is_none());
    }

    #[test]
    fn test_legacy_key_subject_rejected() {
        let token = create_jwt(&Identity::new("name:Robert Kim", "Robert Kim"), KEY).unwrap();
        assert!(verify_token(&token, KEY).is_none());
    }

    #[test]
    fn test_blank_subject_rejected() {
        let token = create_jwt(&Identity::new("  ", "Robin"), KEY).unwrap();
        assert!(verify_token(&token, KEY).is_none());
    }
}
