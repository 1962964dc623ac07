// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase JWT authentication middleware.
//!
//! The backend never issues its own identities; it verifies access tokens
//! the auth provider already signed (HS256 with the project JWT secret) and
//! forwards the raw token to the record store so row-level security applies.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the session cookie holding the access token.
pub const SESSION_COOKIE: &str = "trail_token";

/// Claims in a Supabase-issued access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (auth user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(default)]
    pub email: Option<String>,
    /// Postgres role, "authenticated" for signed-in users
    #[serde(default)]
    pub role: Option<String>,
}

/// Authenticated user extracted from a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
    /// The verified raw token, forwarded to the record store as bearer
    pub token: String,
}

/// Middleware that requires a valid Supabase access token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
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
            _ => return Err(StatusCode::UNAUTHORIZED),
        }
    };

    let claims =
        verify_token(&token, &state.config.supabase_jwt_secret).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let auth_user = AuthUser {
        user_id: claims.sub,
        email: claims.email,
        token,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Verify a Supabase access token and return its claims.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    // Supabase sets aud to "authenticated"; we key auth off the signature
    // and expiry only.
    validation.validate_aud = false;

    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// Create a token the way the auth provider would. Used by tests and the
/// local development flow.
pub fn create_token(
    user_id: &str,
    email: Option<&str>,
    secret: &[u8],
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
        email: email.map(str::to_string),
        role: Some("authenticated".to_string()),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_jwt_secret_32_bytes_minimum";

    #[test]
    fn test_token_round_trip() {
        let token = create_token("user-123", Some("trail@example.com"), SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email.as_deref(), Some("trail@example.com"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("user-123", None, SECRET).unwrap();
        assert!(verify_token(&token, b"some_other_secret_32_bytes_long!").is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.jwt", SECRET).is_err());
    }
}
