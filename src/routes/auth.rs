// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie routes.
//!
//! Sign-in itself happens against the auth provider from the frontend; this
//! backend only exchanges an already-issued access token for an HttpOnly
//! session cookie so browser requests stop carrying the token in script-visible
//! storage.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{verify_token, SESSION_COOKIE};
use crate::AppState;

const SESSION_DAYS: i64 = 30;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", get(logout))
}

#[derive(Deserialize)]
pub struct SessionRequest {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: Option<String>,
}

/// Verify an access token and establish a session cookie.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SessionRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let claims = verify_token(&payload.access_token, &state.config.supabase_jwt_secret)
        .map_err(|_| AppError::InvalidToken)?;

    tracing::info!(user_id = %claims.sub, "Session established");

    let cookie = Cookie::build((SESSION_COOKIE, payload.access_token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_DAYS))
        .build();

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            user_id: claims.sub,
            email: claims.email,
        }),
    ))
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .build();

    (
        jar.remove(cookie),
        Json(serde_json::json!({ "success": true })),
    )
}
