// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use trail_tracker::config::Config;
use trail_tracker::db::RecordStore;
use trail_tracker::routes::create_router;
use trail_tracker::AppState;

/// Create a test app with an offline mock store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let store = RecordStore::new_mock();

    let state = Arc::new(AppState { config, store });

    (create_router(state.clone()), state)
}

/// Create a valid access token for the test signing secret.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, secret: &[u8]) -> String {
    trail_tracker::middleware::auth::create_token(user_id, Some("test@example.com"), secret)
        .expect("Failed to create test token")
}
