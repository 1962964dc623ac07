// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::db::RecordQueryCursor;
use crate::error::{AppError, Result};
use crate::metrics::{CheckinEntry, DistanceUnit, StructuredMetrics};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityKind, UserStats};
use crate::services::checkin::CheckinView;
use crate::services::goal::{GoalDraft, GoalView};
use crate::services::workout::{WorkoutDraft, WorkoutView};
use crate::services::{CheckinService, GoalService, WorkoutService};
use crate::time_utils;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};

const MAX_PER_PAGE: u32 = 100;
const CURSOR_PARTS: usize = 2;

/// API routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/workouts", get(get_workouts).post(create_workout))
        .route(
            "/api/workouts/{id}",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .route("/api/workouts/{id}/complete", post(toggle_complete))
        .route("/api/workouts/{id}/star", post(toggle_star))
        .route("/api/goals", get(get_goals).post(create_goal))
        .route("/api/goals/{id}", axum::routing::put(update_goal).delete(delete_goal))
        .route("/api/checkin/today", get(get_checkin).put(put_checkin))
        .route("/api/stats", get(get_stats))
        .route("/api/account", delete(delete_account))
}

fn validated<T: Validate>(payload: T) -> Result<T> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Validation failed: {}", e)))?;
    Ok(payload)
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub email: Option<String>,
}

/// Get current user profile, straight from the verified token.
async fn get_me(Extension(user): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse {
        user_id: user.user_id,
        email: user.email,
    })
}

// ─── Workouts ────────────────────────────────────────────────

/// Structured metrics as accepted from clients.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MetricsPayload {
    #[serde(default)]
    pub duration_hours: u32,
    #[validate(range(max = 59))]
    #[serde(default)]
    pub duration_minutes: u32,
    #[validate(custom(function = validate_decimal))]
    #[serde(default)]
    pub distance_value: String,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    #[validate(custom(function = validate_decimal))]
    #[serde(default)]
    pub average_speed: String,
    #[validate(custom(function = validate_decimal))]
    #[serde(default)]
    pub fastest_speed: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub location: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub notes: String,
}

impl From<MetricsPayload> for StructuredMetrics {
    fn from(p: MetricsPayload) -> Self {
        StructuredMetrics {
            duration_hours: p.duration_hours,
            duration_minutes: p.duration_minutes,
            distance_value: p.distance_value,
            distance_unit: p.distance_unit,
            average_speed: p.average_speed,
            fastest_speed: p.fastest_speed,
            // Legacy-only field, never accepted on writes
            mileage: String::new(),
            location: p.location,
            notes: p.notes,
        }
    }
}

/// Workout create/update payload.
#[derive(Debug, Deserialize, Validate)]
pub struct WorkoutPayload {
    pub kind: ActivityKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = validate_ymd))]
    pub date: String,
    #[validate(custom(function = validate_intensity))]
    #[serde(default)]
    pub intensity: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub metrics: MetricsPayload,
}

impl From<WorkoutPayload> for WorkoutDraft {
    fn from(p: WorkoutPayload) -> Self {
        WorkoutDraft {
            kind: p.kind,
            title: p.title,
            date: p.date,
            intensity: p.intensity,
            metrics: p.metrics.into(),
        }
    }
}

fn validate_ymd(value: &str) -> std::result::Result<(), ValidationError> {
    time_utils::parse_ymd(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("date_format"))
}

/// Empty means absent; otherwise a plain non-negative decimal.
fn validate_decimal(value: &str) -> std::result::Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(()),
        _ => Err(ValidationError::new("decimal")),
    }
}

fn validate_intensity(value: &str) -> std::result::Result<(), ValidationError> {
    match value {
        "low" | "medium" | "high" => Ok(()),
        _ => Err(ValidationError::new("intensity")),
    }
}

#[derive(Deserialize)]
struct WorkoutsQuery {
    /// Cursor for forward pagination (opaque token).
    cursor: Option<String>,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_per_page() -> u32 {
    50
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<RecordQueryCursor>> {
    cursor
        .map(|raw| {
            let invalid_cursor =
                || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

            let parts: Vec<&str> = decoded_str.split(':').collect();
            if parts.len() != CURSOR_PARTS {
                return Err(invalid_cursor());
            }

            // Cursor values are interpolated into a store filter expression,
            // so reject anything outside the expected shapes outright.
            let due_date = parts[0];
            let id = parts[1];
            if time_utils::parse_ymd(due_date).is_none() {
                return Err(invalid_cursor());
            }
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid_cursor());
            }

            Ok(RecordQueryCursor {
                due_date: due_date.to_string(),
                id: id.to_string(),
            })
        })
        .transpose()
}

fn encode_cursor(cursor: RecordQueryCursor) -> String {
    let payload = format!("{}:{}", cursor.due_date, cursor.id);
    URL_SAFE_NO_PAD.encode(payload)
}

#[derive(Serialize)]
pub struct WorkoutsResponse {
    pub workouts: Vec<WorkoutView>,
    pub per_page: u32,
    pub next_cursor: Option<String>,
}

/// List workouts, newest first, with cursor pagination.
async fn get_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WorkoutsQuery>,
) -> Result<Json<WorkoutsResponse>> {
    tracing::debug!(
        user_id = %user.user_id,
        cursor = ?params.cursor,
        "Fetching workouts"
    );

    let limit = params.per_page.clamp(1, MAX_PER_PAGE);
    let cursor = parse_cursor(params.cursor.as_deref())?;

    let service = WorkoutService::new(state.store.clone());
    let (workouts, has_more) = service.list(&user, cursor.as_ref(), limit).await?;

    let next_cursor = if has_more {
        workouts.last().and_then(|w| {
            w.date.as_ref().map(|date| {
                encode_cursor(RecordQueryCursor {
                    due_date: date.clone(),
                    id: w.id.clone(),
                })
            })
        })
    } else {
        None
    };

    Ok(Json(WorkoutsResponse {
        workouts,
        per_page: limit,
        next_cursor,
    }))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<WorkoutPayload>,
) -> Result<Json<WorkoutView>> {
    let payload = validated(payload)?;
    let service = WorkoutService::new(state.store.clone());
    let view = service.create(&user, payload.into()).await?;
    Ok(Json(view))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutView>> {
    let service = WorkoutService::new(state.store.clone());
    Ok(Json(service.get(&user, &id).await?))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<WorkoutPayload>,
) -> Result<Json<WorkoutView>> {
    let payload = validated(payload)?;
    let service = WorkoutService::new(state.store.clone());
    Ok(Json(service.update(&user, &id, payload.into()).await?))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let service = WorkoutService::new(state.store.clone());
    service.delete(&user, &id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn toggle_complete(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutView>> {
    let service = WorkoutService::new(state.store.clone());
    Ok(Json(service.toggle_complete(&user, &id).await?))
}

async fn toggle_star(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutView>> {
    let service = WorkoutService::new(state.store.clone());
    Ok(Json(service.toggle_star(&user, &id).await?))
}

// ─── Goals ───────────────────────────────────────────────────

/// Goal create/update payload.
#[derive(Debug, Deserialize, Validate)]
pub struct GoalPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = validate_intensity))]
    #[serde(default)]
    pub priority: Option<String>,
    #[validate(custom(function = validate_ymd))]
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub marker: Option<String>,
}

impl From<GoalPayload> for GoalDraft {
    fn from(p: GoalPayload) -> Self {
        GoalDraft {
            title: p.title,
            description: p.description,
            priority: p.priority,
            target_date: p.target_date,
            marker: p.marker,
        }
    }
}

#[derive(Serialize)]
pub struct GoalsResponse {
    pub goals: Vec<GoalView>,
}

async fn get_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GoalsResponse>> {
    let service = GoalService::new(state.store.clone());
    let goals = service.list(&user).await?;
    Ok(Json(GoalsResponse { goals }))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<GoalPayload>,
) -> Result<Json<GoalView>> {
    let payload = validated(payload)?;
    let service = GoalService::new(state.store.clone());
    Ok(Json(service.create(&user, payload.into()).await?))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<GoalPayload>,
) -> Result<Json<GoalView>> {
    let payload = validated(payload)?;
    let service = GoalService::new(state.store.clone());
    Ok(Json(service.update(&user, &id, payload.into()).await?))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let service = GoalService::new(state.store.clone());
    service.delete(&user, &id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// ─── Daily Check-In ──────────────────────────────────────────

/// Check-in upsert payload.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckinPayload {
    #[validate(range(min = 1, max = 10))]
    pub score: u8,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub emotions: Vec<String>,
}

async fn get_checkin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<CheckinView>>> {
    let service = CheckinService::new(state.store.clone());
    Ok(Json(service.today(&user).await?))
}

async fn put_checkin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CheckinPayload>,
) -> Result<Json<CheckinView>> {
    let payload = validated(payload)?;
    let entry = CheckinEntry {
        score: payload.score,
        notes: payload.notes,
        emotions: payload.emotions,
    };

    let service = CheckinService::new(state.store.clone());
    Ok(Json(service.upsert_today(&user, entry).await?))
}

// ─── Stats ───────────────────────────────────────────────────

/// Aggregate stats over the user's records.
///
/// Aggregation is a pure fold over fetched rows; the store offers no
/// server-side grouping worth leaning on at these row counts.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStats>> {
    let workouts = WorkoutService::new(state.store.clone());
    let goals = GoalService::new(state.store.clone());
    let checkins = CheckinService::new(state.store.clone());

    let mut stats = UserStats::default();

    for record in workouts.all_records(&user).await? {
        stats.update_from_workout(&record);
    }
    for record in goals.all_records(&user).await? {
        stats.update_from_goal(&record);
    }

    let history = checkins.history(&user).await?;
    let today = chrono::Utc::now().date_naive();
    stats.update_from_checkins(&history, today);

    Ok(Json(stats))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Delete the user's records. The auth identity itself lives with the auth
/// provider and is out of scope here.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    state
        .store
        .delete_for_user(&user.user_id, &user.token)
        .await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: "All records deleted.".to_string(),
    }))
}
