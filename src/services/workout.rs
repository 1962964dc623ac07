// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout service.
//!
//! The record store only has a free-text `description` column, so structured
//! metrics cross the store boundary through the metadata codec: encoded on
//! every write, decoded on every read. Nothing outside this service sees the
//! encoded text.

use crate::db::{RecordQueryCursor, RecordStore};
use crate::error::{AppError, Result};
use crate::metrics::{codec, StructuredMetrics};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityKind, Record, WORKOUT_MARKERS};
use serde::{Deserialize, Serialize};

/// Incoming workout fields, before codec encoding.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutDraft {
    pub kind: ActivityKind,
    pub title: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "low" / "medium" / "high"
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub metrics: StructuredMetrics,
}

/// A workout as served to clients, metrics decoded.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutView {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub date: Option<String>,
    pub completed: bool,
    pub starred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    pub metrics: StructuredMetrics,
}

/// Workout CRUD over the record store.
pub struct WorkoutService {
    store: RecordStore,
}

impl WorkoutService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Create a workout, encoding its metrics into the description column.
    pub async fn create(&self, user: &AuthUser, draft: WorkoutDraft) -> Result<WorkoutView> {
        let record = Record {
            id: None,
            user_id: user.user_id.clone(),
            title: draft.title.clone(),
            description: encode_description(&draft.metrics, draft.kind),
            completed: false,
            priority: draft.intensity.clone(),
            due_date: Some(draft.date.clone()),
            starred: Some(false),
            emoji: Some(draft.kind.marker().to_string()),
            created_at: None,
            updated_at: None,
        };

        let created = self.store.create(&record, &user.token).await?;
        tracing::info!(
            user_id = %user.user_id,
            kind = draft.kind.as_str(),
            "Created workout"
        );

        view_from_record(created)
    }

    /// Fetch one workout by id.
    pub async fn get(&self, user: &AuthUser, id: &str) -> Result<WorkoutView> {
        let record = self.fetch_workout(user, id).await?;
        view_from_record(record)
    }

    /// Replace a workout's fields, re-encoding metrics.
    pub async fn update(
        &self,
        user: &AuthUser,
        id: &str,
        draft: WorkoutDraft,
    ) -> Result<WorkoutView> {
        // Confirm the record exists and is a workout before patching
        self.fetch_workout(user, id).await?;

        let patch = serde_json::json!({
            "title": draft.title,
            "description": encode_description(&draft.metrics, draft.kind),
            "priority": draft.intensity,
            "due_date": draft.date,
            "emoji": draft.kind.marker(),
        });

        let updated = self.store.update(id, &patch, &user.token).await?;
        view_from_record(updated)
    }

    /// Delete a workout by id.
    pub async fn delete(&self, user: &AuthUser, id: &str) -> Result<()> {
        self.fetch_workout(user, id).await?;
        self.store.delete(id, &user.token).await
    }

    /// Flip the completed flag, returning the new state.
    pub async fn toggle_complete(&self, user: &AuthUser, id: &str) -> Result<WorkoutView> {
        let record = self.fetch_workout(user, id).await?;
        let patch = serde_json::json!({ "completed": !record.completed });
        let updated = self.store.update(id, &patch, &user.token).await?;
        view_from_record(updated)
    }

    /// Flip the starred flag, returning the new state.
    pub async fn toggle_star(&self, user: &AuthUser, id: &str) -> Result<WorkoutView> {
        let record = self.fetch_workout(user, id).await?;
        let starred = record.starred.unwrap_or(false);
        let patch = serde_json::json!({ "starred": !starred });
        let updated = self.store.update(id, &patch, &user.token).await?;
        view_from_record(updated)
    }

    /// List workouts newest-first with keyset pagination.
    ///
    /// Fetches one row past `limit` so the caller can tell whether another
    /// page exists without a count query.
    pub async fn list(
        &self,
        user: &AuthUser,
        cursor: Option<&RecordQueryCursor>,
        limit: u32,
    ) -> Result<(Vec<WorkoutView>, bool)> {
        let mut records = self
            .store
            .query(&user.user_id, &WORKOUT_MARKERS, cursor, limit + 1, &user.token)
            .await?;

        let has_more = records.len() as u32 > limit;
        records.truncate(limit as usize);

        let views = records
            .into_iter()
            .map(view_from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok((views, has_more))
    }

    /// All of a user's workout records, for stats aggregation.
    pub async fn all_records(&self, user: &AuthUser) -> Result<Vec<Record>> {
        self.store
            .query(&user.user_id, &WORKOUT_MARKERS, None, 1000, &user.token)
            .await
    }

    /// Get a record by id, requiring it to carry a workout marker.
    async fn fetch_workout(&self, user: &AuthUser, id: &str) -> Result<Record> {
        let record = self
            .store
            .get(id, &user.token)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", id)))?;

        let is_workout = record
            .emoji
            .as_deref()
            .is_some_and(|e| WORKOUT_MARKERS.contains(&e));
        if !is_workout {
            return Err(AppError::NotFound(format!("Workout {} not found", id)));
        }

        Ok(record)
    }
}

fn encode_description(metrics: &StructuredMetrics, kind: ActivityKind) -> Option<String> {
    let encoded = codec::encode(metrics, kind);
    if encoded.is_empty() {
        None
    } else {
        Some(encoded)
    }
}

fn view_from_record(record: Record) -> Result<WorkoutView> {
    let id = record
        .id
        .ok_or_else(|| AppError::Store("Record missing id".to_string()))?;

    // Records predating the marker scheme default to running
    let kind = record
        .emoji
        .as_deref()
        .and_then(ActivityKind::from_marker)
        .unwrap_or(ActivityKind::Running);

    let metrics = codec::decode(record.description.as_deref().unwrap_or(""));

    Ok(WorkoutView {
        id,
        kind,
        title: record.title,
        date: record.due_date,
        completed: record.completed,
        starred: record.starred.unwrap_or(false),
        intensity: record.priority,
        metrics,
    })
}
