// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal service.
//!
//! Goals share the `todos` table with workouts but carry no structured
//! metrics; the description is plain text and the emoji column holds one of
//! the goal markers.

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Record, GOAL_MARKERS};
use serde::{Deserialize, Serialize};

/// Default marker for goals created without one.
const DEFAULT_GOAL_MARKER: &str = "🎯";

/// Incoming goal fields.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "low" / "medium" / "high"
    #[serde(default)]
    pub priority: Option<String>,
    /// Target date, "YYYY-MM-DD"
    #[serde(default)]
    pub target_date: Option<String>,
    /// One of the goal markers
    #[serde(default)]
    pub marker: Option<String>,
}

/// A goal as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    pub marker: String,
}

/// Goal CRUD over the record store.
pub struct GoalService {
    store: RecordStore,
}

impl GoalService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, user: &AuthUser, draft: GoalDraft) -> Result<GoalView> {
        let marker = validate_marker(draft.marker.as_deref())?;

        let record = Record {
            id: None,
            user_id: user.user_id.clone(),
            title: draft.title,
            description: draft.description,
            completed: false,
            priority: draft.priority,
            due_date: draft.target_date,
            starred: Some(false),
            emoji: Some(marker.to_string()),
            created_at: None,
            updated_at: None,
        };

        let created = self.store.create(&record, &user.token).await?;
        tracing::info!(user_id = %user.user_id, "Created goal");
        view_from_record(created)
    }

    pub async fn update(&self, user: &AuthUser, id: &str, draft: GoalDraft) -> Result<GoalView> {
        self.fetch_goal(user, id).await?;
        let marker = validate_marker(draft.marker.as_deref())?;

        let patch = serde_json::json!({
            "title": draft.title,
            "description": draft.description,
            "priority": draft.priority,
            "due_date": draft.target_date,
            "emoji": marker,
        });

        let updated = self.store.update(id, &patch, &user.token).await?;
        view_from_record(updated)
    }

    pub async fn delete(&self, user: &AuthUser, id: &str) -> Result<()> {
        self.fetch_goal(user, id).await?;
        self.store.delete(id, &user.token).await
    }

    /// List all goals, newest target date first.
    pub async fn list(&self, user: &AuthUser) -> Result<Vec<GoalView>> {
        let records = self
            .store
            .query(&user.user_id, &GOAL_MARKERS, None, 1000, &user.token)
            .await?;

        records.into_iter().map(view_from_record).collect()
    }

    /// All of a user's goal records, for stats aggregation.
    pub async fn all_records(&self, user: &AuthUser) -> Result<Vec<Record>> {
        self.store
            .query(&user.user_id, &GOAL_MARKERS, None, 1000, &user.token)
            .await
    }

    async fn fetch_goal(&self, user: &AuthUser, id: &str) -> Result<Record> {
        let record = self
            .store
            .get(id, &user.token)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Goal {} not found", id)))?;

        let is_goal = record
            .emoji
            .as_deref()
            .is_some_and(|e| GOAL_MARKERS.contains(&e));
        if !is_goal {
            return Err(AppError::NotFound(format!("Goal {} not found", id)));
        }

        Ok(record)
    }
}

fn validate_marker(marker: Option<&str>) -> Result<&str> {
    match marker {
        None => Ok(DEFAULT_GOAL_MARKER),
        Some(m) if GOAL_MARKERS.contains(&m) => Ok(m),
        Some(m) => Err(AppError::BadRequest(format!(
            "Unknown goal marker: {}",
            m
        ))),
    }
}

fn view_from_record(record: Record) -> Result<GoalView> {
    let id = record
        .id
        .ok_or_else(|| AppError::Store("Record missing id".to_string()))?;

    Ok(GoalView {
        id,
        title: record.title,
        description: record.description,
        completed: record.completed,
        priority: record.priority,
        target_date: record.due_date,
        marker: record
            .emoji
            .unwrap_or_else(|| DEFAULT_GOAL_MARKER.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_validation() {
        assert_eq!(validate_marker(None).unwrap(), "🎯");
        assert_eq!(validate_marker(Some("🏆")).unwrap(), "🏆");
        assert!(validate_marker(Some("🏃")).is_err());
        assert!(validate_marker(Some("x")).is_err());
    }
}
