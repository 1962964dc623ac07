// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase record store client with typed operations.
//!
//! Thin wrapper over the PostgREST endpoint. Every call carries the caller's
//! own bearer token, so Postgres row-level security scopes rows to the owner;
//! this service never widens access beyond what the token allows.
//!
//! Provides high-level operations for the single `todos` table:
//! - create / update / delete / get by id
//! - marker-scoped listing with keyset pagination
//! - single-day lookup (daily check-ins)
//! - full per-user wipe (account deletion)

use crate::config::Config;
use crate::db::tables;
use crate::error::AppError;
use crate::models::Record;
use serde::de::DeserializeOwned;

/// Cursor for keyset pagination over `(due_date, id)`, both descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQueryCursor {
    /// "YYYY-MM-DD"
    pub due_date: String,
    /// Record UUID
    pub id: String,
}

/// Record store client.
#[derive(Clone)]
pub struct RecordStore {
    http: Option<reqwest::Client>,
    rest_url: String,
    anon_key: String,
}

impl RecordStore {
    /// Create a new store client from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            rest_url: format!("{}/rest/v1", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    /// Create a mock store for testing (offline mode).
    ///
    /// All operations return a store error if called.
    pub fn new_mock() -> Self {
        Self {
            http: None,
            rest_url: "http://offline.invalid/rest/v1".to_string(),
            anon_key: String::new(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn client(&self) -> Result<&reqwest::Client, AppError> {
        self.http
            .as_ref()
            .ok_or_else(|| AppError::Store("Record store not connected (offline mode)".to_string()))
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.rest_url, tables::TODOS)
    }

    // ─── CRUD ────────────────────────────────────────────────────

    /// Insert a record; the store assigns id and timestamps.
    pub async fn create(&self, record: &Record, bearer: &str) -> Result<Record, AppError> {
        let response = self
            .client()?
            .post(self.table_url())
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(bearer)
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let mut rows: Vec<Record> = self.check_response_json(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::Store("Insert returned no row".to_string()))
    }

    /// Apply a partial update to a record by id.
    pub async fn update(
        &self,
        id: &str,
        patch: &serde_json::Value,
        bearer: &str,
    ) -> Result<Record, AppError> {
        let response = self
            .client()?
            .patch(self.table_url())
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(bearer)
            .query(&[("id", format!("eq.{}", id))])
            .json(patch)
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let mut rows: Vec<Record> = self.check_response_json(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))
    }

    /// Delete a record by id.
    pub async fn delete(&self, id: &str, bearer: &str) -> Result<(), AppError> {
        let response = self
            .client()?
            .delete(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        self.check_response(response).await
    }

    /// Get a record by id.
    pub async fn get(&self, id: &str, bearer: &str) -> Result<Option<Record>, AppError> {
        let response = self
            .client()?
            .get(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .query(&[("id", format!("eq.{}", id)), ("limit", "1".to_string())])
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let mut rows: Vec<Record> = self.check_response_json(response).await?;
        Ok(rows.pop())
    }

    // ─── Marker-Scoped Queries ───────────────────────────────────

    /// List records for an owner, filtered to a marker set, ordered by
    /// `(due_date desc, id desc)` with optional keyset cursor.
    ///
    /// Cursor values are validated by the caller before they reach the
    /// composite filter expression.
    pub async fn query(
        &self,
        owner: &str,
        markers: &[&str],
        cursor: Option<&RecordQueryCursor>,
        limit: u32,
        bearer: &str,
    ) -> Result<Vec<Record>, AppError> {
        let mut params = vec![
            ("user_id".to_string(), format!("eq.{}", owner)),
            ("emoji".to_string(), format!("in.({})", markers.join(","))),
            (
                "order".to_string(),
                "due_date.desc.nullslast,id.desc".to_string(),
            ),
            ("limit".to_string(), limit.to_string()),
        ];

        if let Some(cursor) = cursor {
            params.push((
                "or".to_string(),
                format!(
                    "(due_date.lt.{date},and(due_date.eq.{date},id.lt.{id}))",
                    date = cursor.due_date,
                    id = cursor.id
                ),
            ));
        }

        let response = self
            .client()?
            .get(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get the single record with a given marker and due date, if any.
    ///
    /// This is the daily check-in lookup: one ❤️ record per user per day.
    pub async fn get_by_due_date(
        &self,
        owner: &str,
        marker: &str,
        due_date: &str,
        bearer: &str,
    ) -> Result<Option<Record>, AppError> {
        let response = self
            .client()?
            .get(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .query(&[
                ("user_id", format!("eq.{}", owner)),
                ("emoji", format!("eq.{}", marker)),
                ("due_date", format!("eq.{}", due_date)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let mut rows: Vec<Record> = self.check_response_json(response).await?;
        Ok(rows.pop())
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete ALL records owned by a user, in one filtered delete.
    ///
    /// Row-level security restricts the filter to rows the token owns, so a
    /// forged owner id cannot widen the blast radius.
    pub async fn delete_for_user(&self, owner: &str, bearer: &str) -> Result<(), AppError> {
        let response = self
            .client()?
            .delete(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .query(&[("user_id", format!("eq.{}", owner))])
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        self.check_response(response).await?;
        tracing::info!(owner, "Deleted all records for user");
        Ok(())
    }

    // ─── Response Handling ───────────────────────────────────────

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(store_error(status, &body))
    }

    /// Check response status and deserialize the JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(store_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Invalid store response: {}", e)))
    }
}

/// Map a non-success PostgREST response to an application error.
fn store_error(status: reqwest::StatusCode, body: &str) -> AppError {
    // PostgREST rejects stale/invalid bearer tokens with 401
    if status.as_u16() == 401 {
        tracing::warn!("Record store rejected bearer token");
        return AppError::InvalidToken;
    }

    AppError::Store(format!("Record store returned {}: {}", status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_rejects_operations() {
        let store = RecordStore::new_mock();
        let err = store.get("some-id", "token").await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }
}
