// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily mood check-in service.
//!
//! One ❤️ record per user per calendar day. The entry is pipe-encoded into
//! the description column and upserted in place when the user revises their
//! check-in during the day.

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::metrics::{checkin, CheckinEntry};
use crate::middleware::auth::AuthUser;
use crate::models::{Record, CHECKIN_MARKER};
use crate::time_utils;
use chrono::NaiveDate;
use serde::Serialize;

/// A check-in as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinView {
    pub date: String,
    pub score: u8,
    pub notes: String,
    pub emotions: Vec<String>,
}

/// Check-in read/upsert over the record store.
pub struct CheckinService {
    store: RecordStore,
}

impl CheckinService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Today's check-in, if the user has made one.
    pub async fn today(&self, user: &AuthUser) -> Result<Option<CheckinView>> {
        let date = time_utils::today_ymd();
        let record = self
            .store
            .get_by_due_date(&user.user_id, CHECKIN_MARKER, &date, &user.token)
            .await?;

        Ok(record.map(|r| view_from_record(&r, date)))
    }

    /// Create or replace today's check-in.
    pub async fn upsert_today(&self, user: &AuthUser, entry: CheckinEntry) -> Result<CheckinView> {
        let date = time_utils::today_ymd();
        let encoded = checkin::encode(&entry);

        let existing = self
            .store
            .get_by_due_date(&user.user_id, CHECKIN_MARKER, &date, &user.token)
            .await?;

        let record = match existing.and_then(|r| r.id) {
            Some(id) => {
                let patch = serde_json::json!({ "description": encoded });
                self.store.update(&id, &patch, &user.token).await?
            }
            None => {
                let record = Record {
                    id: None,
                    user_id: user.user_id.clone(),
                    title: format!("Daily Check-in - {}", date),
                    description: Some(encoded),
                    // A check-in is complete the moment it exists
                    completed: true,
                    priority: Some("medium".to_string()),
                    due_date: Some(date.clone()),
                    starred: Some(false),
                    emoji: Some(CHECKIN_MARKER.to_string()),
                    created_at: None,
                    updated_at: None,
                };
                self.store.create(&record, &user.token).await?
            }
        };

        tracing::info!(user_id = %user.user_id, score = entry.score, "Saved check-in");
        Ok(view_from_record(&record, date))
    }

    /// All check-ins as (day, entry) pairs, for stats aggregation.
    pub async fn history(&self, user: &AuthUser) -> Result<Vec<(NaiveDate, CheckinEntry)>> {
        let records = self
            .store
            .query(&user.user_id, &[CHECKIN_MARKER], None, 1000, &user.token)
            .await?;

        Ok(records
            .into_iter()
            .filter_map(|r| {
                let date = time_utils::parse_ymd(r.due_date.as_deref()?)?;
                let entry = checkin::decode(r.description.as_deref().unwrap_or(""));
                Some((date, entry))
            })
            .collect())
    }
}

fn view_from_record(record: &Record, date: String) -> CheckinView {
    let entry = checkin::decode(record.description.as_deref().unwrap_or(""));
    CheckinView {
        date,
        score: entry.score,
        notes: entry.notes,
        emotions: entry.emotions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_decodes_description() {
        let record = Record {
            id: Some("rec-1".to_string()),
            user_id: "user-1".to_string(),
            title: "Daily Check-in - 2026-08-24".to_string(),
            description: Some("8|Slept well|happy,calm".to_string()),
            completed: true,
            priority: Some("medium".to_string()),
            due_date: Some("2026-08-24".to_string()),
            starred: Some(false),
            emoji: Some("❤️".to_string()),
            created_at: None,
            updated_at: None,
        };

        let view = view_from_record(&record, "2026-08-24".to_string());
        assert_eq!(view.score, 8);
        assert_eq!(view.notes, "Slept well");
        assert_eq!(view.emotions, vec!["happy", "calm"]);
    }

    #[test]
    fn test_view_empty_description_defaults() {
        let record = Record {
            id: Some("rec-1".to_string()),
            user_id: "user-1".to_string(),
            title: String::new(),
            description: None,
            completed: true,
            priority: None,
            due_date: Some("2026-08-24".to_string()),
            starred: None,
            emoji: Some("❤️".to_string()),
            created_at: None,
            updated_at: None,
        };

        let view = view_from_record(&record, "2026-08-24".to_string());
        assert_eq!(view.score, 5);
        assert!(view.notes.is_empty());
        assert!(view.emotions.is_empty());
    }
}
