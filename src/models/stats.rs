// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard aggregates computed over fetched records.
//!
//! The record store has no server-side aggregation for us, so the dashboard
//! numbers are a pure fold over the rows a query returned. Everything here
//! is synchronous and side-effect free; handlers fetch, then fold.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::metrics::{codec, CheckinEntry, DistanceUnit};
use crate::models::{ActivityKind, Record};

const KM_TO_MILES: f64 = 0.621_371;

/// Aggregated statistics for a user's dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    // ─── Workouts ────────────────────────────────────────────────
    pub total_workouts: u32,
    pub completed_workouts: u32,
    /// Workout count per activity kind (for the breakdown widget)
    pub workouts_by_kind: HashMap<String, u32>,
    /// Sum of decoded durations, in minutes
    pub total_duration_minutes: u64,
    /// Sum of decoded distances, normalized to miles
    pub total_distance_miles: f64,
    /// Workout count per month ("YYYY-MM")
    pub workouts_by_month: HashMap<String, u32>,

    // ─── Goals ───────────────────────────────────────────────────
    pub active_goals: u32,
    pub completed_goals: u32,

    // ─── Check-ins ───────────────────────────────────────────────
    pub checkin_count: u32,
    pub average_checkin_score: f64,
    /// Consecutive check-in days ending today or yesterday
    pub checkin_streak_days: u32,
}

impl UserStats {
    /// Fold one workout record into the aggregates.
    ///
    /// The description is decoded on the way in; records whose description
    /// was typed free-hand simply contribute zero duration and distance.
    pub fn update_from_workout(&mut self, record: &Record) {
        self.total_workouts += 1;
        if record.completed {
            self.completed_workouts += 1;
        }

        if let Some(kind) = record
            .emoji
            .as_deref()
            .and_then(ActivityKind::from_marker)
        {
            *self
                .workouts_by_kind
                .entry(kind.as_str().to_string())
                .or_insert(0) += 1;
        }

        let metrics = codec::decode(record.description.as_deref().unwrap_or_default());

        self.total_duration_minutes +=
            u64::from(metrics.duration_hours) * 60 + u64::from(metrics.duration_minutes);
        self.total_distance_miles += distance_in_miles(&metrics);

        if let Some(month_key) = record.due_date.as_deref().and_then(extract_month_key) {
            *self.workouts_by_month.entry(month_key).or_insert(0) += 1;
        }
    }

    /// Fold one goal record into the aggregates.
    pub fn update_from_goal(&mut self, record: &Record) {
        if record.completed {
            self.completed_goals += 1;
        } else {
            self.active_goals += 1;
        }
    }

    /// Fold the check-in series: average score and current streak.
    pub fn update_from_checkins(&mut self, entries: &[(NaiveDate, CheckinEntry)], today: NaiveDate) {
        self.checkin_count = entries.len() as u32;
        if !entries.is_empty() {
            let total: u32 = entries.iter().map(|(_, e)| u32::from(e.score)).sum();
            self.average_checkin_score = f64::from(total) / entries.len() as f64;
        }
        self.checkin_streak_days =
            current_streak(entries.iter().map(|(d, _)| *d).collect(), today);
    }
}

/// Decoded distance normalized to miles. Legacy standalone mileage counts
/// when no labeled distance is present; mileage was always recorded in miles.
fn distance_in_miles(metrics: &codec::StructuredMetrics) -> f64 {
    if let Ok(value) = metrics.distance_value.parse::<f64>() {
        return match metrics.distance_unit {
            DistanceUnit::Miles => value,
            DistanceUnit::Km => value * KM_TO_MILES,
        };
    }
    metrics.mileage.parse::<f64>().unwrap_or(0.0)
}

/// Consecutive calendar days with a check-in, ending today or yesterday.
fn current_streak(days: HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today.pred_opt().unwrap_or(today);
    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Extract "YYYY-MM" from a "YYYY-MM-DD" date string.
fn extract_month_key(date: &str) -> Option<String> {
    if date.len() >= 7 {
        Some(date[..7].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_workout(kind: ActivityKind, date: &str, description: &str, completed: bool) -> Record {
        Record {
            id: Some("r1".to_string()),
            user_id: "user-1".to_string(),
            title: "Test workout".to_string(),
            description: Some(description.to_string()),
            completed,
            priority: Some("medium".to_string()),
            due_date: Some(date.to_string()),
            starred: None,
            emoji: Some(kind.marker().to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_workout_aggregation() {
        let mut stats = UserStats::default();
        stats.update_from_workout(&make_workout(
            ActivityKind::Running,
            "2026-08-20",
            "Duration: 1h 30m\nDistance: 5.2 miles\nAvg Speed: 6.0 miles/hr",
            true,
        ));
        stats.update_from_workout(&make_workout(
            ActivityKind::Hiking,
            "2026-08-21",
            "Duration: 45m",
            false,
        ));

        assert_eq!(stats.total_workouts, 2);
        assert_eq!(stats.completed_workouts, 1);
        assert_eq!(stats.workouts_by_kind.get("running"), Some(&1));
        assert_eq!(stats.workouts_by_kind.get("hiking"), Some(&1));
        assert_eq!(stats.total_duration_minutes, 135);
        assert!((stats.total_distance_miles - 5.2).abs() < 1e-9);
        assert_eq!(stats.workouts_by_month.get("2026-08"), Some(&2));
    }

    #[test]
    fn test_km_distance_normalized_to_miles() {
        let mut stats = UserStats::default();
        stats.update_from_workout(&make_workout(
            ActivityKind::Cycling,
            "2026-08-20",
            "Distance: 10 km",
            false,
        ));
        assert!((stats.total_distance_miles - 6.21371).abs() < 1e-6);
    }

    #[test]
    fn test_legacy_mileage_counts_as_distance() {
        let mut stats = UserStats::default();
        stats.update_from_workout(&make_workout(
            ActivityKind::Running,
            "2026-08-20",
            "Location: Bear Lake\n3.1 miles",
            false,
        ));
        assert!((stats.total_distance_miles - 3.1).abs() < 1e-9);
    }

    #[test]
    fn test_freehand_description_contributes_nothing() {
        let mut stats = UserStats::default();
        stats.update_from_workout(&make_workout(
            ActivityKind::Yoga,
            "2026-08-20",
            "just stretched and breathed",
            true,
        ));
        assert_eq!(stats.total_duration_minutes, 0);
        assert_eq!(stats.total_distance_miles, 0.0);
        assert_eq!(stats.total_workouts, 1);
    }

    #[test]
    fn test_goal_counts() {
        let mut stats = UserStats::default();
        let mut goal = make_workout(ActivityKind::Running, "2026-12-31", "", false);
        goal.emoji = Some("🎯".to_string());
        stats.update_from_goal(&goal);
        goal.completed = true;
        stats.update_from_goal(&goal);

        assert_eq!(stats.active_goals, 1);
        assert_eq!(stats.completed_goals, 1);
    }

    #[test]
    fn test_checkin_average_and_streak() {
        let mut stats = UserStats::default();
        let today = day(2026, 8, 24);
        let entries = vec![
            (day(2026, 8, 22), CheckinEntry { score: 6, ..Default::default() }),
            (day(2026, 8, 23), CheckinEntry { score: 8, ..Default::default() }),
            (day(2026, 8, 24), CheckinEntry { score: 7, ..Default::default() }),
        ];
        stats.update_from_checkins(&entries, today);

        assert_eq!(stats.checkin_count, 3);
        assert!((stats.average_checkin_score - 7.0).abs() < 1e-9);
        assert_eq!(stats.checkin_streak_days, 3);
    }

    #[test]
    fn test_streak_allows_missing_today() {
        let today = day(2026, 8, 24);
        let days: HashSet<NaiveDate> = [day(2026, 8, 22), day(2026, 8, 23)].into();
        assert_eq!(current_streak(days, today), 2);
    }

    #[test]
    fn test_streak_broken_by_gap() {
        let today = day(2026, 8, 24);
        let days: HashSet<NaiveDate> =
            [day(2026, 8, 24), day(2026, 8, 22), day(2026, 8, 21)].into();
        assert_eq!(current_streak(days, today), 1);
    }

    #[test]
    fn test_streak_zero_when_stale() {
        let today = day(2026, 8, 24);
        let days: HashSet<NaiveDate> = [day(2026, 8, 20)].into();
        assert_eq!(current_streak(days, today), 0);
    }
}
