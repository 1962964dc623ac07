// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record row model and category markers.
//!
//! Workouts, goals, and daily check-ins all live in one `todos` table in the
//! record store, told apart only by the `emoji` column. The marker sets here
//! mirror the ones the original schema was seeded with; they are the filter
//! values for every category-scoped query.

use serde::{Deserialize, Serialize};

/// Emoji markers identifying workout records.
pub const WORKOUT_MARKERS: [&str; 8] = ["🏃", "🧗", "🥾", "🏂", "🚴", "🏊", "💪", "🧘"];

/// Emoji markers identifying goal records.
pub const GOAL_MARKERS: [&str; 8] = ["🎯", "🏆", "📚", "💡", "🌟", "🔥", "⚡", "🚀"];

/// Emoji marker identifying daily check-in records.
pub const CHECKIN_MARKER: &str = "❤️";

/// A row in the record store's `todos` table.
///
/// `description` is the free-text column the metadata codec writes to and
/// reads from; no other field crosses the codec boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned ID; absent on insert payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owner reference (Supabase auth user ID)
    pub user_id: String,
    /// Short display string
    pub title: String,
    /// Free-text field holding codec output (or anything the user typed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Intensity for workouts, priority otherwise ("low"/"medium"/"high")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Workout date, goal target date, or check-in day ("YYYY-MM-DD")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    /// Category marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Activity category selecting which metric fields are relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Running,
    Climbing,
    Hiking,
    Snowboarding,
    Cycling,
    Swimming,
    Strength,
    Yoga,
}

impl ActivityKind {
    /// Whether average/fastest speed is tracked for this kind.
    ///
    /// Speed lines are only ever written for distance-bearing kinds.
    pub fn tracks_speed(self) -> bool {
        matches!(self, ActivityKind::Running | ActivityKind::Cycling)
    }

    /// The emoji marker stored in the record's `emoji` column.
    pub fn marker(self) -> &'static str {
        match self {
            ActivityKind::Running => "🏃",
            ActivityKind::Climbing => "🧗",
            ActivityKind::Hiking => "🥾",
            ActivityKind::Snowboarding => "🏂",
            ActivityKind::Cycling => "🚴",
            ActivityKind::Swimming => "🏊",
            ActivityKind::Strength => "💪",
            ActivityKind::Yoga => "🧘",
        }
    }

    /// Reverse lookup from a stored marker.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "🏃" => Some(ActivityKind::Running),
            "🧗" => Some(ActivityKind::Climbing),
            "🥾" => Some(ActivityKind::Hiking),
            "🏂" => Some(ActivityKind::Snowboarding),
            "🚴" => Some(ActivityKind::Cycling),
            "🏊" => Some(ActivityKind::Swimming),
            "💪" => Some(ActivityKind::Strength),
            "🧘" => Some(ActivityKind::Yoga),
            _ => None,
        }
    }

    /// Stable lowercase name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Climbing => "climbing",
            ActivityKind::Hiking => "hiking",
            ActivityKind::Snowboarding => "snowboarding",
            ActivityKind::Cycling => "cycling",
            ActivityKind::Swimming => "swimming",
            ActivityKind::Strength => "strength",
            ActivityKind::Yoga => "yoga",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_round_trip() {
        for kind in [
            ActivityKind::Running,
            ActivityKind::Climbing,
            ActivityKind::Hiking,
            ActivityKind::Snowboarding,
            ActivityKind::Cycling,
            ActivityKind::Swimming,
            ActivityKind::Strength,
            ActivityKind::Yoga,
        ] {
            assert_eq!(ActivityKind::from_marker(kind.marker()), Some(kind));
            assert!(WORKOUT_MARKERS.contains(&kind.marker()));
        }
    }

    #[test]
    fn test_speed_only_for_distance_kinds() {
        assert!(ActivityKind::Running.tracks_speed());
        assert!(ActivityKind::Cycling.tracks_speed());
        assert!(!ActivityKind::Strength.tracks_speed());
        assert!(!ActivityKind::Yoga.tracks_speed());
    }

    #[test]
    fn test_unknown_marker() {
        assert_eq!(ActivityKind::from_marker("🎯"), None);
    }
}
