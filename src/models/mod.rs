// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod record;
pub mod stats;

pub use record::{ActivityKind, Record, CHECKIN_MARKER, GOAL_MARKERS, WORKOUT_MARKERS};
pub use stats::UserStats;
