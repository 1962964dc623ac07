// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record store layer (Supabase/PostgREST).

pub mod supabase;

pub use supabase::{RecordQueryCursor, RecordStore};

/// Table names as constants.
pub mod tables {
    /// The one table workouts, goals, and check-ins all live in.
    pub const TODOS: &str = "todos";
}
