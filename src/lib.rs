// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trail Tracker: log outdoor workouts, set goals, check in on your mood.
//!
//! This crate provides the backend API glue around a Supabase record store.
//! The interesting part lives in [`metrics`]: the codec that packs structured
//! workout metrics into the single free-text `description` column and
//! recovers them from records written under any historical scheme.

pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RecordStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: RecordStore,
}
