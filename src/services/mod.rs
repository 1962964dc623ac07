// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod checkin;
pub mod goal;
pub mod workout;

pub use checkin::CheckinService;
pub use goal::GoalService;
pub use workout::WorkoutService;
