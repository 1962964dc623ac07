// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Codecs for structured data stored in the free-text `description` column.
//!
//! The record store gives us exactly one text field per record, so every
//! structured thing the app tracks gets flattened into it: workout metrics
//! as labeled lines ([`codec`]), daily check-ins as a pipe-delimited triple
//! ([`checkin`]). Both decoders are total; arbitrary user-typed text always
//! produces a usable value.

pub mod checkin;
pub mod codec;

pub use checkin::CheckinEntry;
pub use codec::{DistanceUnit, StructuredMetrics};
