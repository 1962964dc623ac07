// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end codec scenarios over realistic stored descriptions.
//!
//! The store holds descriptions written by several generations of the app;
//! these cases are lifted from the shapes found in real rows.

use trail_tracker::metrics::codec;
use trail_tracker::metrics::{DistanceUnit, StructuredMetrics};
use trail_tracker::models::ActivityKind;

#[test]
fn test_current_format_round_trip() {
    let metrics = StructuredMetrics {
        duration_hours: 1,
        duration_minutes: 15,
        distance_value: "10".to_string(),
        distance_unit: DistanceUnit::Km,
        average_speed: "8".to_string(),
        fastest_speed: "12.5".to_string(),
        location: "Golden Gate Park".to_string(),
        notes: "Felt strong on the hills".to_string(),
        ..Default::default()
    };

    let encoded = codec::encode(&metrics, ActivityKind::Running);
    let decoded = codec::decode(&encoded);

    assert_eq!(decoded, metrics);
}

#[test]
fn test_legacy_freeform_description() {
    // Row written before the labeled format existed
    let decoded = codec::decode("Location: Rocky Mountain National Park\n3.1 miles");

    assert_eq!(decoded.location, "Rocky Mountain National Park");
    assert_eq!(decoded.mileage, "3.1");
    assert_eq!(decoded.notes, "");
}

#[test]
fn test_handwritten_note_with_inline_fragments() {
    let decoded = codec::decode("Ran 5 miles with Sam, At: Marin Headlands, great views");

    assert_eq!(decoded.mileage, "5");
    assert_eq!(decoded.location, "Marin Headlands");
    // Prose around the fragments survives as notes
    assert!(decoded.notes.contains("Ran"));
    assert!(decoded.notes.contains("great views"));
}

#[test]
fn test_plain_prose_is_all_notes() {
    let text = "Easy recovery day.\nStretched afterwards.";
    let decoded = codec::decode(text);

    assert_eq!(decoded.notes, text);
    assert_eq!(decoded, StructuredMetrics {
        notes: text.to_string(),
        ..Default::default()
    });
}

#[test]
fn test_non_speed_kind_drops_speed_lines_on_encode() {
    let metrics = StructuredMetrics {
        duration_hours: 2,
        distance_value: "4".to_string(),
        average_speed: "2".to_string(),
        ..Default::default()
    };

    let encoded = codec::encode(&metrics, ActivityKind::Hiking);

    assert!(!encoded.contains("Avg Speed"));
    assert!(!encoded.contains("Max Speed"));
    assert!(encoded.contains("Distance: 4 miles"));
}
