// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout metadata codec.
//!
//! Encodes a [`StructuredMetrics`] value into the plain-text layout stored in
//! a record's `description` field, and decodes a stored description back into
//! structured form. The encoder only ever emits the canonical labeled-line
//! format; the decoder additionally understands the legacy free-text schemes
//! ("3.1 miles" mileage fragments, inline "Location:"/"At:" markers) so
//! records written under any historical scheme still parse.
//!
//! Decoding never fails. Lines that cannot be confidently classified as a
//! metric are carried verbatim into `notes`, preserving their relative order.

use crate::models::ActivityKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Inline legacy mileage fragment: "3.1 miles", "5 mi".
static MILEAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(?:miles|mi)\b").unwrap());

/// Inline legacy location fragment, value running up to a comma or line end.
static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:Location|At):\s*([^,\n]+)").unwrap());

/// Unit for distance and (by inference) speed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Km,
}

impl DistanceUnit {
    /// The literal unit string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "miles",
            DistanceUnit::Km => "km",
        }
    }

    fn from_token(token: &str) -> Self {
        // Anything that isn't "km" defaults to miles
        if token.eq_ignore_ascii_case("km") {
            DistanceUnit::Km
        } else {
            DistanceUnit::Miles
        }
    }
}

/// Structured workout metrics, in-memory only.
///
/// Numeric-ish fields are kept as the caller supplied them ("5.2", not 5.2)
/// so the textual representation survives a round trip unchanged. An empty
/// string means the field is absent; no field is ever required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredMetrics {
    #[serde(default)]
    pub duration_hours: u32,
    /// Minutes component, 0–59 as entered on the form
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub distance_value: String,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    #[serde(default)]
    pub average_speed: String,
    #[serde(default)]
    pub fastest_speed: String,
    /// Standalone mileage recovered from legacy free-text records
    #[serde(default)]
    pub mileage: String,
    #[serde(default)]
    pub location: String,
    /// Residual free text: everything that is not a recognized metric
    #[serde(default)]
    pub notes: String,
}

/// Encode metrics into the canonical labeled-line description format.
///
/// One line per populated metric, then the free-text notes verbatim as the
/// final line(s). Lines are newline-joined with no trailing separator. Speed
/// lines are only written for kinds that track speed, with the unit suffix
/// derived from the distance unit.
pub fn encode(metrics: &StructuredMetrics, kind: ActivityKind) -> String {
    let mut lines: Vec<String> = Vec::new();

    match (metrics.duration_hours, metrics.duration_minutes) {
        (0, 0) => {}
        (h, 0) => lines.push(format!("Duration: {}h", h)),
        (0, m) => lines.push(format!("Duration: {}m", m)),
        (h, m) => lines.push(format!("Duration: {}h {}m", h, m)),
    }

    if !metrics.distance_value.is_empty() {
        lines.push(format!(
            "Distance: {} {}",
            metrics.distance_value,
            metrics.distance_unit.as_str()
        ));
    }

    if kind.tracks_speed() {
        if !metrics.average_speed.is_empty() {
            lines.push(format!(
                "Avg Speed: {} {}/hr",
                metrics.average_speed,
                metrics.distance_unit.as_str()
            ));
        }
        if !metrics.fastest_speed.is_empty() {
            lines.push(format!(
                "Max Speed: {} {}/hr",
                metrics.fastest_speed,
                metrics.distance_unit.as_str()
            ));
        }
    }

    if !metrics.location.is_empty() {
        lines.push(format!("Location: {}", metrics.location));
    }

    if !metrics.notes.is_empty() {
        lines.push(metrics.notes.clone());
    }

    lines.join("\n")
}

/// Decode a stored description into structured metrics, best effort.
///
/// Single pass over the lines, order-independent between metrics. Each line
/// is tried against the labeled prefixes first (case-insensitive label); a
/// labeled line whose value does not parse degrades to notes rather than
/// erroring. Unlabeled lines go through the legacy inline scan before being
/// kept as notes.
pub fn decode(text: &str) -> StructuredMetrics {
    let mut metrics = StructuredMetrics::default();
    let mut notes: Vec<String> = Vec::new();

    for line in text.lines() {
        // Labeled lines are consumed by the first matching label; one whose
        // value does not parse goes to notes verbatim and is never subject
        // to the legacy inline scan.
        if let Some(rest) = strip_label(line, "Duration: ") {
            if !parse_duration(rest, &mut metrics) {
                notes.push(line.to_string());
            }
        } else if let Some(rest) = strip_label(line, "Distance: ") {
            if !parse_distance(rest, &mut metrics) {
                notes.push(line.to_string());
            }
        } else if let Some(rest) = strip_label(line, "Avg Speed: ") {
            match leading_number(rest) {
                Some(value) => metrics.average_speed = value,
                None => notes.push(line.to_string()),
            }
        } else if let Some(rest) = strip_label(line, "Max Speed: ") {
            match leading_number(rest) {
                Some(value) => metrics.fastest_speed = value,
                None => notes.push(line.to_string()),
            }
        } else if let Some(rest) =
            strip_label(line, "Location: ").or_else(|| strip_label(line, "At: "))
        {
            let value = rest.trim();
            if value.is_empty() {
                notes.push(line.to_string());
            } else {
                metrics.location = value.to_string();
            }
        } else {
            scan_legacy_line(line, &mut metrics, &mut notes);
        }
    }

    metrics.notes = notes.join("\n");
    metrics
}

/// Case-insensitive prefix match on the label, returning the rest of the line.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        Some(&line[label.len()..])
    } else {
        None
    }
}

/// Parse "{h}h", "{m}m", or "{h}h {m}m" out of a Duration value.
///
/// Returns false if neither component is present, so the caller can degrade
/// the line to notes.
fn parse_duration(rest: &str, metrics: &mut StructuredMetrics) -> bool {
    static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)h").unwrap());
    static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)m").unwrap());

    let hours = HOURS_RE
        .captures(rest)
        .and_then(|c| c[1].parse::<u32>().ok());
    let minutes = MINUTES_RE
        .captures(rest)
        .and_then(|c| c[1].parse::<u32>().ok());

    if hours.is_none() && minutes.is_none() {
        return false;
    }
    metrics.duration_hours = hours.unwrap_or(0);
    metrics.duration_minutes = minutes.unwrap_or(0);
    true
}

/// Parse "{value} {unit}" out of a Distance value.
///
/// The value token is kept exactly as supplied. An unrecognized or missing
/// unit token defaults to miles.
fn parse_distance(rest: &str, metrics: &mut StructuredMetrics) -> bool {
    let mut tokens = rest.split_whitespace();
    let Some(value) = tokens.next().filter(|t| is_decimal(t)) else {
        return false;
    };
    metrics.distance_value = value.to_string();
    metrics.distance_unit = tokens.next().map(DistanceUnit::from_token).unwrap_or_default();
    true
}

/// First whitespace-delimited token, if it is a non-negative decimal.
/// The remainder (the "{unit}/hr" suffix) is discarded.
fn leading_number(rest: &str) -> Option<String> {
    rest.split_whitespace()
        .next()
        .filter(|t| is_decimal(t))
        .map(str::to_string)
}

fn is_decimal(token: &str) -> bool {
    token
        .parse::<f64>()
        .map(|v| v.is_finite() && v >= 0.0)
        .unwrap_or(false)
}

/// Scan an unlabeled line for legacy inline fragments, pushing whatever
/// remains onto the notes accumulator.
fn scan_legacy_line(line: &str, metrics: &mut StructuredMetrics, notes: &mut Vec<String>) {
    let mut remainder = line.to_string();
    let mut stripped = false;

    // Only the first occurrence in the whole text wins; later fragments stay
    // in notes verbatim.
    if metrics.mileage.is_empty() {
        if let Some(caps) = MILEAGE_RE.captures(&remainder) {
            metrics.mileage = caps[1].to_string();
            let range = caps.get(0).map(|m| m.range()).unwrap_or_default();
            remainder.replace_range(range, "");
            stripped = true;
        }
    }
    if metrics.location.is_empty() {
        if let Some(caps) = LOCATION_RE.captures(&remainder) {
            metrics.location = caps[1].trim().to_string();
            let range = caps.get(0).map(|m| m.range()).unwrap_or_default();
            remainder.replace_range(range, "");
            stripped = true;
        }
    }

    if stripped {
        let leftover = remainder.trim().trim_matches(',').trim();
        if !leftover.is_empty() {
            notes.push(leftover.to_string());
        }
    } else {
        // Untouched lines (including blank ones) are preserved verbatim so
        // notes reconstruct the non-metric content exactly.
        notes.push(line.to_string());
    }
}
