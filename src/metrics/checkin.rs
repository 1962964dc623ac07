// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily check-in codec.
//!
//! Check-ins share the `description` column with everything else, packed as
//! `"{score}|{notes}|{emotion,emotion,…}"`. The format predates the labeled
//! metric lines and is kept byte-compatible with records already stored.

use serde::{Deserialize, Serialize};

/// Fallback when the score segment is missing or not a number.
const DEFAULT_SCORE: u8 = 5;

/// A daily mood check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinEntry {
    /// Well-being score, 1–10
    pub score: u8,
    pub notes: String,
    pub emotions: Vec<String>,
}

impl Default for CheckinEntry {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            notes: String::new(),
            emotions: Vec::new(),
        }
    }
}

/// Encode a check-in as the pipe-delimited triple.
pub fn encode(entry: &CheckinEntry) -> String {
    format!(
        "{}|{}|{}",
        entry.score,
        entry.notes,
        entry.emotions.join(",")
    )
}

/// Decode a stored check-in description. Total: missing segments default,
/// a non-numeric score falls back to 5, empty emotion tokens are dropped.
pub fn decode(text: &str) -> CheckinEntry {
    let mut parts = text.splitn(3, '|');

    let score = parts
        .next()
        .and_then(|s| s.trim().parse::<u8>().ok())
        .unwrap_or(DEFAULT_SCORE);
    let notes = parts.next().unwrap_or("").to_string();
    let emotions = parts
        .next()
        .map(|s| {
            s.split(',')
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    CheckinEntry {
        score,
        notes,
        emotions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let entry = CheckinEntry {
            score: 8,
            notes: "good climbing session".to_string(),
            emotions: vec!["happy".to_string(), "energized".to_string()],
        };
        assert_eq!(decode(&encode(&entry)), entry);
    }

    #[test]
    fn test_wire_format() {
        let entry = CheckinEntry {
            score: 7,
            notes: "ok day".to_string(),
            emotions: vec!["calm".to_string()],
        };
        assert_eq!(encode(&entry), "7|ok day|calm");
    }

    #[test]
    fn test_decode_empty_input() {
        let entry = decode("");
        assert_eq!(entry.score, 5);
        assert_eq!(entry.notes, "");
        assert!(entry.emotions.is_empty());
    }

    #[test]
    fn test_decode_score_only() {
        let entry = decode("9");
        assert_eq!(entry.score, 9);
        assert_eq!(entry.notes, "");
        assert!(entry.emotions.is_empty());
    }

    #[test]
    fn test_decode_non_numeric_score_defaults() {
        let entry = decode("great|some notes|happy");
        assert_eq!(entry.score, 5);
        assert_eq!(entry.notes, "some notes");
        assert_eq!(entry.emotions, vec!["happy".to_string()]);
    }

    #[test]
    fn test_decode_empty_emotion_tokens_dropped() {
        let entry = decode("6|notes|happy,,calm,");
        assert_eq!(
            entry.emotions,
            vec!["happy".to_string(), "calm".to_string()]
        );
    }

    #[test]
    fn test_notes_keep_extra_pipes() {
        // splitn(3) keeps pipes inside the emotions tail out of notes but a
        // record written as "5|a|b|c" still decodes without loss of the tail
        let entry = decode("5|a|b|c");
        assert_eq!(entry.notes, "a");
        assert_eq!(entry.emotions, vec!["b|c".to_string()]);
    }
}
