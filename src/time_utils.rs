// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date handling.

use chrono::{NaiveDate, Utc};

/// Today's date in UTC as "YYYY-MM-DD", the record store's due_date format.
pub fn today_ymd() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Parse a "YYYY-MM-DD" date string.
pub fn parse_ymd(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ymd() {
        assert_eq!(
            parse_ymd("2026-08-24"),
            NaiveDate::from_ymd_opt(2026, 8, 24)
        );
        assert_eq!(parse_ymd("08/24/2026"), None);
        assert_eq!(parse_ymd(""), None);
    }

    #[test]
    fn test_today_ymd_shape() {
        let today = today_ymd();
        assert!(parse_ymd(&today).is_some());
    }
}
