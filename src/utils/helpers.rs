//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a timestamp for user display (relative time)
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let diff = now.signed_duration_since(timestamp);

    if diff < Duration::minutes(1) {
        "just now".to_string()
    } else if diff < Duration::hours(1) {
        format!("{} minutes ago", diff.num_minutes())
    } else if diff < Duration::days(1) {
        format!("{} hours ago", diff.num_hours())
    } else if diff < Duration::weeks(1) {
        format!("{} days ago", diff.num_days())
    } else {
        format_timestamp(timestamp)
    }
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.') && email.len() > 5
}

/// Calculate pagination offset
pub fn pagination_offset(page: i64, page_size: i64) -> i64 {
    (page.max(0)) * page_size.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now), "just now");
        assert!(format_relative_time(now - Duration::minutes(5)).contains("minutes ago"));
        assert!(format_relative_time(now - Duration::hours(3)).contains("hours ago"));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("driver@example.com"));
        assert!(!is_valid_email("short"));
        assert!(!is_valid_email("no-at-sign.com"));
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(pagination_offset(0, 20), 0);
        assert_eq!(pagination_offset(2, 20), 40);
        assert_eq!(pagination_offset(-1, 20), 0);
    }
}
