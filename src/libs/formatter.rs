//! Human-readable formatting for durations and issue links.
//!
//! ## Duration Format
//!
//! Durations render as `"<H>h <M>m"`:
//! - A zero component is omitted (`"2h"`, `"45m"`)
//! - Seconds are truncated
//! - Zero and negative durations render as `"0m"`
//!
//! ## Examples
//!
//! ```rust
//! use chrono::Duration;
//! use tracklog::libs::formatter::{format_duration, issue_url};
//!
//! assert_eq!(format_duration(&(Duration::hours(1) + Duration::minutes(30))), "1h 30m");
//! assert_eq!(format_duration(&Duration::zero()), "0m");
//! assert_eq!(issue_url("https://tracker.example.com", "PRJ-1"), "https://tracker.example.com/PRJ-1");
//! ```

use chrono::Duration;

/// Formats a duration as `"<H>h <M>m"`, omitting zero components.
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if mins > 0 {
        parts.push(format!("{}m", mins));
    }

    if parts.is_empty() {
        return "0m".to_string();
    }
    parts.join(" ")
}

/// Joins the tracker web host and an issue key with exactly one slash.
///
/// Returns an empty string when no host is configured.
pub fn issue_url(host: &str, issue_key: &str) -> String {
    if host.is_empty() {
        return String::new();
    }
    if host.ends_with('/') {
        format!("{}{}", host, issue_key)
    } else {
        format!("{}/{}", host, issue_key)
    }
}
