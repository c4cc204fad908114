//! # Tracklog - worklog calendar for issue trackers
//!
//! Fetches a user's time-tracking entries from a remote issue tracker and
//! renders them as a calendar pivot table: issues as rows, days as columns,
//! durations in the cells, with per-day, per-issue and grand totals.
//!
//! ## Features
//!
//! - **Tracker Client**: Authenticated HTTP client built on an interceptor chain
//! - **Pivot Engine**: Deterministic bucketing and summing of raw entries
//! - **Two Windows**: Fetch a wide window, display a narrower one
//! - **Output**: Terminal tables and JSON
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tracklog::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
