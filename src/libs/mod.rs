//! Core library modules.
//!
//! ## Features
//!
//! - **Pivot Engine**: ISO 8601 duration parsing, calendar buckets and the worklog pivot table
//! - **Service**: Fetch-then-pivot over explicit fetch and display windows
//! - **Presentation**: Duration formatting, terminal tables and JSON output
//! - **Infrastructure**: Configuration, data storage, messaging
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tracklog::libs::calendar::TimeSpan;
//! use tracklog::libs::pivot;
//!
//! let display = TimeSpan::new(
//!     Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
//! );
//! let table = pivot::build(&[], &display).unwrap();
//! assert_eq!(table.days.len(), 7);
//! ```

pub mod calendar;
pub mod config;
pub mod data_storage;
pub mod duration;
pub mod formatter;
pub mod messages;
pub mod pivot;
pub mod service;
pub mod view;
