//! ISO 8601 duration parsing anchored to a reference instant.
//!
//! Worklog durations arrive as ISO 8601 duration strings (`PT1H30M`, `P1D`,
//! `P1M`). Calendar units are not fixed lengths: a month after January 31st
//! is shorter than a month after March 1st, and a day across a DST change is
//! not 24 hours. This module therefore never converts calendar units with a
//! fixed factor. Instead, it adds them to a reference instant and measures the
//! wall-clock delta.
//!
//! ## Grammar
//!
//! ```text
//! P [n Y] [n M] [n W] [n D] [ T [n H] [n M] [n[.f] S] ]
//! ```
//!
//! - At least one component is required (`P` alone is malformed)
//! - A `T` must be followed by at least one time component (`P1DT` is malformed)
//! - Only seconds may carry a fraction, separated by `.` or `,`
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tracklog::libs::duration::parse;
//!
//! let january = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! assert_eq!(parse(&january, "P1M").unwrap().num_days(), 31);
//! assert_eq!(parse(&january, "PT1H30M").unwrap().num_minutes(), 90);
//! ```

use chrono::{DateTime, Days, Duration, Months, TimeZone};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

static GRAMMAR: OnceLock<Regex> = OnceLock::new();

fn grammar() -> &'static Regex {
    GRAMMAR.get_or_init(|| {
        Regex::new(
            r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:[.,](\d{1,9}))?S)?)?$",
        )
        .expect("duration grammar must compile")
    })
}

/// Failures while turning duration text into elapsed time.
///
/// Both variants are recoverable for the pivot builder: the entry stays in
/// the table with a zero contribution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("malformed duration '{0}'")]
    MalformedDuration(String),

    #[error("duration '{0}' is out of range for its reference instant")]
    DurationOutOfRange(String),
}

/// A parsed, not yet anchored, ISO 8601 duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub nanos: u32,
}

impl FromStr for IsoDuration {
    type Err = DurationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || DurationError::MalformedDuration(text.to_string());
        let out_of_range = || DurationError::DurationOutOfRange(text.to_string());

        let captures = grammar().captures(text).ok_or_else(malformed)?;

        // The regex lets every component be optional; reject the empty forms.
        if text.ends_with('T') || captures.iter().skip(1).all(|group| group.is_none()) {
            return Err(malformed());
        }

        let calendar = |index: usize| -> Result<u32, DurationError> {
            captures
                .get(index)
                .map_or(Ok(0), |group| group.as_str().parse::<u32>().map_err(|_| out_of_range()))
        };
        let clock = |index: usize| -> Result<i64, DurationError> {
            captures
                .get(index)
                .map_or(Ok(0), |group| group.as_str().parse::<i64>().map_err(|_| out_of_range()))
        };

        // Right-pad the fraction to nanoseconds: ".5" is 500_000_000ns.
        let nanos = match captures.get(8) {
            Some(fraction) => format!("{:0<9}", fraction.as_str()).parse::<u32>().map_err(|_| malformed())?,
            None => 0,
        };

        Ok(Self {
            years: calendar(1)?,
            months: calendar(2)?,
            weeks: calendar(3)?,
            days: calendar(4)?,
            hours: clock(5)?,
            minutes: clock(6)?,
            seconds: clock(7)?,
            nanos,
        })
    }
}

impl IsoDuration {
    /// Resolves the duration against `reference`.
    ///
    /// Calendar units are added in the local calendar of `reference`; month
    /// arithmetic clamps to the last valid day of the target month. Returns
    /// `None` when any step overflows or lands on a non-existent local time.
    pub fn elapsed_from<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Option<Duration> {
        let months = self.years.checked_mul(12)?.checked_add(self.months)?;
        let days = u64::from(self.weeks) * 7 + u64::from(self.days);

        let clock = Duration::try_hours(self.hours)?
            .checked_add(&Duration::try_minutes(self.minutes)?)?
            .checked_add(&Duration::try_seconds(self.seconds)?)?
            .checked_add(&Duration::nanoseconds(i64::from(self.nanos)))?;

        let end = reference
            .clone()
            .checked_add_months(Months::new(months))?
            .checked_add_days(Days::new(days))?
            .checked_add_signed(clock)?;

        Some(end.signed_duration_since(reference.clone()))
    }
}

/// Parses `text` and resolves it against `reference`.
///
/// The same text may yield different elapsed time for different references
/// when it contains calendar units.
pub fn parse<Tz: TimeZone>(reference: &DateTime<Tz>, text: &str) -> Result<Duration, DurationError> {
    let duration: IsoDuration = text.trim().parse()?;
    duration
        .elapsed_from(reference)
        .ok_or_else(|| DurationError::DurationOutOfRange(text.to_string()))
}
