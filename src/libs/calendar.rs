//! Time windows and calendar-day buckets.
//!
//! Two windows are involved in every worklog table: the *fetch* window that
//! bounds what is requested from the tracker, and the *display* window whose
//! calendar days become the table columns. Both are [`TimeSpan`] values and
//! are always passed explicitly.
//!
//! All spans are half-open (`[start, end)`). A span whose end is not after
//! its start is valid and simply produces no buckets.

use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, Months, NaiveDate, TimeZone};
use clap::ValueEnum;
use thiserror::Error;

/// Format used for bucket labels and for custom window bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tracker timestamps use a `+HHMM` offset without a colon.
const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("window end {to} is before its start {from}")]
    Reversed { from: NaiveDate, to: NaiveDate },

    #[error("midnight of {0} does not exist in the local time zone")]
    NoMidnight(NaiveDate),
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSpan<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> TimeSpan<Tz> {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Builds `[from 00:00, to 00:00)` in `tz`.
    pub fn from_dates(tz: &Tz, from: NaiveDate, to: NaiveDate) -> Result<Self, WindowError> {
        if to < from {
            return Err(WindowError::Reversed { from, to });
        }
        Ok(Self::new(midnight(tz, from)?, midnight(tz, to)?))
    }
}

/// A window together with the title it is presented under.
#[derive(Debug, Clone)]
pub struct TitledSpan<Tz: TimeZone> {
    pub title: String,
    pub span: TimeSpan<Tz>,
}

/// Named windows relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// The current calendar day
    Today,
    /// Monday to Monday of the current week
    Week,
    /// First day of this month to first day of the next
    Month,
}

impl Preset {
    pub fn title(&self) -> &'static str {
        match self {
            Preset::Today => "Today",
            Preset::Week => "Current week",
            Preset::Month => "Current month",
        }
    }

    /// Resolves the preset around `now`, in `now`'s time zone.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TitledSpan<Tz>, WindowError> {
        let tz = now.timezone();
        let today = now.date_naive();

        let (first, last) = match self {
            Preset::Today => (today, today + Days::new(1)),
            Preset::Week => {
                let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
                (monday, monday + Days::new(7))
            }
            Preset::Month => {
                let first = today.with_day(1).ok_or(WindowError::NoMidnight(today))?;
                (first, first + Months::new(1))
            }
        };

        Ok(TitledSpan {
            title: self.title().to_string(),
            span: TimeSpan::from_dates(&tz, first, last)?,
        })
    }
}

/// Parses a custom `from`/`to` pair of `YYYY-MM-DD` dates into a window.
///
/// `to` is exclusive: `2024-03-01`..`2024-03-03` covers two days.
pub fn custom<Tz: TimeZone>(tz: &Tz, from: &str, to: &str) -> Result<TitledSpan<Tz>, WindowError> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;
    Ok(TitledSpan {
        title: "Custom".to_string(),
        span: TimeSpan::from_dates(tz, from, to)?,
    })
}

pub fn parse_date(text: &str) -> Result<NaiveDate, WindowError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| WindowError::InvalidDate(text.to_string()))
}

/// Parses an entry timestamp as RFC 3339 or in the tracker's `+HHMM` form.
pub fn parse_instant(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).or_else(|_| DateTime::parse_from_str(text, TRACKER_TIMESTAMP_FORMAT))
}

fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>, WindowError> {
    tz.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .earliest()
        .ok_or(WindowError::NoMidnight(date))
}

/// Ordered calendar days of a display window.
///
/// Days are produced by stepping one calendar day from the window start
/// while strictly before its end, so the start's time of day marks the day
/// boundary.
#[derive(Debug, Clone)]
pub struct CalendarBuckets<Tz: TimeZone> {
    tz: Tz,
    days: Vec<NaiveDate>,
}

impl<Tz: TimeZone> CalendarBuckets<Tz> {
    pub fn new(span: &TimeSpan<Tz>) -> Self {
        let mut days = Vec::new();
        let mut cursor = span.start.clone();

        while cursor < span.end {
            days.push(cursor.date_naive());
            // A step may land in a DST gap; fall back to a fixed 24 hours.
            let next = cursor
                .clone()
                .checked_add_days(Days::new(1))
                .or_else(|| cursor.clone().checked_add_signed(Duration::days(1)));
            match next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        Self {
            tz: span.start.timezone(),
            days,
        }
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn labels(&self) -> Vec<String> {
        self.days.iter().map(|day| day.format(DATE_FORMAT).to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Returns the bucket whose day equals `instant`'s date in the window's zone.
    pub fn index_of<Other: TimeZone>(&self, instant: &DateTime<Other>) -> Option<usize> {
        let date = instant.with_timezone(&self.tz).date_naive();
        self.days.binary_search(&date).ok()
    }
}
