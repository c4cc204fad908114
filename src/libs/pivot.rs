//! Worklog pivot table: issues × calendar days.
//!
//! [`PivotBuilder`] turns a flat, unordered list of worklog entries into a
//! table whose columns are the calendar days of a display window and whose
//! rows are the issues that received time on those days.
//!
//! ## Rules
//!
//! - Entries whose start date is not one of the display days are skipped.
//!   This lets callers fetch a wide window and show a narrower one.
//! - Every placed entry adds exactly one [`PivotCell`] to exactly one row and
//!   one day; cells are appended, never merged.
//! - A malformed duration, or one that would overflow a sum, keeps its cell
//!   (raw text and comment) but adds zero to every sum. The failure is logged and returned as a [`Diagnostic`].
//! - An unparsable start timestamp aborts the whole build: the entry cannot
//!   be placed, and silently dropping it would corrupt the sums.
//! - Rows are ordered by the day of their first entry, then by issue key.
//!
//! ## Invariant
//!
//! `sum == Σ day_sums == Σ row.sum` for every built table.

use super::calendar::{parse_instant, CalendarBuckets, TimeSpan, DATE_FORMAT};
use super::duration::{self, DurationError};
use crate::api::{Issue, Worklog};
use chrono::{Duration, NaiveDate, TimeZone};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PivotError {
    #[error("invalid start timestamp '{start}' for issue {issue_key}: {source}")]
    InvalidEntryTimestamp {
        issue_key: String,
        start: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One worklog entry placed in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotCell {
    /// Bucket index the entry landed in
    pub day: usize,
    pub comment: Option<String>,
    /// Raw duration text, kept even when it failed to parse
    pub duration: Option<String>,
    pub author: String,
    /// Parsed duration; `None` when the text was malformed
    pub elapsed: Option<Duration>,
}

impl PivotCell {
    /// Duration text at `day`, or `None` for every other column.
    pub fn duration_at(&self, day: usize) -> Option<&str> {
        if day == self.day {
            self.duration.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct PivotRow {
    pub issue: Issue,
    pub cells: Vec<PivotCell>,
    /// Number of contributing entries
    pub rowspan: usize,
    pub sum: Duration,
    first_day: usize,
}

impl PivotRow {
    fn new(issue: Issue, first_day: usize) -> Self {
        Self {
            issue,
            cells: Vec::new(),
            rowspan: 0,
            sum: Duration::zero(),
            first_day,
        }
    }
}

/// A duration that could not be parsed. The entry is still in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub issue_key: String,
    pub start: String,
    pub duration: String,
    pub error: DurationError,
}

#[derive(Debug, Clone, Default)]
pub struct PivotTable {
    pub days: Vec<NaiveDate>,
    pub rows: Vec<PivotRow>,
    pub day_sums: Vec<Duration>,
    pub sum: Duration,
    pub diagnostics: Vec<Diagnostic>,
}

impl PivotTable {
    pub fn labels(&self) -> Vec<String> {
        self.days.iter().map(|day| day.format(DATE_FORMAT).to_string()).collect()
    }

    pub fn row(&self, issue_key: &str) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.issue.key == issue_key)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds pivot tables over one display window.
pub struct PivotBuilder<Tz: TimeZone> {
    buckets: CalendarBuckets<Tz>,
}

impl<Tz: TimeZone> PivotBuilder<Tz> {
    pub fn new(display: &TimeSpan<Tz>) -> Self {
        Self {
            buckets: CalendarBuckets::new(display),
        }
    }

    pub fn build(&self, entries: &[Worklog]) -> Result<PivotTable, PivotError> {
        if self.buckets.is_empty() {
            return Ok(PivotTable::default());
        }

        let days = self.buckets.days().to_vec();
        let mut day_sums = vec![Duration::zero(); days.len()];
        let mut sum = Duration::zero();
        let mut rows: Vec<PivotRow> = Vec::new();
        let mut row_index: HashMap<String, usize> = HashMap::new();
        let mut diagnostics = Vec::new();
        let mut skipped = 0usize;

        for entry in entries {
            let instant = parse_instant(&entry.start).map_err(|source| PivotError::InvalidEntryTimestamp {
                issue_key: entry.issue.key.clone(),
                start: entry.start.clone(),
                source,
            })?;

            let Some(day) = self.buckets.index_of(&instant) else {
                skipped += 1;
                continue;
            };

            let index = *row_index.entry(entry.issue.key.clone()).or_insert_with(|| {
                rows.push(PivotRow::new(entry.issue.clone(), day));
                rows.len() - 1
            });

            // Calendar units resolve against the entry start in the display zone.
            let anchor = instant.with_timezone(self.buckets.timezone());
            let totals = duration::parse(&anchor, &entry.duration).and_then(|elapsed| {
                let out_of_range = || DurationError::DurationOutOfRange(entry.duration.clone());
                let row_sum = rows[index].sum.checked_add(&elapsed).ok_or_else(out_of_range)?;
                let day_sum = day_sums[day].checked_add(&elapsed).ok_or_else(out_of_range)?;
                let total = sum.checked_add(&elapsed).ok_or_else(out_of_range)?;
                Ok((elapsed, row_sum, day_sum, total))
            });

            let elapsed = match totals {
                Ok((elapsed, row_sum, day_sum, total)) => {
                    rows[index].sum = row_sum;
                    day_sums[day] = day_sum;
                    sum = total;
                    Some(elapsed)
                }
                Err(error) => {
                    warn!(issue = %entry.issue.key, start = %entry.start, duration = %entry.duration, %error, "skipping duration");
                    diagnostics.push(Diagnostic {
                        issue_key: entry.issue.key.clone(),
                        start: entry.start.clone(),
                        duration: entry.duration.clone(),
                        error,
                    });
                    None
                }
            };

            let row = &mut rows[index];
            row.cells.push(PivotCell {
                day,
                comment: non_empty(&entry.comment),
                duration: non_empty(&entry.duration),
                author: entry.created_by.display.clone(),
                elapsed,
            });
            row.rowspan += 1;
        }

        if skipped > 0 {
            debug!(skipped, "entries outside the display window");
        }

        rows.sort_by(|a, b| a.first_day.cmp(&b.first_day).then_with(|| a.issue.key.cmp(&b.issue.key)));

        Ok(PivotTable {
            days,
            rows,
            day_sums,
            sum,
            diagnostics,
        })
    }
}

/// Builds a pivot table of `entries` over the days of `display`.
pub fn build<Tz: TimeZone>(entries: &[Worklog], display: &TimeSpan<Tz>) -> Result<PivotTable, PivotError> {
    PivotBuilder::new(display).build(entries)
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
