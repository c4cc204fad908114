use super::formatter::{format_duration, issue_url};
use super::pivot::PivotTable;
use prettytable::{Cell, Row, Table};
use serde_json::{json, Value};

pub struct View {}

impl View {
    /// Lays out a pivot table for the terminal.
    ///
    /// One line per contributing entry: the issue column is filled on the
    /// first line of each issue, the entry's duration sits under its day, and
    /// the issue total is shown on the first line. A final line carries the
    /// per-day sums and the grand total. With a tracker `host`, a LINK column
    /// after ISSUE holds each issue's web link.
    pub fn worklog_table(table: &PivotTable, host: &str) -> Table {
        let mut view = Table::new();
        let linked = !host.is_empty();

        let mut titles = vec![Cell::new("ISSUE")];
        if linked {
            titles.push(Cell::new("LINK"));
        }
        titles.push(Cell::new("COMMENT"));
        titles.extend(table.labels().iter().map(|label| Cell::new(label)));
        titles.push(Cell::new("TOTAL"));
        view.set_titles(Row::new(titles));

        for row in &table.rows {
            for (line, cell) in row.cells.iter().enumerate() {
                let (issue, link, total) = if line == 0 {
                    (
                        format!("{} {}", row.issue.key, row.issue.display),
                        issue_url(host, &row.issue.key),
                        format_duration(&row.sum),
                    )
                } else {
                    (String::new(), String::new(), String::new())
                };

                let mut cells = vec![Cell::new(&issue)];
                if linked {
                    cells.push(Cell::new(&link));
                }
                cells.push(Cell::new(cell.comment.as_deref().unwrap_or("")));
                cells.extend((0..table.days.len()).map(|day| Cell::new(cell.duration_at(day).unwrap_or(""))));
                cells.push(Cell::new(&total));
                view.add_row(Row::new(cells));
            }
        }

        let mut totals = vec![Cell::new("TOTAL"), Cell::new("")];
        if linked {
            totals.push(Cell::new(""));
        }
        totals.extend(table.day_sums.iter().map(|sum| Cell::new(&format_duration(sum))));
        totals.push(Cell::new(&format_duration(&table.sum)));
        view.add_row(Row::new(totals));

        view
    }

    pub fn worklogs(table: &PivotTable, host: &str) {
        Self::worklog_table(table, host).printstd();
    }

    /// Serializes a pivot table; durations appear both in seconds and formatted.
    pub fn worklog_json(table: &PivotTable, host: &str) -> Value {
        let labels = table.labels();
        let rows = table
            .rows
            .iter()
            .map(|row| {
                let cells = row
                    .cells
                    .iter()
                    .map(|cell| {
                        json!({
                            "day": labels.get(cell.day),
                            "comment": cell.comment,
                            "duration": cell.duration,
                            "author": cell.author,
                            "seconds": cell.elapsed.map(|elapsed| elapsed.num_seconds()),
                        })
                    })
                    .collect::<Vec<_>>();

                json!({
                    "key": row.issue.key,
                    "display": row.issue.display,
                    "url": issue_url(host, &row.issue.key),
                    "rowspan": row.rowspan,
                    "seconds": row.sum.num_seconds(),
                    "total": format_duration(&row.sum),
                    "cells": cells,
                })
            })
            .collect::<Vec<_>>();

        let day_sums = table
            .day_sums
            .iter()
            .zip(&labels)
            .map(|(sum, day)| {
                json!({
                    "day": day,
                    "seconds": sum.num_seconds(),
                    "total": format_duration(sum),
                })
            })
            .collect::<Vec<_>>();

        let diagnostics = table
            .diagnostics
            .iter()
            .map(|diagnostic| {
                json!({
                    "key": diagnostic.issue_key,
                    "start": diagnostic.start,
                    "duration": diagnostic.duration,
                    "error": diagnostic.error.to_string(),
                })
            })
            .collect::<Vec<_>>();

        json!({
            "days": labels,
            "rows": rows,
            "day_sums": day_sums,
            "seconds": table.sum.num_seconds(),
            "total": format_duration(&table.sum),
            "diagnostics": diagnostics,
        })
    }
}
