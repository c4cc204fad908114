//! Worklog calendar command.
//!
//! Fetches the author's worklogs over a *fetch* window and shows the days of
//! a *display* window as a pivot table. The display window defaults to the
//! fetch window.
//!
//! ```text
//! tracklog show --preset week
//! tracklog show --preset month --show-preset week
//! tracklog show --from 2024-03-01 --to 2024-04-01 --show-from 2024-03-04 --show-to 2024-03-09
//! tracklog show --preset today --author jdoe --json
//! ```

use crate::{
    api::TrackerClient,
    libs::{
        calendar::{self, Preset, TitledSpan, WindowError, DATE_FORMAT},
        config::Config,
        messages::Message,
        pivot::PivotTable,
        service::{Windows, WorklogError, WorklogService},
        view::View,
    },
    msg_debug, msg_info, msg_print, msg_warning,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, TimeZone};
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Fetch window preset (defaults to today)
    #[arg(long, value_enum, conflicts_with_all = ["from", "to"])]
    pub preset: Option<Preset>,

    /// First day of a custom fetch window (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Day after the last day of a custom fetch window (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Display window preset (defaults to the fetch window)
    #[arg(long, value_enum, conflicts_with_all = ["show_from", "show_to"])]
    pub show_preset: Option<Preset>,

    /// First day of a custom display window (YYYY-MM-DD)
    #[arg(long, requires = "show_to")]
    pub show_from: Option<String>,

    /// Day after the last day of a custom display window (YYYY-MM-DD)
    #[arg(long, requires = "show_from")]
    pub show_to: Option<String>,

    /// Worklog author login (defaults to the configured login)
    #[arg(short, long)]
    pub author: Option<String>,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    /// Resolves the fetch and display windows relative to `now`.
    pub fn windows<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<(TitledSpan<Tz>, TitledSpan<Tz>), WindowError> {
        let tz = now.timezone();

        let fetch = match (&self.preset, &self.from, &self.to) {
            (_, Some(from), Some(to)) => calendar::custom(&tz, from, to)?,
            (preset, _, _) => preset.unwrap_or(Preset::Today).resolve(now)?,
        };

        let display = match (&self.show_preset, &self.show_from, &self.show_to) {
            (_, Some(from), Some(to)) => calendar::custom(&tz, from, to)?,
            (Some(preset), _, _) => preset.resolve(now)?,
            _ => fetch.clone(),
        };

        Ok((fetch, display))
    }
}

pub async fn cmd(args: ShowArgs) -> Result<()> {
    let config = Config::load()?;
    let tracker = config.tracker()?;

    let author = args
        .author
        .clone()
        .or_else(|| Some(tracker.login.clone()))
        .filter(|author| !author.trim().is_empty())
        .ok_or_else(|| anyhow!(Message::AuthorMissing))?;

    let (fetch, shown) = args
        .windows(&Local::now())
        .map_err(|e| anyhow!(Message::InvalidWindow(e.to_string())))?;
    msg_debug!(Message::WorklogFetchWindow(
        fetch.span.start.to_rfc3339(),
        fetch.span.end.to_rfc3339()
    ));

    let service = WorklogService::new(TrackerClient::new(tracker)?);
    let windows = Windows {
        fetch: fetch.span,
        display: shown.span.clone(),
    };
    let table = service.table(&author, &windows).await.map_err(|e| match e {
        WorklogError::GatewayFetchFailed(e) => anyhow!(Message::WorklogFetchFailed(e.to_string())),
        WorklogError::Build(e) => anyhow!(Message::WorklogBuildFailed(e.to_string())),
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&View::worklog_json(&table, &tracker.host))?);
        return Ok(());
    }

    msg_print!(header(&table, &shown), true);

    if table.is_empty() {
        msg_info!(Message::WorklogsNotFound);
    } else {
        View::worklogs(&table, &tracker.host);
    }

    for diagnostic in &table.diagnostics {
        msg_warning!(Message::DurationSkipped(
            diagnostic.issue_key.clone(),
            diagnostic.duration.clone(),
            diagnostic.error.to_string()
        ));
    }

    Ok(())
}

/// Table heading: window title and the first and last shown day.
///
/// An empty table falls back to the window's start date.
pub fn header<Tz: TimeZone>(table: &PivotTable, shown: &TitledSpan<Tz>) -> Message {
    let (first, last) = match (table.days.first(), table.days.last()) {
        (Some(first), Some(last)) => (first.format(DATE_FORMAT).to_string(), last.format(DATE_FORMAT).to_string()),
        _ => {
            let start = shown.span.start.date_naive().format(DATE_FORMAT).to_string();
            (start.clone(), start)
        }
    };
    Message::WorklogHeader(shown.title.clone(), first, last)
}
