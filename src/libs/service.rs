use super::calendar::TimeSpan;
use super::pivot::{PivotBuilder, PivotError, PivotTable};
use crate::api::{GatewayError, WorklogGateway};
use chrono::TimeZone;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WorklogError {
    #[error("failed to fetch worklogs: {0}")]
    GatewayFetchFailed(#[from] GatewayError),

    #[error("failed to build worklog table: {0}")]
    Build(#[from] PivotError),
}

/// The two windows of a table request.
#[derive(Debug, Clone)]
pub struct Windows<Tz: TimeZone> {
    /// Bounds what is requested from the tracker
    pub fetch: TimeSpan<Tz>,
    /// Bounds the calendar days shown in the table
    pub display: TimeSpan<Tz>,
}

impl<Tz: TimeZone> Windows<Tz> {
    /// Uses the same span for fetching and display.
    pub fn single(span: TimeSpan<Tz>) -> Self {
        Self {
            fetch: span.clone(),
            display: span,
        }
    }
}

/// Fetches worklogs through a gateway and pivots them.
pub struct WorklogService<G: WorklogGateway> {
    gateway: G,
}

impl<G: WorklogGateway> WorklogService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn table<Tz: TimeZone>(&self, author: &str, windows: &Windows<Tz>) -> Result<PivotTable, WorklogError> {
        let worklogs = self.gateway.fetch(author, &windows.fetch).await?;
        info!(author, count = worklogs.len(), "fetched worklogs");
        Ok(PivotBuilder::new(&windows.display).build(&worklogs)?)
    }
}
