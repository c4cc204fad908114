//! Remote issue-tracker integration.
//!
//! The rest of the crate only sees the [`WorklogGateway`] trait: given an
//! author and a fetch window, return the raw worklog entries. The HTTP
//! implementation lives in [`tracker`] and is built on the interceptor-based
//! client in [`client`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tracklog::api::{TrackerClient, TrackerConfig, WorklogGateway};
//! use tracklog::libs::calendar::Preset;
//!
//! # async fn run(config: TrackerConfig) -> anyhow::Result<()> {
//! let client = TrackerClient::new(&config)?;
//! let window = Preset::Week.resolve(&chrono::Local::now())?;
//! let worklogs = client.fetch(&config.login, &window.span).await?;
//! # Ok(())
//! # }
//! ```

use crate::libs::calendar::TimeSpan;
use chrono::TimeZone;
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

pub mod client;
pub mod tracker;

pub use tracker::{Issue, TrackerClient, TrackerConfig, User, Worklog};

/// Failures of a worklog fetch. All of them abort the table build.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid credential header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("tracker responded with status {0}")]
    Status(u16),

    #[error("failed to decode worklog response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Source of raw worklog entries.
#[allow(async_fn_in_trait)]
pub trait WorklogGateway {
    /// Returns the entries of `author` inside `span`.
    ///
    /// The remote filter is not trusted for display purposes; callers
    /// re-derive inclusion from each entry's start timestamp.
    async fn fetch<Tz: TimeZone>(&self, author: &str, span: &TimeSpan<Tz>) -> Result<Vec<Worklog>, GatewayError>;
}
