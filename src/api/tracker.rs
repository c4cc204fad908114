use super::client::{BoxFuture, HttpClient, Interceptor, LoggingInterceptor, Next, DEFAULT_TIMEOUT};
use super::{GatewayError, WorklogGateway};
use crate::libs::calendar::TimeSpan;
use crate::libs::messages::macros::is_debug_mode;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use chrono::TimeZone;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION},
    Request, Response, StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.tracker.yandex.net/v3/";
const WORKLOG_PATH: &str = "worklog/";
const ORG_ID_HEADER: &str = "x-cloud-org-id";

/// A single time-log record as returned by the tracker.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(rename = "self", default)]
    pub url: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub issue: Issue,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_by: User,
    #[serde(default)]
    pub created_at: String,
    pub start: String,
    pub duration: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Issue {
    #[serde(rename = "self", default)]
    pub url: String,
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub display: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    #[serde(rename = "self", default)]
    pub url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display: String,
}

/// Adds the bearer token and organization headers to every request.
#[derive(Debug)]
pub struct AuthInterceptor {
    headers: HeaderMap,
}

impl AuthInterceptor {
    pub fn new(token: &str, org_id: &str) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(HeaderName::from_static(ORG_ID_HEADER), HeaderValue::from_str(org_id)?);
        Ok(Self { headers })
    }
}

impl Interceptor for AuthInterceptor {
    fn intercept<'a>(&'a self, mut request: Request, next: Next<'a>) -> BoxFuture<'a, reqwest::Result<Response>> {
        for (name, value) in &self.headers {
            request.headers_mut().insert(name.clone(), value.clone());
        }
        next.run(request)
    }
}

/// Tracker API client implementing [`WorklogGateway`].
pub struct TrackerClient {
    http: HttpClient,
    api_url: String,
}

impl TrackerClient {
    /// Builds a client with authentication and, in debug mode, request logging.
    pub fn new(config: &TrackerConfig) -> Result<Self, GatewayError> {
        let mut interceptors: Vec<Arc<dyn Interceptor>> = vec![Arc::new(AuthInterceptor::new(&config.token, &config.org_id)?)];
        if is_debug_mode() {
            interceptors.push(Arc::new(LoggingInterceptor));
        }

        let timeout = config.timeout.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT);
        let http = HttpClient::new(timeout, interceptors).map_err(|source| GatewayError::Transport {
            url: config.api_url().to_string(),
            source,
        })?;
        Ok(Self::with_http(http, config.api_url()))
    }

    pub fn with_http(http: HttpClient, api_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.to_string(),
        }
    }

    fn worklog_url(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), WORKLOG_PATH)
    }
}

impl WorklogGateway for TrackerClient {
    async fn fetch<Tz: TimeZone>(&self, author: &str, span: &TimeSpan<Tz>) -> Result<Vec<Worklog>, GatewayError> {
        let url = self.worklog_url();
        let query = [
            ("createdBy", author.to_string()),
            ("createdAt", format!("from:{}", span.start.fixed_offset().to_rfc3339())),
            ("createdAt", format!("to:{}", span.end.fixed_offset().to_rfc3339())),
        ];

        let transport = |source: reqwest::Error| GatewayError::Transport { url: url.clone(), source };
        let request = self
            .http
            .get(&url)
            .query(&query)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build()
            .map_err(transport)?;

        let response = self.http.execute(request).await.map_err(transport)?;
        if response.status() != StatusCode::OK {
            return Err(GatewayError::Status(response.status().as_u16()));
        }

        response.json::<Vec<Worklog>>().await.map_err(GatewayError::Decode)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TrackerConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub org_id: String,
    /// Web UI host used to build issue links
    #[serde(default)]
    pub host: String,
    /// Default worklog author
    #[serde(default)]
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl TrackerConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().filter(|url| !url.is_empty()).unwrap_or(DEFAULT_API_URL)
    }

    pub fn init(config: &Option<Self>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleTracker);
        Ok(Self {
            token: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTrackerToken.to_string())
                .default(config.token)
                .interact_text()?,
            org_id: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTrackerOrgId.to_string())
                .default(config.org_id)
                .interact_text()?,
            host: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTrackerHost.to_string())
                .default(config.host)
                .interact_text()?,
            login: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTrackerLogin.to_string())
                .default(config.login)
                .allow_empty(true)
                .interact_text()?,
            api_url: config.api_url,
            timeout: config.timeout,
        })
    }
}
