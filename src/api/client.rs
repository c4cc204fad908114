//! HTTP client with an interceptor chain.
//!
//! Every request sent through [`HttpClient`] passes through the registered
//! interceptors before it reaches the transport. Interceptors run in
//! registration order on the way out, so the last registered one sits closest
//! to the transport and the first registered one sees the final response last.
//!
//! ```text
//! request ──▶ [0] ──▶ [1] ──▶ … ──▶ [n-1] ──▶ reqwest transport
//! response ◀── [0] ◀── [1] ◀── … ◀── [n-1] ◀──┘
//! ```

use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    Client, Request, RequestBuilder, Response,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default request timeout applied when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A request/response hook.
///
/// Implementations either return `next.run(request)` (possibly after
/// modifying the request) or wrap it in an async block to observe the
/// response.
pub trait Interceptor: Send + Sync {
    fn intercept<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, reqwest::Result<Response>>;
}

/// The remainder of the chain after the current interceptor.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    client: &'a Client,
    chain: &'a [Arc<dyn Interceptor>],
}

impl<'a> Next<'a> {
    pub fn run(self, request: Request) -> BoxFuture<'a, reqwest::Result<Response>> {
        match self.chain.split_first() {
            Some((head, rest)) => head.intercept(
                request,
                Next {
                    client: self.client,
                    chain: rest,
                },
            ),
            None => Box::pin(self.client.execute(request)),
        }
    }
}

pub struct HttpClient {
    client: Client,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl HttpClient {
    pub fn new(timeout: Duration, interceptors: Vec<Arc<dyn Interceptor>>) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, interceptors))
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn with_client(client: Client, interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self { client, interceptors }
    }

    /// Starts a GET request with a JSON content type.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    pub async fn execute(&self, request: Request) -> reqwest::Result<Response> {
        Next {
            client: &self.client,
            chain: &self.interceptors,
        }
        .run(request)
        .await
    }
}

/// Logs method, URL, status and latency of every request.
///
/// Headers and bodies are never logged, so credentials added by interceptors
/// registered after this one stay out of the logs.
#[derive(Debug, Default)]
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn intercept<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, reqwest::Result<Response>> {
        Box::pin(async move {
            let method = request.method().clone();
            let url = request.url().clone();
            let started = Instant::now();

            let result = next.run(request).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(response) => debug!(%method, %url, status = response.status().as_u16(), elapsed_ms, "http request"),
                Err(e) => warn!(%method, %url, elapsed_ms, error = %e, "http request failed"),
            }
            result
        })
    }
}
