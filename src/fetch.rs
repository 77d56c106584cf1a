//! HTTP access to news pages and robots.txt files, with retry logic.
//!
//! This module is the only place that talks to the network. It includes
//! classified errors so the caller can tell a missing host from a refused
//! connection or a slow origin, and a retry decorator with exponential
//! backoff and jitter for the failures worth retrying.
//!
//! # Architecture
//!
//! - [`PageFetcher`] / [`RobotsFetcher`]: traits for the two kinds of fetch
//! - [`HttpFetcher`]: `reqwest` implementation of both, with separate
//!   timeouts for pages (10s) and robots.txt (5s) and a redirect cap of 5
//! - [`RetryFetch`]: decorator that adds retry logic to any [`PageFetcher`]
//!
//! # Retry Strategy
//!
//! - Only retryable errors are retried (timeouts, refused or dropped
//!   connections, 429 and 5xx responses)
//! - Exponential backoff from a configurable base delay, capped at 10 seconds
//! - Random jitter (0-250ms) added to each delay

use crate::config::AppConfig;
use rand::{Rng, rng};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::error::Error as StdError;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// A classified network failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("host not found: {0}")]
    HostNotFound(String),
    #[error("connection refused: {0}")]
    ConnectionRefused(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("redirect limit exceeded: {0}")]
    TooManyRedirects(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("failed to read response body: {0}")]
    Decode(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Classify a `reqwest` error by walking its source chain.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            return FetchError::Timeout(message);
        }
        if err.is_redirect() {
            return FetchError::TooManyRedirects(message);
        }
        if err.is_builder() {
            return FetchError::InvalidRequest(message);
        }
        if err.is_decode() {
            return FetchError::Decode(message);
        }

        let root: &(dyn StdError + 'static) = &err;
        for cause in std::iter::successors(Some(root), |e| (*e).source()) {
            if let Some(io) = cause.downcast_ref::<std::io::Error>() {
                match io.kind() {
                    std::io::ErrorKind::ConnectionRefused => {
                        return FetchError::ConnectionRefused(message);
                    }
                    std::io::ErrorKind::TimedOut => return FetchError::Timeout(message),
                    _ => {}
                }
            }
            let text = cause.to_string().to_lowercase();
            if text.contains("dns error")
                || text.contains("failed to lookup address")
                || text.contains("no such host")
                || text.contains("name or service not known")
            {
                return FetchError::HostNotFound(message);
            }
        }
        FetchError::Network(message)
    }

    /// `true` for failures that may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout(_)
            | FetchError::ConnectionRefused(_)
            | FetchError::TooManyRedirects(_)
            | FetchError::Network(_) => true,
            FetchError::Status(code) => *code == 429 || *code >= 500,
            FetchError::HostNotFound(_)
            | FetchError::InvalidRequest(_)
            | FetchError::Decode(_)
            | FetchError::Client(_) => false,
        }
    }
}

/// Fetches the HTML of a page.
pub trait PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches a robots.txt body. `Ok(None)` means the origin has no robots.txt
/// (the server answered 404).
pub trait RobotsFetcher {
    async fn fetch_robots(&self, robots_url: &str) -> Result<Option<String>, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_page(url).await
    }
}

impl<T: RobotsFetcher + ?Sized> RobotsFetcher for &T {
    async fn fetch_robots(&self, robots_url: &str) -> Result<Option<String>, FetchError> {
        (**self).fetch_robots(robots_url).await
    }
}

/// `reqwest`-backed fetcher for pages and robots.txt.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    page_client: reqwest::Client,
    robots_client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let page_client = reqwest::Client::builder()
            .user_agent(config.page_user_agent())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.page_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let robots_client = reqwest::Client::builder()
            .user_agent(config.robots_user_agent())
            .timeout(Duration::from_secs(config.robots_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            page_client,
            robots_client,
        })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .page_client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Origin returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(FetchError::from_reqwest)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

impl RobotsFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%robots_url))]
    async fn fetch_robots(&self, robots_url: &str) -> Result<Option<String>, FetchError> {
        let response = self
            .robots_client
            .get(robots_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await.map_err(FetchError::from_reqwest)?;
                Ok(Some(body))
            }
            status => Err(FetchError::Status(status.as_u16())),
        }
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`PageFetcher`].
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
/// Non-retryable errors are returned immediately.
pub struct RetryFetch<T> {
    /// The underlying fetcher to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: Duration,
    /// Maximum delay cap.
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: PageFetcher,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(16);
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> PageFetcher for RetryFetch<T>
where
    T: PageFetcher,
{
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch_page(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let elapsed_ms_total = total_t0.elapsed().as_millis() as u64;

                    if !e.is_retryable() || attempt > self.max_retries {
                        error!(
                            %url,
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total,
                            error = %e,
                            "fetch_page() giving up"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        %url,
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total,
                        ?delay,
                        error = %e,
                        "fetch_page() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
