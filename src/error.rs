//! Errors reported for a scrape request, with their HTTP-style status codes
//! and JSON error bodies.

use crate::fetch::FetchError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("Scraping not allowed by robots.txt")]
    RobotsBlocked,
    #[error("Website not found")]
    NotFound,
    #[error("Connection refused by server")]
    ConnectionRefused,
    #[error("Access forbidden by website")]
    OriginForbidden,
    #[error("Request timed out")]
    Timeout,
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("Failed to scrape website")]
    Other { details: String },
}

/// JSON body sent back for a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots_blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ScrapeError {
    pub fn status_code(&self) -> u16 {
        match self {
            ScrapeError::MissingUrl | ScrapeError::InvalidUrl => 400,
            ScrapeError::RobotsBlocked | ScrapeError::OriginForbidden => 403,
            ScrapeError::NotFound => 404,
            ScrapeError::ConnectionRefused => 503,
            ScrapeError::Timeout => 504,
            ScrapeError::TooManyRedirects => 502,
            ScrapeError::Other { .. } => 500,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ScrapeError::Timeout | ScrapeError::TooManyRedirects)
    }

    /// `details` is only filled for generic failures, and only when
    /// `expose_details` is set.
    pub fn to_body(&self, expose_details: bool) -> ErrorBody {
        let details = match self {
            ScrapeError::Other { details } if expose_details => Some(details.clone()),
            _ => None,
        };
        ErrorBody {
            error: self.to_string(),
            robots_blocked: matches!(self, ScrapeError::RobotsBlocked).then_some(true),
            details,
        }
    }
}

impl From<FetchError> for ScrapeError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::HostNotFound(_) => ScrapeError::NotFound,
            FetchError::ConnectionRefused(_) => ScrapeError::ConnectionRefused,
            FetchError::Status(403) => ScrapeError::OriginForbidden,
            FetchError::Timeout(_) => ScrapeError::Timeout,
            FetchError::TooManyRedirects(_) => ScrapeError::TooManyRedirects,
            FetchError::InvalidRequest(_) => ScrapeError::InvalidUrl,
            other => ScrapeError::Other {
                details: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mapping() {
        let cases = [
            (FetchError::HostNotFound("x".into()), 404),
            (FetchError::ConnectionRefused("x".into()), 503),
            (FetchError::Status(403), 403),
            (FetchError::Timeout("x".into()), 504),
            (FetchError::TooManyRedirects("x".into()), 502),
            (FetchError::Status(500), 500),
            (FetchError::InvalidRequest("x".into()), 400),
            (FetchError::Decode("x".into()), 500),
            (FetchError::Network("reset".into()), 500),
        ];
        for (fetch_error, status) in cases {
            assert_eq!(ScrapeError::from(fetch_error).status_code(), status);
        }
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(ScrapeError::Timeout.is_retryable());
        assert!(ScrapeError::TooManyRedirects.is_retryable());
        assert!(!ScrapeError::NotFound.is_retryable());
        assert!(!ScrapeError::RobotsBlocked.is_retryable());
    }

    #[test]
    fn test_robots_blocked_body() {
        let err = ScrapeError::RobotsBlocked;
        assert_eq!(err.status_code(), 403);
        let json = serde_json::to_value(err.to_body(false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Scraping not allowed by robots.txt",
                "robotsBlocked": true
            })
        );
    }

    #[test]
    fn test_details_only_when_exposed() {
        let err = ScrapeError::from(FetchError::Network("connection reset".into()));
        let hidden = serde_json::to_value(err.to_body(false)).unwrap();
        assert_eq!(hidden, serde_json::json!({ "error": "Failed to scrape website" }));

        let shown = err.to_body(true);
        assert_eq!(shown.details.as_deref(), Some("network error: connection reset"));
        assert_eq!(shown.robots_blocked, None);
    }

    #[test]
    fn test_input_errors() {
        assert_eq!(ScrapeError::MissingUrl.status_code(), 400);
        assert_eq!(ScrapeError::InvalidUrl.to_body(true).error, "Invalid URL format");
    }
}
