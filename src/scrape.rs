//! Request orchestration: validate, consult robots.txt, fetch, extract.

use crate::error::ScrapeError;
use crate::extract::extract_from_html;
use crate::fetch::{PageFetcher, RobotsFetcher};
use crate::models::{RobotsCheckResponse, ScrapeResponse};
use crate::policy::cache::{Clock, SystemClock};
use crate::policy::{PolicyGate, robots_url_for};
use crate::utils::{extract_domain, truncate_for_log};
use chrono::{SecondsFormat, Utc};
use tracing::{info, instrument, warn};
use url::Url;

pub struct Scraper<P, R, C = SystemClock> {
    pages: P,
    gate: PolicyGate<R, C>,
    /// Product token matched against robots.txt groups.
    robots_agent: String,
}

impl<P, R, C> Scraper<P, R, C>
where
    P: PageFetcher,
    R: RobotsFetcher,
    C: Clock,
{
    pub fn new(pages: P, gate: PolicyGate<R, C>, robots_agent: impl Into<String>) -> Self {
        Self {
            pages,
            gate,
            robots_agent: robots_agent.into(),
        }
    }

    /// Scrape one page into a scored article list.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape(&self, url: &str) -> Result<ScrapeResponse, ScrapeError> {
        let base = parse_request_url(url)?;

        if !self.gate.is_allowed(url, &self.robots_agent).await {
            warn!("Blocked by robots.txt");
            return Err(ScrapeError::RobotsBlocked);
        }

        let html = self.pages.fetch_page(url).await.map_err(|e| {
            warn!(error = %e, "Page fetch failed");
            ScrapeError::from(e)
        })?;

        let articles = extract_from_html(&html, &base);
        let scraped_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let response = ScrapeResponse::new(articles, extract_domain(url), scraped_at);
        info!(
            total = response.total_found,
            average_completeness = response.statistics.average_completeness,
            first = %response
                .articles
                .first()
                .map(|a| truncate_for_log(&a.article.headline, 60))
                .unwrap_or_default(),
            "Scrape complete"
        );
        Ok(response)
    }

    /// Report whether `url` may be scraped, with a preview of robots.txt.
    /// Failures to read robots.txt yield the fallback response, never an
    /// error.
    #[instrument(level = "info", skip(self))]
    pub async fn robots_check(&self, url: &str) -> Result<RobotsCheckResponse, ScrapeError> {
        if url.trim().is_empty() {
            return Err(ScrapeError::MissingUrl);
        }
        let Some(robots_url) = robots_url_for(url) else {
            return Ok(RobotsCheckResponse::fallback("Could not check robots.txt"));
        };

        let allowed = self.gate.is_allowed(url, &self.robots_agent).await;
        match self.gate.get_robots_content(&robots_url).await {
            Ok(robots_content) => Ok(RobotsCheckResponse::Checked {
                allowed,
                robots_url,
                robots_content,
            }),
            Err(e) => {
                warn!(%robots_url, error = %e, "Robots check failed");
                Ok(RobotsCheckResponse::fallback("Could not check robots.txt"))
            }
        }
    }
}

fn parse_request_url(url: &str) -> Result<Url, ScrapeError> {
    if url.trim().is_empty() {
        return Err(ScrapeError::MissingUrl);
    }
    let parsed = Url::parse(url.trim()).map_err(|_| ScrapeError::InvalidUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ScrapeError::InvalidUrl);
    }
    Ok(parsed)
}
