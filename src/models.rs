//! Data models for extracted articles and the responses built around them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: A single record pulled out of a page by the extractor
//! - [`ScoredArticle`]: An article plus its presence flags and completeness score
//! - [`ScrapeResponse`]: The envelope returned for one scraped page
//! - [`RobotsCheckResponse`]: The result of a robots.txt policy check
//!
//! Field names serialize in camelCase to match the JSON shape consumed by
//! the front end.

use serde::{Deserialize, Serialize};

/// A news article as extracted from a page.
///
/// Missing fields are empty strings, never absent. `headline` is always
/// non-empty for articles that leave the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The article headline, whitespace-normalized.
    pub headline: String,
    /// Author name with any "By"/"Author:" prefix removed.
    pub author: String,
    /// The raw date value found on the page (attribute or text).
    pub publish_date: String,
    /// Publication name, or the page's domain when none was found.
    pub source: String,
    /// Absolute link to the article.
    pub url: String,
    /// Teaser text, at most 300 characters.
    pub summary: String,
    /// Absolute image URL, or empty.
    pub image: String,
}

/// An [`Article`] annotated with which optional fields it carries.
///
/// Serializes flat: the article's own fields followed by `hasAuthor`,
/// `hasDate`, `hasSummary`, and `completeness`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    pub has_author: bool,
    pub has_date: bool,
    pub has_summary: bool,
    /// Count of non-empty fields among headline, author, publish date, and source.
    pub completeness: u8,
}

/// Aggregate counts over the articles of one scrape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub with_author: usize,
    pub with_date: usize,
    pub with_summary: usize,
    /// Mean completeness; `0.0` when there are no articles.
    pub average_completeness: f64,
}

impl Statistics {
    pub fn from_articles(articles: &[ScoredArticle]) -> Self {
        let total: u32 = articles.iter().map(|a| u32::from(a.completeness)).sum();
        let average_completeness = if articles.is_empty() {
            0.0
        } else {
            f64::from(total) / articles.len() as f64
        };
        Self {
            with_author: articles.iter().filter(|a| a.has_author).count(),
            with_date: articles.iter().filter(|a| a.has_date).count(),
            with_summary: articles.iter().filter(|a| a.has_summary).count(),
            average_completeness,
        }
    }
}

/// The successful result of scraping one page.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    pub articles: Vec<ScoredArticle>,
    pub total_found: usize,
    /// Domain of the scraped page.
    pub source: String,
    /// ISO-8601 UTC timestamp of the scrape.
    pub scraped_at: String,
    pub statistics: Statistics,
}

impl ScrapeResponse {
    pub fn new(articles: Vec<ScoredArticle>, source: String, scraped_at: String) -> Self {
        let statistics = Statistics::from_articles(&articles);
        Self {
            success: true,
            total_found: articles.len(),
            articles,
            source,
            scraped_at,
            statistics,
        }
    }
}

/// Outcome of a robots.txt check for a URL.
///
/// The check never reports a failure as "disallowed": when robots.txt could
/// not be examined the [`RobotsCheckResponse::Fallback`] variant is returned
/// with `allowed: true`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RobotsCheckResponse {
    #[serde(rename_all = "camelCase")]
    Checked {
        allowed: bool,
        robots_url: String,
        /// First 500 characters of robots.txt, or `null` when there is none.
        robots_content: Option<String>,
    },
    Fallback {
        allowed: bool,
        error: String,
        fallback: bool,
    },
}

impl RobotsCheckResponse {
    pub fn fallback(error: impl Into<String>) -> Self {
        Self::Fallback {
            allowed: true,
            error: error.into(),
            fallback: true,
        }
    }

    pub fn allowed(&self) -> bool {
        match self {
            Self::Checked { allowed, .. } | Self::Fallback { allowed, .. } => *allowed,
        }
    }
}
