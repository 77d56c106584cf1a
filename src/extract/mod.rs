//! Heuristic article extraction.
//!
//! Turns an arbitrary news page into at most [`MAX_ARTICLES`] article
//! records without any per-site configuration.
//!
//! # Pipeline
//!
//! 1. **Structural pass** ([`structural`]): find article-like containers and
//!    extract fields inside each
//! 2. **Fallback pass** ([`fallback`]): only when step 1 found nothing, build
//!    articles from `h1`/`h2`/`h3` headings
//! 3. **Deduplication** ([`dedupe`]): drop repeated headlines, keeping the
//!    first occurrence
//! 4. **Cap** to [`MAX_ARTICLES`]
//! 5. **Scoring** ([`score`]): annotate each article with its completeness
//!
//! Extraction never fails: missing fields are empty strings and an
//! unrecognizable page yields an empty list.

pub mod document;
pub mod fallback;
pub mod fields;
pub mod rules;
pub mod score;
pub mod structural;

use crate::models::{Article, ScoredArticle};
use crate::utils::extract_domain;
use document::Page;
use itertools::Itertools;
use tracing::{debug, instrument};
use url::Url;

/// Upper bound on articles returned for one page.
pub const MAX_ARTICLES: usize = 20;

/// Run the structural pass, falling back to the heading scan when it comes
/// back empty, then deduplicate and cap.
#[instrument(level = "debug", skip_all, fields(base = %base_url))]
pub fn extract_articles(page: &Page, base_url: &Url) -> Vec<Article> {
    let default_source = extract_domain(base_url.as_str());

    let mut articles = structural::extract_structured(page, base_url, &default_source);
    if articles.is_empty() {
        debug!("Structural pass empty; scanning headings");
        articles = fallback::scan_headings(page, base_url, &default_source);
    }

    let found = articles.len();
    let mut articles = dedupe(articles);
    articles.truncate(MAX_ARTICLES);
    debug!(found, kept = articles.len(), "Extraction finished");
    articles
}

/// Keep the first article for each case-insensitive headline, preserving
/// order.
pub fn dedupe(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .unique_by(|article| article.headline.to_lowercase())
        .collect()
}

/// Parse `html`, extract, and score.
pub fn extract_from_html(html: &str, base_url: &Url) -> Vec<ScoredArticle> {
    let page = Page::parse(html);
    extract_articles(&page, base_url)
        .into_iter()
        .map(score::score)
        .collect()
}
