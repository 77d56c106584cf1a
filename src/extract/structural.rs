//! Container-driven extraction.
//!
//! Walks [`CONTAINER_TIERS`] in order. The first tier that produces at least
//! one accepted article wins and no further tiers are tried.

use super::MAX_ARTICLES;
use super::document::Page;
use super::fields;
use super::rules::CONTAINER_TIERS;
use crate::models::Article;
use crate::utils::char_len;
use scraper::ElementRef;
use tracing::debug;
use url::Url;

/// Headlines must be longer than this (in characters) to be kept.
pub const MIN_HEADLINE_CHARS: usize = 10;

/// Extract up to [`MAX_ARTICLES`] articles from the first productive
/// container tier. Returns an empty vector when no tier produces anything.
pub fn extract_structured(page: &Page, base: &Url, default_source: &str) -> Vec<Article> {
    for tier in CONTAINER_TIERS.iter() {
        let mut articles = Vec::new();
        for container in page.select(&tier.selector) {
            if articles.len() >= MAX_ARTICLES {
                break;
            }
            if let Some(article) = extract_article(page, container, base, default_source) {
                articles.push(article);
            }
        }
        if !articles.is_empty() {
            debug!(tier = tier.css, count = articles.len(), "Container tier matched");
            return articles;
        }
    }
    debug!("No container tier produced articles");
    Vec::new()
}

/// Build an article from one container, or `None` when it has no usable
/// headline.
pub fn extract_article(
    page: &Page,
    container: ElementRef<'_>,
    base: &Url,
    default_source: &str,
) -> Option<Article> {
    let headline = fields::extract_headline(container)
        .filter(|headline| char_len(headline) > MIN_HEADLINE_CHARS)?;

    Some(Article {
        headline,
        author: fields::extract_author(container),
        publish_date: fields::extract_date(container),
        source: fields::extract_source(page, container, default_source),
        url: fields::extract_url(container, base),
        summary: fields::extract_summary(container),
        image: fields::extract_image(container, base),
    })
}
