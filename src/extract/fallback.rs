//! Heading scan used when no article containers were found.
//!
//! Headings are taken level by level (`h1`, then `h2`, then `h3`), each level
//! in document order. Metadata comes only from the heading's immediate
//! surroundings, so these articles are usually less complete than the ones
//! the container pass produces.

use super::MAX_ARTICLES;
use super::document::{
    Page, closest_link, find_first, next_element_sibling, parent_element, text_of,
};
use super::fields::{clean_author, image_src, link_href};
use super::rules::{
    NamedSelector, author_is_valid, date_candidates, date_is_valid, headline_is_valid, parse_all,
    summary_is_valid,
};
use crate::models::Article;
use crate::utils::{char_len, truncate_chars};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::debug;
use url::Url;

/// Headings must be longer than this (in characters) to count as headlines.
pub const MIN_FALLBACK_HEADLINE_CHARS: usize = 15;
pub const FALLBACK_SUMMARY_MAX_CHARS: usize = 200;

static HEADING_LEVELS: Lazy<Vec<NamedSelector>> =
    Lazy::new(|| parse_all(&["h1", "h2", "h3"]));

static NEARBY_AUTHOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#".author, .byline, [class*="author"]"#).expect("valid author selector")
});

static NEARBY_DATE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"time, .date, [class*="date"]"#).expect("valid date selector")
});

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));

static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid image selector"));

/// Build articles straight from headings, up to [`MAX_ARTICLES`].
pub fn scan_headings(page: &Page, base: &Url, default_source: &str) -> Vec<Article> {
    let mut articles = Vec::new();
    'levels: for level in HEADING_LEVELS.iter() {
        for heading in page.select(&level.selector) {
            if articles.len() >= MAX_ARTICLES {
                break 'levels;
            }
            let headline = text_of(heading);
            if char_len(&headline) <= MIN_FALLBACK_HEADLINE_CHARS || !headline_is_valid(&headline) {
                continue;
            }
            articles.push(Article {
                headline,
                author: nearby_author(heading),
                publish_date: nearby_date(heading),
                source: default_source.to_string(),
                url: nearby_link(heading, base),
                summary: nearby_summary(heading),
                image: nearby_image(heading, base),
            });
        }
    }
    debug!(count = articles.len(), "Fallback heading scan finished");
    articles
}

fn nearby_author(heading: ElementRef<'_>) -> String {
    parent_element(heading)
        .and_then(|parent| find_first(parent, &NEARBY_AUTHOR))
        .map(|element| clean_author(&text_of(element)))
        .filter(|author| author_is_valid(author))
        .unwrap_or_default()
}

fn nearby_date(heading: ElementRef<'_>) -> String {
    parent_element(heading)
        .and_then(|parent| find_first(parent, &NEARBY_DATE))
        .and_then(|element| date_candidates(element).into_iter().find(|d| date_is_valid(d)))
        .unwrap_or_default()
}

fn nearby_link(heading: ElementRef<'_>, base: &Url) -> String {
    let link = find_first(heading, &LINK_SELECTOR).or_else(|| closest_link(heading));
    link_href(link, base)
}

/// Text of the paragraph directly after the heading, when it is long enough.
fn nearby_summary(heading: ElementRef<'_>) -> String {
    next_element_sibling(heading)
        .filter(|sibling| sibling.value().name() == "p")
        .map(text_of)
        .filter(|text| summary_is_valid(text))
        .map(|text| truncate_chars(&text, FALLBACK_SUMMARY_MAX_CHARS))
        .unwrap_or_default()
}

fn nearby_image(heading: ElementRef<'_>, base: &Url) -> String {
    parent_element(heading)
        .and_then(|parent| find_first(parent, &IMAGE_SELECTOR))
        .and_then(|img| image_src(img, base))
        .unwrap_or_default()
}
