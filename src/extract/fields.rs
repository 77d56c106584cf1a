//! Per-field extractors.
//!
//! Each function derives one [`Article`](crate::models::Article) attribute
//! from an article-candidate subtree. All of them are infallible: a field
//! that cannot be found comes back empty, except the headline which is
//! `None` so the caller can drop the candidate.

use super::document::{Page, attr, closest_link, find_first, is_link, text_of};
use super::rules::{
    AUTHOR_RULE, DATE_RULE, HEADLINE_RULE, SOURCE_RULE, SUMMARY_RULE, date_candidates,
    source_is_valid,
};
use crate::utils::{char_len, make_absolute_url, truncate_chars};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

/// Headlines derived from a container's whole text are cut to this length.
pub const DERIVED_HEADLINE_CHARS: usize = 150;
pub const SUMMARY_MAX_CHARS: usize = 300;

static AUTHOR_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:written\s+by|by|author|reporter)\b\s*:?\s*").expect("valid regex")
});

// A hyphen with whitespace on its left and whitespace or the end on its right.
static AUTHOR_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-(?:\s.*)?$").expect("valid regex"));

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));

static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid image selector"));

const IMAGE_ATTRIBUTES: &[&str] = &["src", "data-src", "data-lazy-src"];

/// Best headline inside `scope`.
///
/// Falls back to the first 150 characters of the subtree's text when no
/// headline selector yields a valid value, and to `None` when even that is
/// ten characters or shorter.
pub fn extract_headline(scope: ElementRef<'_>) -> Option<String> {
    if let Some(headline) = HEADLINE_RULE.first_valid_text(scope) {
        return Some(headline);
    }
    let text = text_of(scope);
    (char_len(&text) > 10).then(|| truncate_chars(&text, DERIVED_HEADLINE_CHARS))
}

/// Strip role prefixes ("By", "Author:", "Written by", "Reporter:") and
/// anything after a standalone hyphen.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_author("By Jane Doe - Staff Writer"), "Jane Doe");
/// assert_eq!(clean_author("Mary-Jane Watson"), "Mary-Jane Watson");
/// ```
pub fn clean_author(raw: &str) -> String {
    let without_prefix = AUTHOR_PREFIX_RE.replace(raw.trim(), "");
    AUTHOR_SUFFIX_RE
        .replace(&without_prefix, "")
        .trim()
        .to_string()
}

pub fn extract_author(scope: ElementRef<'_>) -> String {
    AUTHOR_RULE
        .first_valid(scope, |element| vec![clean_author(&text_of(element))])
        .unwrap_or_default()
}

/// Raw publish date. `datetime`, `data-date`, and `data-time` attributes are
/// preferred over text; only values that parse as a date are accepted.
pub fn extract_date(scope: ElementRef<'_>) -> String {
    DATE_RULE
        .first_valid(scope, date_candidates)
        .unwrap_or_default()
}

/// Publication name: an in-page source marker, then the page title's last
/// " - " segment, then `fallback`.
pub fn extract_source(page: &Page, scope: ElementRef<'_>, fallback: &str) -> String {
    SOURCE_RULE
        .first_valid_text(scope)
        .or_else(|| page.title().and_then(|title| source_from_title(&title)))
        .unwrap_or_else(|| fallback.to_string())
}

/// Site name from a `"Headline - Site"` style page title.
pub fn source_from_title(title: &str) -> Option<String> {
    let parts: Vec<&str> = title.split(" - ").collect();
    if parts.len() < 2 {
        return None;
    }
    parts
        .last()
        .map(|last| last.trim())
        .filter(|last| !last.is_empty() && source_is_valid(last))
        .map(str::to_string)
}

/// Absolute article URL: the element's own href, its first descendant link,
/// its nearest ancestor link, or the page's base URL.
pub fn extract_url(scope: ElementRef<'_>, base: &Url) -> String {
    let link = if is_link(scope) {
        Some(scope)
    } else {
        find_first(scope, &LINK_SELECTOR).or_else(|| closest_link(scope))
    };
    link_href(link, base)
}

/// Absolute href of `link`, or `base` when there is no link.
pub fn link_href(link: Option<ElementRef<'_>>, base: &Url) -> String {
    link.and_then(|a| a.value().attr("href"))
        .map(|href| make_absolute_url(href, base))
        .unwrap_or_else(|| base.to_string())
}

/// First summary-like text over 50 characters, cut to 300.
pub fn extract_summary(scope: ElementRef<'_>) -> String {
    SUMMARY_RULE
        .first_valid_text(scope)
        .map(|text| truncate_chars(&text, SUMMARY_MAX_CHARS))
        .unwrap_or_default()
}

/// Absolute URL of the first descendant image, or empty.
pub fn extract_image(scope: ElementRef<'_>, base: &Url) -> String {
    find_first(scope, &IMAGE_SELECTOR)
        .and_then(|img| image_src(img, base))
        .unwrap_or_default()
}

/// Resolved source of an `<img>`, trying `src` then the lazy-load attributes
/// and skipping inline `data:` URIs.
pub fn image_src(img: ElementRef<'_>, base: &Url) -> Option<String> {
    IMAGE_ATTRIBUTES
        .iter()
        .filter_map(|name| attr(img, name))
        .find(|src| !src.to_ascii_lowercase().starts_with("data:"))
        .map(|src| make_absolute_url(src, base))
}
