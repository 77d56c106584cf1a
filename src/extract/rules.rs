//! Declarative selector cascades.
//!
//! Every field the extractor fills is described by a [`SelectorRule`]: an
//! ordered list of CSS selectors and a validity predicate. One generic
//! routine, [`SelectorRule::first_valid`], walks the list and returns the
//! first value that passes. Priority lives entirely in the order of the
//! tables below.

use super::document::{attr, find_first, text_of};
use crate::dates::is_valid_date;
use crate::utils::char_len;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use std::fmt;

/// Which article attribute a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Headline,
    Author,
    PublishDate,
    Source,
    Summary,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Headline => "headline",
            Field::Author => "author",
            Field::PublishDate => "publish_date",
            Field::Source => "source",
            Field::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// A CSS selector together with the text it was parsed from.
pub struct NamedSelector {
    pub css: &'static str,
    pub selector: Selector,
}

/// Parse a static selector table. The tables are compile-time constants, so a
/// parse failure is a programming error.
pub fn parse_all(sources: &[&'static str]) -> Vec<NamedSelector> {
    sources
        .iter()
        .map(|&css| NamedSelector {
            css,
            selector: Selector::parse(css).expect("static selector table must parse"),
        })
        .collect()
}

/// An ordered selector cascade for one field.
pub struct SelectorRule {
    pub field: Field,
    pub selectors: Vec<NamedSelector>,
    pub validate: fn(&str) -> bool,
}

impl SelectorRule {
    pub fn new(field: Field, sources: &[&'static str], validate: fn(&str) -> bool) -> Self {
        Self {
            field,
            selectors: parse_all(sources),
            validate,
        }
    }

    /// Try each selector in order against the descendants of `scope`.
    ///
    /// For every selector only its first match is considered. `read` turns
    /// that element into candidate values (in preference order); the first
    /// candidate accepted by the rule's validator is returned and no later
    /// selector is consulted.
    pub fn first_valid<'a, F>(&self, scope: ElementRef<'a>, read: F) -> Option<String>
    where
        F: Fn(ElementRef<'a>) -> Vec<String>,
    {
        for named in &self.selectors {
            let Some(element) = find_first(scope, &named.selector) else {
                continue;
            };
            if let Some(value) = read(element).into_iter().find(|v| (self.validate)(v)) {
                tracing::trace!(field = %self.field, selector = named.css, "selector matched");
                return Some(value);
            }
        }
        None
    }

    /// [`first_valid`](Self::first_valid) reading the element's normalized text.
    pub fn first_valid_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.first_valid(scope, |element| vec![text_of(element)])
    }
}

pub fn headline_is_valid(text: &str) -> bool {
    let len = char_len(text);
    len > 10 && len < 300
}

pub fn author_is_valid(text: &str) -> bool {
    (3..100).contains(&char_len(text))
}

pub fn date_is_valid(text: &str) -> bool {
    is_valid_date(text)
}

pub fn source_is_valid(text: &str) -> bool {
    (2..50).contains(&char_len(text))
}

pub fn summary_is_valid(text: &str) -> bool {
    char_len(text) > 50
}

/// Elements likely to wrap a whole article, most specific first. The first
/// tier that yields any article wins.
pub static CONTAINER_TIERS: Lazy<Vec<NamedSelector>> = Lazy::new(|| {
    parse_all(&[
        "article",
        r#"[role="article"]"#,
        ".article",
        ".post",
        ".news-item",
        ".story",
        ".entry",
        r#"[class*="article"]"#,
        r#"[class*="post"]"#,
        r#"[class*="news"]"#,
        r#"[class*="story"]"#,
    ])
});

pub static HEADLINE_RULE: Lazy<SelectorRule> = Lazy::new(|| {
    SelectorRule::new(
        Field::Headline,
        &[
            "h1",
            "h2",
            "h3",
            ".headline",
            ".title",
            ".entry-title",
            ".post-title",
            ".article-title",
            ".story-title",
            r#"[class*="headline"]"#,
            r#"[class*="title"]"#,
            r#"[data-testid*="headline"]"#,
            r#"[data-testid*="title"]"#,
            "header h1",
            "header h2",
            "header h3",
        ],
        headline_is_valid,
    )
});

pub static AUTHOR_RULE: Lazy<SelectorRule> = Lazy::new(|| {
    SelectorRule::new(
        Field::Author,
        &[
            ".author",
            ".byline",
            ".writer",
            ".journalist",
            ".reporter",
            ".post-author",
            ".article-author",
            ".story-author",
            r#"[class*="author"]"#,
            r#"[class*="byline"]"#,
            r#"[class*="writer"]"#,
            r#"[rel="author"]"#,
            r#"[data-testid*="author"]"#,
            r#"[data-testid*="byline"]"#,
            ".author-name",
            ".by-author",
            ".written-by",
        ],
        author_is_valid,
    )
});

pub static DATE_RULE: Lazy<SelectorRule> = Lazy::new(|| {
    SelectorRule::new(
        Field::PublishDate,
        &[
            "time[datetime]",
            ".date",
            ".published",
            ".publish-date",
            ".publication-date",
            ".timestamp",
            ".post-date",
            ".article-date",
            ".story-date",
            r#"[class*="date"]"#,
            r#"[class*="time"]"#,
            r#"[class*="publish"]"#,
            r#"[data-testid*="date"]"#,
            r#"[data-testid*="time"]"#,
            ".meta-date",
            ".entry-date",
        ],
        date_is_valid,
    )
});

pub static SOURCE_RULE: Lazy<SelectorRule> = Lazy::new(|| {
    SelectorRule::new(
        Field::Source,
        &[
            ".source",
            ".publication",
            ".site-name",
            ".brand",
            ".logo",
            r#"[class*="source"]"#,
            r#"[class*="publication"]"#,
            r#"[class*="brand"]"#,
            "header .site-title",
            ".masthead",
            ".header-brand",
        ],
        source_is_valid,
    )
});

/// Plain paragraphs are the last resort.
pub static SUMMARY_RULE: Lazy<SelectorRule> = Lazy::new(|| {
    SelectorRule::new(
        Field::Summary,
        &[
            ".summary",
            ".excerpt",
            ".description",
            ".lead",
            r#"[class*="summary"]"#,
            r#"[class*="excerpt"]"#,
            "p",
        ],
        summary_is_valid,
    )
});

/// Date attributes in preference order, read before falling back to text.
pub fn date_candidates(element: ElementRef<'_>) -> Vec<String> {
    ["datetime", "data-date", "data-time"]
        .iter()
        .filter_map(|name| attr(element, name))
        .map(str::to_string)
        .chain(std::iter::once(text_of(element)))
        .collect()
}
