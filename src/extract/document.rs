//! Thin adapter over a parsed `scraper` document.
//!
//! Everything the extractor needs from the tree goes through here:
//! whole-document queries, subtree queries that skip the scope element
//! itself, and the few structural walks (parent, ancestor link, next
//! sibling) used for context lookups.

use crate::utils::clean_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));

/// A parsed HTML page.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements in the document matching `selector`, in document order.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }

    /// Normalized text of the first `<title>` element, if any.
    pub fn title(&self) -> Option<String> {
        self.html
            .select(&TITLE_SELECTOR)
            .next()
            .map(text_of)
            .filter(|text| !text.is_empty())
    }
}

/// First descendant of `scope` matching `selector`. The scope element itself
/// is never returned.
pub fn find_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope
        .select(selector)
        .find(|element| element.id() != scope.id())
}

/// Whitespace-normalized text content of an element and its descendants.
pub fn text_of(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Value of `name` on `element`, trimmed; `None` when absent or blank.
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// `true` for `<a>` elements carrying an `href`.
pub fn is_link(element: ElementRef<'_>) -> bool {
    element.value().name() == "a" && element.value().attr("href").is_some()
}

pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Nearest ancestor that is an `a[href]`.
pub fn closest_link(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| is_link(*ancestor))
}

/// The element sibling immediately after `element`, skipping text and comments.
pub fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}
