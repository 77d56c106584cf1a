//! # News Scraper
//!
//! Heuristic extraction of news articles from arbitrary web pages, guarded
//! by a robots.txt policy check.
//!
//! ## Features
//!
//! - Finds article containers on any page without per-site configuration,
//!   and falls back to a heading scan when a page has none
//! - Extracts headline, author, date, source, link, summary and image, each
//!   through an ordered selector cascade with validation
//! - Drops duplicate headlines and scores each article's completeness
//! - Honors robots.txt with a one-hour cache, failing open when it cannot
//!   be read
//! - Classifies network failures and maps them to HTTP-style status codes
//!
//! ## Architecture
//!
//! 1. **Validation**: the request URL must be present and well formed
//! 2. **Policy**: [`policy::PolicyGate`] consults robots.txt
//! 3. **Fetching**: [`fetch::HttpFetcher`], wrapped in [`fetch::RetryFetch`]
//! 4. **Extraction**: [`extract::extract_from_html`]
//! 5. **Output**: [`models::ScrapeResponse`] as JSON or a Markdown digest

pub mod config;
pub mod dates;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod policy;
pub mod scrape;
pub mod utils;
