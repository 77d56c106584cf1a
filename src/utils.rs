//! Text, URL, and file system helpers shared by the extractor and the CLI.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization and char-safe truncation of extracted text
//! - Relative-to-absolute URL resolution and domain naming
//! - Slugification for output file names
//! - File system validation for output directories

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Placeholder used when a page URL has no parseable host.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Collapse every run of whitespace (including newlines) into a single space
/// and trim both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("  Breaking\n\n  news  "), "Breaking news");
/// ```
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of characters (not bytes) in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        kept
    } else {
        format!("{}…(+{} bytes)", kept, s.len() - kept.len())
    }
}

/// Resolve `href` against `base`, falling back to `base` itself when the
/// reference is empty or cannot be resolved.
///
/// # Examples
///
/// ```ignore
/// let base = Url::parse("https://news.example/section/").unwrap();
/// assert_eq!(make_absolute_url("../story/12", &base), "https://news.example/story/12");
/// ```
pub fn make_absolute_url(href: &str, base: &Url) -> String {
    let href = href.trim();
    if href.is_empty() {
        return base.to_string();
    }
    match base.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => base.to_string(),
    }
}

/// Human-facing source name for a page URL: the host without a leading
/// `www.`, or [`UNKNOWN_SOURCE`] when the URL has no host.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .map(|host| host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}

/// Convert a title to a file-name friendly slug.
///
/// Lowercases the text, drops anything that is not alphanumeric, a space,
/// a dot or a hyphen, and replaces spaces and dots with hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("news.example.com"), "news-example-com");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-' && c != '.', "")
        .replace([' ', '.'], "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and immediately
/// deletes a scratch file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    stdfs::File::create(&scratch_path)?;
    let _ = stdfs::remove_file(&scratch_path);
    info!("Output directory is writable");
    Ok(())
}
