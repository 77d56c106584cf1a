//! Markdown digest of a scrape response.

use crate::dates::{format_date, is_recent};
use crate::models::{ScoredArticle, ScrapeResponse};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Articles dated within this many days get a "New" marker.
pub const RECENT_DAYS: i64 = 1;

/// Render `response` as Markdown, with dates labelled relative to `now`.
pub fn response_to_markdown(response: &ScrapeResponse, now: DateTime<Utc>) -> String {
    let mut md = String::new();
    let stats = &response.statistics;

    writeln!(md, "# {}\n", response.source).unwrap();
    writeln!(
        md,
        "_Scraped {} · {} articles · {} with author · {} with date · average completeness {:.1}/4_\n",
        response.scraped_at,
        response.total_found,
        stats.with_author,
        stats.with_date,
        stats.average_completeness
    )
    .unwrap();

    if response.articles.is_empty() {
        writeln!(md, "No articles found.").unwrap();
        return md;
    }

    for scored in &response.articles {
        write_article(&mut md, scored, now);
    }
    md
}

fn write_article(md: &mut String, scored: &ScoredArticle, now: DateTime<Utc>) {
    let article = &scored.article;
    let marker = if is_recent(&article.publish_date, now, RECENT_DAYS) {
        " `New`"
    } else {
        ""
    };
    writeln!(md, "## [{}]({}){}\n", article.headline, article.url, marker).unwrap();

    let mut meta = Vec::new();
    if scored.has_author {
        meta.push(format!("By {}", article.author));
    }
    meta.push(format_date(&article.publish_date, now));
    if !article.source.is_empty() {
        meta.push(article.source.clone());
    }
    writeln!(md, "*{}*\n", meta.join(" · ")).unwrap();

    if !article.image.is_empty() {
        writeln!(md, "![]({})\n", article.image).unwrap();
    }
    if scored.has_summary {
        writeln!(md, "> {}\n", article.summary).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::score::score;
    use crate::models::Article;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap()
    }

    fn article(headline: &str, author: &str, date: &str) -> Article {
        Article {
            headline: headline.to_string(),
            author: author.to_string(),
            publish_date: date.to_string(),
            source: "Daily Ledger".to_string(),
            url: "https://ledger.example/story/1".to_string(),
            summary: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_renders_articles_with_relative_dates() {
        let response = ScrapeResponse::new(
            vec![
                score(article("Council approves the budget", "Ana Ortiz", "2024-05-03T06:00:00Z")),
                score(article("Harbor reopens after storm", "", "2024-05-01")),
            ],
            "ledger.example".to_string(),
            "2024-05-03T12:00:00.000Z".to_string(),
        );
        let md = response_to_markdown(&response, now());

        assert!(md.starts_with("# ledger.example\n"));
        assert!(md.contains("## [Council approves the budget](https://ledger.example/story/1) `New`"));
        assert!(md.contains("*By Ana Ortiz · Today · Daily Ledger*"));
        assert!(md.contains("## [Harbor reopens after storm](https://ledger.example/story/1)\n"));
        assert!(md.contains("*2 days ago · Daily Ledger*"));
        assert!(md.contains("average completeness 3.5/4"));
    }

    #[test]
    fn test_missing_date_and_optional_fields() {
        let mut a = article("Untimed story headline", "", "");
        a.summary = "A summary that is shown as a quote.".to_string();
        a.image = "https://ledger.example/a.jpg".to_string();
        let response = ScrapeResponse::new(
            vec![score(a)],
            "ledger.example".to_string(),
            "2024-05-03T12:00:00.000Z".to_string(),
        );
        let md = response_to_markdown(&response, now());
        assert!(md.contains("*Date not available · Daily Ledger*"));
        assert!(md.contains("![](https://ledger.example/a.jpg)"));
        assert!(md.contains("> A summary that is shown as a quote."));
    }

    #[test]
    fn test_future_dates_are_not_marked_new() {
        let response = ScrapeResponse::new(
            vec![score(article("Preview of next week's summit", "", "2024-05-10"))],
            "ledger.example".to_string(),
            "2024-05-03T12:00:00.000Z".to_string(),
        );
        let md = response_to_markdown(&response, now());
        assert!(md.contains("## [Preview of next week's summit](https://ledger.example/story/1)\n"));
        assert!(!md.contains("`New`"));
        assert!(md.contains("*May 10, 2024 · Daily Ledger*"));
    }

    #[test]
    fn test_empty_response() {
        let response = ScrapeResponse::new(
            Vec::new(),
            "ledger.example".to_string(),
            "2024-05-03T12:00:00.000Z".to_string(),
        );
        let md = response_to_markdown(&response, now());
        assert!(md.contains("No articles found."));
        assert!(md.contains("average completeness 0.0/4"));
    }
}
