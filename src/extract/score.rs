//! Completeness scoring.

use crate::models::{Article, ScoredArticle};

/// Number of non-empty fields among headline, author, publish date, and
/// source (0..=4).
pub fn completeness(article: &Article) -> u8 {
    [
        &article.headline,
        &article.author,
        &article.publish_date,
        &article.source,
    ]
    .iter()
    .filter(|field| !field.is_empty())
    .count() as u8
}

pub fn score(article: Article) -> ScoredArticle {
    ScoredArticle {
        has_author: !article.author.is_empty(),
        has_date: !article.publish_date.is_empty(),
        has_summary: !article.summary.is_empty(),
        completeness: completeness(&article),
        article,
    }
}
