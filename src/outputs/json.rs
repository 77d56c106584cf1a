//! JSON output files.
//!
//! Each scrape response is written to
//! `{json_output_dir}/{source slug}/{scrapedAt}.json`, with the `:` of the
//! timestamp replaced so the name is valid on every filesystem.

use crate::models::ScrapeResponse;
use crate::utils::slugify;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `response` and write it under `json_output_dir`.
///
/// Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, source = %response.source))]
pub async fn write_response(
    response: &ScrapeResponse,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(response)?;

    let dir = PathBuf::from(json_output_dir).join(slugify(&response.source));
    if let Err(e) = fs::create_dir_all(&dir).await {
        error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = dir.join(format!("{}.json", response.scraped_at.replace(':', "-")));
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = response.total_found, "Wrote JSON file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_response_layout() {
        let root = std::env::temp_dir().join(format!("news_scraper_json_{}", std::process::id()));
        let response = ScrapeResponse::new(
            Vec::new(),
            "news.example".to_string(),
            "2025-05-06T08:15:02.113Z".to_string(),
        );

        let path = write_response(&response, root.to_str().unwrap()).await.unwrap();
        assert_eq!(
            path,
            root.join("news-example").join("2025-05-06T08-15-02.113Z.json")
        );

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written["source"], "news.example");
        assert_eq!(written["totalFound"], 0);
        assert_eq!(written["statistics"]["averageCompleteness"], 0.0);

        fs::remove_dir_all(&root).await.unwrap();
    }
}
