//! Command-line front end for the news scraper.
//!
//! ## Usage
//!
//! ```sh
//! news_scraper scrape https://news.example/
//! news_scraper robots https://news.example/private/a
//! news_scraper extract -f page.html -b https://news.example/
//! ```
//!
//! Results are printed to stdout, one JSON document per line (or Markdown
//! with `--markdown`). Logs go to stderr.

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use futures::stream::{self, StreamExt};
use news_scraper::config::AppConfig;
use news_scraper::error::{ErrorBody, ScrapeError};
use news_scraper::extract::extract_from_html;
use news_scraper::fetch::{HttpFetcher, RetryFetch};
use news_scraper::models::ScrapeResponse;
use news_scraper::outputs::{json, markdown};
use news_scraper::policy::PolicyGate;
use news_scraper::scrape::Scraper;
use news_scraper::utils::{ensure_writable_dir, extract_domain};
use serde::Serialize;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;

use cli::{Cli, Command};

type HttpScraper = Scraper<RetryFetch<HttpFetcher>, HttpFetcher>;

/// A failed scrape as printed on stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeFailure<'a> {
    url: &'a str,
    status: u16,
    retryable: bool,
    #[serde(flatten)]
    body: ErrorBody,
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_scraper starting up");

    let args = Cli::parse();
    debug!(?args.command, ?args.json_output_dir, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(user_agent) = args.user_agent {
        config.user_agent = user_agent;
    }

    let result = match args.command {
        Command::Scrape {
            urls,
            markdown,
            concurrency,
        } => {
            if let Some(concurrency) = concurrency {
                config.concurrency = concurrency;
            }
            run_scrape(&config, &urls, markdown, args.json_output_dir.as_deref()).await
        }
        Command::Robots { url } => run_robots(&config, &url).await,
        Command::Extract { file, base_url } => run_extract(&file, &base_url).await,
    };

    info!(
        elapsed_secs = start_time.elapsed().as_secs_f64(),
        ok = result.is_ok(),
        "news_scraper finished"
    );
    result
}

fn build_scraper(config: &AppConfig) -> Result<HttpScraper, Box<dyn Error>> {
    let http = HttpFetcher::new(config)?;
    let pages = RetryFetch::new(http.clone(), config.fetch_retries, config.retry_base_delay());
    let gate = PolicyGate::new(http, config.robots_cache_ttl());
    Ok(Scraper::new(pages, gate, config.user_agent.clone()))
}

#[instrument(level = "info", skip_all, fields(urls = urls.len(), concurrency = config.concurrency))]
async fn run_scrape(
    config: &AppConfig,
    urls: &[String],
    as_markdown: bool,
    json_output_dir: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = json_output_dir {
        ensure_writable_dir(dir).await?;
    }
    let scraper = build_scraper(config)?;

    let scraper = &scraper;
    let mut results: Vec<(usize, Result<ScrapeResponse, ScrapeError>)> =
        stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move { (index, scraper.scrape(url).await) })
            .buffer_unordered(config.concurrency.max(1))
            .collect()
            .await;
    results.sort_by_key(|(index, _)| *index);

    let now = Utc::now();
    let mut failures = 0usize;
    for (index, result) in results {
        let url = &urls[index];
        match result {
            Ok(response) => {
                if let Some(dir) = json_output_dir {
                    if let Err(e) = json::write_response(&response, dir).await {
                        error!(%url, error = %e, "Failed to write JSON output");
                    }
                }
                if as_markdown {
                    println!("{}", markdown::response_to_markdown(&response, now));
                } else {
                    println!("{}", serde_json::to_string(&response)?);
                }
            }
            Err(e) => {
                failures += 1;
                error!(%url, status = e.status_code(), error = %e, "Scrape failed");
                let failure = ScrapeFailure {
                    url,
                    status: e.status_code(),
                    retryable: e.is_retryable(),
                    body: e.to_body(config.expose_error_details),
                };
                if as_markdown {
                    println!("# {url}\n\n**Error {}**: {}\n", failure.status, failure.body.error);
                } else {
                    println!("{}", serde_json::to_string(&failure)?);
                }
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} scrapes failed", urls.len()).into());
    }
    Ok(())
}

#[instrument(level = "info", skip(config))]
async fn run_robots(config: &AppConfig, url: &str) -> Result<(), Box<dyn Error>> {
    let scraper = build_scraper(config)?;
    match scraper.robots_check(url).await {
        Ok(response) => {
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string(&e.to_body(config.expose_error_details))?);
            Err(e.into())
        }
    }
}

#[instrument(level = "info")]
async fn run_extract(file: &str, base_url: &str) -> Result<(), Box<dyn Error>> {
    let base = Url::parse(base_url)?;
    let html = tokio::fs::read_to_string(file).await?;
    let articles = extract_from_html(&html, &base);
    let response = ScrapeResponse::new(
        articles,
        extract_domain(base.as_str()),
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
