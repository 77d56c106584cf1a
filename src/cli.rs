//! Command-line interface definitions for the news scraper.
//!
//! Options can be given as flags; the user agent can also come from the
//! environment. Values given here override the config file.

use clap::{Parser, Subcommand};

/// Command-line arguments for the news scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape two front pages, four at a time
/// news_scraper scrape https://news.example/ https://ledger.example/world
///
/// # Same, but as a Markdown digest and with JSON files written to ./json
/// news_scraper -j ./json scrape --markdown https://news.example/
///
/// # Ask whether a page may be scraped
/// news_scraper robots https://news.example/private/a
///
/// # Run the extractor on a saved page
/// news_scraper extract -f page.html -b https://news.example/
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Product token used for robots.txt checks and request headers
    #[arg(long, env = "NEWS_SCRAPER_USER_AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Output directory for JSON files of scrape results
    #[arg(short, long, global = true)]
    pub json_output_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch pages and extract their articles
    Scrape {
        /// Page URLs to scrape
        #[arg(required = true)]
        urls: Vec<String>,

        /// Print a Markdown digest instead of JSON
        #[arg(short, long)]
        markdown: bool,

        /// Maximum pages fetched at once (overrides the config file)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Check robots.txt for a URL
    Robots {
        url: String,
    },
    /// Extract articles from a local HTML file
    Extract {
        /// HTML file to read
        #[arg(short, long)]
        file: String,

        /// URL the page was served from, used to resolve links
        #[arg(short, long)]
        base_url: String,
    },
}
