//! Runtime configuration.
//!
//! Settings come from an optional YAML file; every field has a default so an
//! empty or partial file is valid. Command-line flags are applied on top by
//! `main`.
//!
//! ```yaml
//! user_agent: NewsScraperBot
//! page_timeout_secs: 10
//! robots_timeout_secs: 5
//! max_redirects: 5
//! robots_cache_ttl_secs: 3600
//! fetch_retries: 2
//! retry_base_delay_ms: 500
//! concurrency: 4
//! expose_error_details: false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// All tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Product token checked against robots.txt groups.
    pub user_agent: String,
    pub page_timeout_secs: u64,
    pub robots_timeout_secs: u64,
    pub max_redirects: usize,
    /// How long a parsed robots.txt stays valid.
    pub robots_cache_ttl_secs: u64,
    /// Extra attempts for retryable page-fetch failures.
    pub fetch_retries: usize,
    pub retry_base_delay_ms: u64,
    /// Pages scraped at once by the `scrape` command.
    pub concurrency: usize,
    /// Include diagnostic details in generic failure bodies. Meant for
    /// development only.
    pub expose_error_details: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: "NewsScraperBot".to_string(),
            page_timeout_secs: 10,
            robots_timeout_secs: 5,
            max_redirects: 5,
            robots_cache_ttl_secs: 60 * 60,
            fetch_retries: 2,
            retry_base_delay_ms: 500,
            concurrency: 4,
            expose_error_details: false,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let path = PathBuf::from(path);
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Browser-like User-Agent header for page requests.
    pub fn page_user_agent(&self) -> String {
        format!("Mozilla/5.0 (compatible; {}/1.0)", self.user_agent)
    }

    /// User-Agent header for robots.txt requests.
    pub fn robots_user_agent(&self) -> String {
        format!("{}/1.0", self.user_agent)
    }

    pub fn robots_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.robots_cache_ttl_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.user_agent, "NewsScraperBot");
        assert_eq!(config.page_timeout_secs, 10);
        assert_eq!(config.robots_timeout_secs, 5);
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.robots_cache_ttl(), Duration::from_secs(3600));
        assert!(!config.expose_error_details);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("user_agent: TestBot\nconcurrency: 8\n").unwrap();
        assert_eq!(config.user_agent, "TestBot");
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.page_timeout_secs, 10);
        assert_eq!(config.robots_user_agent(), "TestBot/1.0");
        assert_eq!(config.page_user_agent(), "Mozilla/5.0 (compatible; TestBot/1.0)");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(AppConfig::from_yaml("concurrency: [1, 2").is_err());
        assert!(AppConfig::from_yaml("page_timeout_secs: soon").is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load(Some("/nonexistent/news_scraper.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_no_path_is_default() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }
}
