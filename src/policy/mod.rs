//! robots.txt policy gate.
//!
//! Answers "may this agent fetch this URL?" before any page is requested.
//! The gate fails open: a missing robots.txt, a network error, or an
//! unparseable URL all count as permission. Parsed files are cached per
//! robots.txt URL for the configured TTL (one hour by default).

pub mod cache;
pub mod rules;

use crate::fetch::{FetchError, RobotsFetcher};
use crate::utils::truncate_chars;
use cache::{CacheEntry, Clock, RobotsCache, Slot, SystemClock};
use rules::RuleSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Characters of robots.txt returned by [`PolicyGate::get_robots_content`].
pub const ROBOTS_PREVIEW_CHARS: usize = 500;

/// `<scheme>://<host>[:port]/robots.txt` for an http(s) URL.
pub fn robots_url_for(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }
    parsed.join("/robots.txt").ok().map(String::from)
}

pub struct PolicyGate<F, C = SystemClock> {
    fetcher: F,
    cache: RobotsCache<C>,
}

impl<F: RobotsFetcher> PolicyGate<F, SystemClock> {
    pub fn new(fetcher: F, ttl: Duration) -> Self {
        Self::with_cache(fetcher, RobotsCache::new(ttl))
    }
}

impl<F: RobotsFetcher, C: Clock> PolicyGate<F, C> {
    pub fn with_cache(fetcher: F, cache: RobotsCache<C>) -> Self {
        Self { fetcher, cache }
    }

    /// Whether `user_agent` may fetch `url`. Never fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        let Some(robots_url) = robots_url_for(url) else {
            warn!("Cannot derive robots.txt location; allowing");
            return true;
        };

        let slot = self.cache.slot(&robots_url);
        let allowed = self.check_slot(&slot, &robots_url, url, user_agent).await;
        self.cache.release(&robots_url, slot);
        allowed
    }

    async fn check_slot(
        &self,
        slot: &Slot,
        robots_url: &str,
        url: &str,
        user_agent: &str,
    ) -> bool {
        let mut guard = slot.lock().await;

        if let Some(entry) = guard.as_ref().filter(|entry| self.cache.is_fresh(entry)) {
            debug!(robots_url = %entry.robots_url, "robots.txt cache hit");
            return entry.rules.is_allowed(user_agent, url);
        }

        match self.fetcher.fetch_robots(robots_url).await {
            Ok(Some(body)) => {
                let rules = Arc::new(RuleSet::parse(body));
                let allowed = rules.is_allowed(user_agent, url);
                info!(%robots_url, allowed, "Fetched robots.txt");
                *guard = Some(CacheEntry {
                    robots_url: robots_url.to_string(),
                    rules,
                    fetched_at: self.cache.now(),
                });
                allowed
            }
            Ok(None) => {
                debug!(%robots_url, "No robots.txt; allowing");
                *guard = None;
                true
            }
            Err(e) => {
                warn!(%robots_url, error = %e, "robots.txt check failed; allowing");
                *guard = None;
                true
            }
        }
    }

    /// Raw robots.txt, first [`ROBOTS_PREVIEW_CHARS`] characters. `None`
    /// when the origin has none. A live cache entry is served without a
    /// request.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_robots_content(&self, robots_url: &str) -> Result<Option<String>, FetchError> {
        let body = match self.cache.get_fresh(robots_url).await {
            Some(entry) => Some(entry.rules.body().to_string()),
            None => self.fetcher.fetch_robots(robots_url).await?,
        };
        Ok(body.map(|body| truncate_chars(&body, ROBOTS_PREVIEW_CHARS)))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("robots.txt cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::cache::ManualClock;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const AGENT: &str = "NewsScraperBot";
    const TTL: Duration = Duration::from_secs(3600);

    enum Reply {
        Body(String),
        NotFound,
        Fail,
    }

    struct CountingFetcher {
        reply: Mutex<Reply>,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new(reply: Reply) -> Self {
            Self {
                reply: Mutex::new(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn set(&self, reply: Reply) {
            *self.reply.lock().unwrap() = reply;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RobotsFetcher for CountingFetcher {
        async fn fetch_robots(&self, _robots_url: &str) -> Result<Option<String>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            match &*self.reply.lock().unwrap() {
                Reply::Body(body) => Ok(Some(body.clone())),
                Reply::NotFound => Ok(None),
                Reply::Fail => Err(FetchError::Timeout("robots".into())),
            }
        }
    }

    fn gate<'a>(
        fetcher: &'a CountingFetcher,
        clock: &ManualClock,
    ) -> PolicyGate<&'a CountingFetcher, ManualClock> {
        PolicyGate::with_cache(fetcher, RobotsCache::with_clock(TTL, clock.clone()))
    }

    #[test]
    fn test_robots_url_for() {
        assert_eq!(
            robots_url_for("https://news.example/world/story?id=1").as_deref(),
            Some("https://news.example/robots.txt")
        );
        assert_eq!(
            robots_url_for("http://news.example:8080/a").as_deref(),
            Some("http://news.example:8080/robots.txt")
        );
        assert_eq!(robots_url_for("not a url"), None);
        assert_eq!(robots_url_for("ftp://news.example/a"), None);
    }

    #[tokio::test]
    async fn test_disallowed_path_is_denied() {
        let fetcher = CountingFetcher::new(Reply::Body("User-agent: *\nDisallow: /private\n".into()));
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        assert!(!gate.is_allowed("https://news.example/private/a", AGENT).await);
        assert!(gate.is_allowed("https://news.example/public/a", AGENT).await);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_within_ttl_refetched_after() {
        let fetcher = CountingFetcher::new(Reply::Body("User-agent: *\nDisallow: /private\n".into()));
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);

        gate.is_allowed("https://news.example/a", AGENT).await;
        clock.advance(Duration::from_secs(30 * 60));
        gate.is_allowed("https://news.example/b", AGENT).await;
        assert_eq!(fetcher.calls(), 1);

        clock.advance(Duration::from_secs(31 * 60));
        gate.is_allowed("https://news.example/c", AGENT).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_entry_is_replaced() {
        let fetcher = CountingFetcher::new(Reply::Body("User-agent: *\nDisallow: /private\n".into()));
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        assert!(!gate.is_allowed("https://news.example/private/a", AGENT).await);

        fetcher.set(Reply::Body("User-agent: *\nDisallow:\n".into()));
        clock.advance(TTL);
        assert!(gate.is_allowed("https://news.example/private/a", AGENT).await);
    }

    #[tokio::test]
    async fn test_missing_robots_allows_and_is_not_cached() {
        let fetcher = CountingFetcher::new(Reply::NotFound);
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        assert!(gate.is_allowed("https://news.example/private/a", AGENT).await);
        assert!(gate.is_allowed("https://news.example/private/b", AGENT).await);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_open() {
        let fetcher = CountingFetcher::new(Reply::Fail);
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        assert!(gate.is_allowed("https://news.example/private/a", AGENT).await);

        // Nothing was cached, so a later successful fetch takes effect.
        fetcher.set(Reply::Body("User-agent: *\nDisallow: /private\n".into()));
        assert!(!gate.is_allowed("https://news.example/private/a", AGENT).await);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_and_failed_robots_leave_no_slots() {
        let fetcher = CountingFetcher::new(Reply::NotFound);
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        for i in 0..5 {
            assert!(gate.is_allowed(&format!("https://site{i}.example/a"), AGENT).await);
        }
        assert_eq!(gate.cache.len(), 0);

        fetcher.set(Reply::Fail);
        assert!(gate.is_allowed("https://down.example/a", AGENT).await);
        assert!(gate.get_robots_content("https://down.example/robots.txt").await.is_err());
        assert_eq!(gate.cache.len(), 0);

        fetcher.set(Reply::Body("User-agent: *\nDisallow:\n".into()));
        assert!(gate.is_allowed("https://kept.example/a", AGENT).await);
        assert_eq!(gate.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_url_is_allowed_without_fetch() {
        let fetcher = CountingFetcher::new(Reply::Fail);
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        assert!(gate.is_allowed("::not a url::", AGENT).await);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_checks_fetch_once() {
        let fetcher = CountingFetcher::new(Reply::Body("User-agent: *\nDisallow: /private\n".into()));
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        let gate = &gate;
        let checks = (0..8).map(|i| async move {
            gate.is_allowed(&format!("https://news.example/p/{i}"), AGENT).await
        });
        let results = futures::future::join_all(checks).await;
        assert!(results.into_iter().all(|allowed| allowed));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let fetcher = CountingFetcher::new(Reply::Body("User-agent: *\nDisallow:\n".into()));
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        gate.is_allowed("https://news.example/a", AGENT).await;
        gate.clear_cache();
        gate.is_allowed("https://news.example/a", AGENT).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_robots_content_truncated_and_cached() {
        let long = format!("User-agent: *\n{}", "Disallow: /x\n".repeat(100));
        let fetcher = CountingFetcher::new(Reply::Body(long));
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        let robots_url = "https://news.example/robots.txt";

        let content = gate.get_robots_content(robots_url).await.unwrap().unwrap();
        assert_eq!(content.chars().count(), ROBOTS_PREVIEW_CHARS);
        assert_eq!(fetcher.calls(), 1);

        gate.is_allowed("https://news.example/a", AGENT).await;
        gate.get_robots_content(robots_url).await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_robots_content_missing_and_failed() {
        let fetcher = CountingFetcher::new(Reply::NotFound);
        let clock = ManualClock::new();
        let gate = gate(&fetcher, &clock);
        let robots_url = "https://news.example/robots.txt";
        assert_eq!(gate.get_robots_content(robots_url).await.unwrap(), None);

        fetcher.set(Reply::Fail);
        assert!(gate.get_robots_content(robots_url).await.is_err());
    }
}
