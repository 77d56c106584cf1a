//! Process-wide robots.txt cache with a time-to-live.
//!
//! Entries live in per-URL slots. A slot is an async mutex so the caller that
//! finds it empty or stale can hold it while fetching; concurrent callers for
//! the same robots.txt wait on the slot instead of issuing their own request.

use super::rules::RuleSet;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;

/// Source of the current instant, injectable for tests.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A fetched and parsed robots.txt.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub robots_url: String,
    pub rules: Arc<RuleSet>,
    pub fetched_at: Instant,
}

pub type Slot = Arc<AsyncMutex<Option<CacheEntry>>>;

#[derive(Debug)]
pub struct RobotsCache<C = SystemClock> {
    slots: Mutex<HashMap<String, Slot>>,
    ttl: Duration,
    clock: C,
}

impl RobotsCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> RobotsCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// The slot for `robots_url`, created empty on first use.
    pub fn slot(&self, robots_url: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots
            .entry(robots_url.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(None)))
            .clone()
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// `true` while `now - fetched_at < ttl`.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.now().saturating_duration_since(entry.fetched_at) < self.ttl
    }

    /// Live entry for `robots_url`, without fetching or creating a slot.
    pub async fn get_fresh(&self, robots_url: &str) -> Option<CacheEntry> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            slots.get(robots_url).cloned()
        }?;
        let guard = slot.lock().await;
        guard.as_ref().filter(|entry| self.is_fresh(entry)).cloned()
    }

    /// Hand back a slot taken with [`RobotsCache::slot`]. The slot is
    /// removed when it is still empty and nobody else holds it.
    pub fn release(&self, robots_url: &str, slot: Slot) {
        drop(slot);
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let unused = slots.get(robots_url).is_some_and(|slot| {
            Arc::strong_count(slot) == 1 && slot.try_lock().is_ok_and(|entry| entry.is_none())
        });
        if unused {
            slots.remove(robots_url);
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    offset: Arc<Mutex<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap()
    }
}
