//! Cache Store Module
//!
//! Response cache over a line-oriented record store, with a freshness window
//! and FIFO capacity eviction. Lines are kept in written order: the first
//! line is the oldest entry, the last line the newest.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::entry::{is_empty_payload, payload_text};
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::error::{Result, StatsError};
use crate::storage::RecordStore;

// == Cache Config ==
/// Immutable settings of one cache instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Entries younger than this are usable
    pub freshness_window: Duration,
    /// Maximum number of stored entries
    pub capacity: usize,
    /// When false, persist never writes
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_window: Duration::from_secs(15 * 60),
            capacity: 50,
            enabled: true,
        }
    }
}

// == Response Cache ==
/// Bounded, time-windowed cache of API responses.
///
/// Every operation reads and/or rewrites the backing store before returning.
/// Callers sharing an instance must serialize access to it.
#[derive(Debug)]
pub struct ResponseCache {
    /// Exclusively owned backing store
    store: Box<dyn RecordStore>,
    /// Time source for freshness checks
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    stats: CacheStats,
}

impl ResponseCache {
    // == Constructor ==
    /// Creates a cache over `store` using wall-clock time.
    pub fn new(store: impl RecordStore + 'static, config: CacheConfig) -> Result<Self> {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Creates a cache with an explicit time source.
    pub fn with_clock(
        store: impl RecordStore + 'static,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if config.capacity == 0 {
            return Err(StatsError::InvalidRequest(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            store: Box::new(store),
            clock,
            config,
            stats: CacheStats::new(),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Lookup ==
    /// Returns the first fresh payload, in store order, whose line contains
    /// `key`.
    ///
    /// With `match_by_name`, the payload's `name` must also equal `key`
    /// ignoring case. Stale entries never match and are left in place.
    pub fn lookup(&mut self, key: &str, match_by_name: bool) -> Result<Option<Value>> {
        let lines = self.store.read_all()?;

        let found = if match_by_name {
            let wanted = key.to_lowercase();
            self.scan(
                &lines,
                |line| line.to_lowercase().contains(&wanted),
                |entry| entry.name().is_some_and(|n| n.to_lowercase() == wanted),
            )
        } else {
            self.scan(&lines, |line| line.contains(key), |_| true)
        };

        if found.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        self.stats.set_total_entries(lines.len());

        Ok(found.map(|entry| entry.payload))
    }

    // == Persist ==
    /// Stores `payload` with the current time.
    ///
    /// Returns `Ok(false)` without writing when caching is disabled, the
    /// payload is empty, or an identical payload is still fresh. A full
    /// store drops its oldest entries first.
    pub fn persist(&mut self, payload: &Value) -> Result<bool> {
        if !self.config.enabled {
            debug!("Caching disabled, skipping write");
            return Ok(false);
        }
        if is_empty_payload(payload) {
            debug!("Empty payload, skipping write");
            return Ok(false);
        }

        let text = payload_text(payload)?;
        let mut lines = self.store.read_all()?;

        let duplicate = self.scan(
            &lines,
            |line| line.contains(&text),
            |entry| entry.payload == *payload,
        );
        if duplicate.is_some() {
            self.stats.record_duplicate();
            debug!("Fresh copy already cached, skipping write");
            return Ok(false);
        }

        // Written order must stay non-decreasing even if the clock steps back
        let now = self.clock.now();
        let timestamp = lines
            .last()
            .and_then(|line| CacheEntry::decode(line).ok())
            .map_or(now, |newest| now.max(newest.timestamp));
        let line = CacheEntry::new(timestamp, payload.clone()).encode()?;

        // A full store evicts and writes in one replace, so a failure leaves
        // the old lines untouched
        let excess = (lines.len() + 1).saturating_sub(self.config.capacity);
        if excess > 0 {
            lines.drain(..excess);
            lines.push(line);
            self.store.replace_all(&lines)?;
            self.stats.record_evictions(excess);
            debug!("Evicted {} oldest cache entries", excess);
        } else {
            self.store.append(&line)?;
            lines.push(line);
        }

        self.stats.record_write();
        self.stats.set_total_entries(lines.len());
        Ok(true)
    }

    // == Clean ==
    /// Removes stale entries and returns how many were dropped.
    ///
    /// If even the newest entry is stale the whole store is truncated.
    /// Otherwise stale and unreadable lines are dropped and the rest are
    /// rewritten unchanged, in order, in a single replace.
    pub fn clean(&mut self) -> Result<usize> {
        let lines = self.store.read_all()?;
        if lines.is_empty() {
            self.stats.set_total_entries(0);
            return Ok(0);
        }

        let now = self.clock.now();
        let window = self.config.freshness_window;

        let newest_stale = lines
            .last()
            .and_then(|line| CacheEntry::decode(line).ok())
            .is_some_and(|entry| !entry.is_fresh(now, window));

        if newest_stale {
            self.store.truncate()?;
            self.stats.record_clean(lines.len(), true);
            self.stats.set_total_entries(0);
            info!("Cache flushed: all {} entries were stale", lines.len());
            return Ok(lines.len());
        }

        let kept: Vec<String> = lines
            .iter()
            .filter(|line| match CacheEntry::decode(line) {
                Ok(entry) => entry.is_fresh(now, window),
                Err(err) => {
                    warn!("Dropping unreadable cache line: {}", err);
                    false
                }
            })
            .cloned()
            .collect();

        let removed = lines.len() - kept.len();
        if removed > 0 {
            self.store.replace_all(&kept)?;
            debug!("Cache clean removed {} entries, kept {}", removed, kept.len());
        }

        self.stats.record_clean(removed, false);
        self.stats.set_total_entries(kept.len());
        Ok(removed)
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) -> Result<()> {
        self.store.truncate()?;
        self.stats.set_total_entries(0);
        Ok(())
    }

    // == Inspection ==
    /// Decodes all readable entries in store order, stale ones included.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        Ok(self
            .store
            .read_all()?
            .iter()
            .filter_map(|line| CacheEntry::decode(line).ok())
            .collect())
    }

    /// Number of stored lines.
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.read_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// First line passing `prefilter` that decodes, is fresh and satisfies
    /// `accept`. Unreadable lines count as non-matches.
    fn scan(
        &self,
        lines: &[String],
        prefilter: impl Fn(&str) -> bool,
        accept: impl Fn(&CacheEntry) -> bool,
    ) -> Option<CacheEntry> {
        let now = self.clock.now();

        lines
            .iter()
            .filter(|line| prefilter(line.as_str()))
            .filter_map(|line| match CacheEntry::decode(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable cache line: {}", err);
                    None
                }
            })
            .find(|entry| entry.is_fresh(now, self.config.freshness_window) && accept(entry))
    }
}
