//! Cache Statistics Module
//!
//! Tracks cache behaviour: lookups, writes, skipped duplicates and removals.

use serde::Serialize;

// == Cache Stats ==
/// Counters since the cache instance was created.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a fresh entry
    pub hits: u64,
    /// Lookups that found nothing usable
    pub misses: u64,
    /// Entries appended by persist
    pub writes: u64,
    /// Persist calls skipped because a fresh copy already existed
    pub duplicates: u64,
    /// Entries dropped to respect capacity
    pub evictions: u64,
    /// Whole-store flushes performed by clean
    pub flushes: u64,
    /// Entries removed by clean, flushes included
    pub purged: u64,
    /// Entry count observed after the last operation
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Record Clean ==
    /// Accounts for one clean pass that removed `removed` entries.
    pub fn record_clean(&mut self, removed: usize, flushed: bool) {
        self.purged += removed as u64;
        if flushed {
            self.flushes += 1;
        }
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.writes, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_clean() {
        let mut stats = CacheStats::new();
        stats.record_clean(3, false);
        stats.record_clean(5, true);
        assert_eq!(stats.purged, 8);
        assert_eq!(stats.flushes, 1);
    }

    #[test]
    fn test_record_evictions() {
        let mut stats = CacheStats::new();
        stats.record_evictions(2);
        stats.record_evictions(1);
        assert_eq!(stats.evictions, 3);
    }
}
