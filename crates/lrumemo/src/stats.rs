//! Cache statistics tracking

use std::cell::Cell;

/// Statistics for one memoized function
///
/// Counters only ever grow for the lifetime of the wrapper that owns them.
/// Reading them has no side effects.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: Cell<u64>,
    misses: Cell<u64>,
    evictions: Cell<u64>,
    inserts: Cell<u64>,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups that found a stored result
    pub hits: u64,
    /// Lookups that had to invoke the wrapped function
    pub misses: u64,
    /// Entries dropped to make room for a new one
    pub evictions: u64,
    /// Results stored after a successful invocation
    pub inserts: u64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        bump(&self.hits);
    }

    pub(crate) fn record_miss(&self) {
        bump(&self.misses);
    }

    pub(crate) fn record_eviction(&self) {
        bump(&self.evictions);
    }

    pub(crate) fn record_insert(&self) {
        bump(&self.inserts);
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    /// Get total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.get()
    }

    /// Get total inserts
    pub fn inserts(&self) -> u64 {
        self.inserts.get()
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        self.snapshot().hit_ratio()
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            evictions: self.evictions(),
            inserts: self.inserts(),
        }
    }
}

impl StatsSnapshot {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

fn bump(counter: &Cell<u64>) {
    counter.set(counter.get().saturating_add(1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let stats = CacheStats::new();

        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.hit_ratio(), 2.0 / 3.0);
    }

    #[test]
    fn test_stats_empty_ratio() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_ratio(), 0.0);
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_stats_snapshot_is_detached() {
        let stats = CacheStats::new();

        stats.record_miss();
        stats.record_insert();
        stats.record_eviction();
        let before = stats.snapshot();
        stats.record_hit();

        assert_eq!(
            before,
            StatsSnapshot {
                hits: 0,
                misses: 1,
                evictions: 1,
                inserts: 1,
            }
        );
        assert_eq!(stats.snapshot().hits, 1);
    }
}
