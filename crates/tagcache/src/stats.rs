//! Cache statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss counters for one cached function
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    failures: AtomicU64,
}

impl CacheStats {
    /// Counters starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call answered from the cache
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call that had to recompute
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a recomputed value written to the store
    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a recomputation that returned an error (nothing cached)
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total inserts
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Get total failed recomputations
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Fraction of calls answered from the cache; 0.0 before the first call
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        match hits + self.misses() {
            0 => 0.0,
            calls => hits as f64 / calls as f64,
        }
    }
}
