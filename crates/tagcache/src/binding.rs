//! Read-through plumbing shared by the sync and async wrappers

use std::sync::Arc;
use std::time::Duration;

use tagstore::{CacheEntry, StoreRegistry, TagStore};
use tracing::{debug, trace};

use crate::stats::CacheStats;

/// A tag and TTL bound to a registry
///
/// Holds no entries itself; every call re-resolves the tag's store so a
/// purge between calls is always observed.
pub(crate) struct TagBinding<V> {
    tag: String,
    /// Never `Some(Duration::ZERO)`
    ttl: Option<Duration>,
    registry: Arc<StoreRegistry<V>>,
    stats: CacheStats,
}

impl<V> TagBinding<V> {
    pub(crate) fn new(
        registry: Arc<StoreRegistry<V>>,
        tag: String,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            tag,
            ttl: ttl.filter(|ttl| !ttl.is_zero()),
            registry,
            stats: CacheStats::new(),
        }
    }

    pub(crate) fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub(crate) fn registry(&self) -> &Arc<StoreRegistry<V>> {
        &self.registry
    }

    pub(crate) fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub(crate) fn store(&self) -> Arc<TagStore<V>> {
        self.registry.get_store(&self.tag)
    }

    pub(crate) fn purge(&self) {
        self.registry.purge(&self.tag);
    }

    /// Write a freshly computed value, stamping expiry from the TTL
    pub(crate) fn fill(&self, store: &TagStore<V>, key: String, value: V) {
        let expire_at = self.registry.expire_at_for(self.ttl);
        store.insert_entry(CacheEntry::new(key, value, expire_at));
        self.stats.record_insert();
    }

    /// Note a recomputation that failed; the store is left untouched
    pub(crate) fn failed(&self, key: &str) {
        self.stats.record_failure();
        debug!(tag = %self.tag, key, "recomputation failed, nothing cached");
    }
}

impl<V: Clone> TagBinding<V> {
    /// Look `key` up, recording the outcome
    ///
    /// A miss and an expired entry are indistinguishable here.
    pub(crate) fn hit(&self, store: &TagStore<V>, key: &str) -> Option<V> {
        match store.lookup(key) {
            Ok(value) => {
                self.stats.record_hit();
                trace!(tag = %self.tag, key, "cache hit");
                Some(value)
            }
            Err(err) => {
                debug_assert!(err.is_not_found());
                self.stats.record_miss();
                trace!(tag = %self.tag, key, "cache miss");
                None
            }
        }
    }
}
