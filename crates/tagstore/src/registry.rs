//! Registry of named tag stores
//!
//! One registry is meant to be shared (behind an `Arc`) by every cached
//! function that should see the same tags. Stores are created lazily on
//! first access and live until purged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ahash::RandomState;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::entry::CacheEntry;
use crate::store::TagStore;

/// Collection of isolated [`TagStore`]s keyed by tag
pub struct StoreRegistry<V> {
    /// Tag -> store
    stores: RwLock<HashMap<String, Arc<TagStore<V>>, RandomState>>,

    /// Shared with every store this registry creates
    clock: Arc<dyn Clock>,
}

impl<V> StoreRegistry<V> {
    /// Create an empty registry on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty registry on the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            stores: RwLock::new(HashMap::default()),
            clock,
        }
    }

    /// Current time according to the registry clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Clock shared by this registry's stores
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Absolute expiry for an entry written now with the given TTL
    ///
    /// `None` and a zero TTL both mean "never expires". A TTL too large to
    /// represent as a timestamp is treated the same way.
    pub fn expire_at_for(&self, ttl: Option<Duration>) -> Option<DateTime<Utc>> {
        let ttl = ttl.filter(|ttl| !ttl.is_zero())?;
        let ttl = chrono::Duration::from_std(ttl).ok()?;
        self.now().checked_add_signed(ttl)
    }

    /// Get the store for `tag`, creating an empty one on first reference
    pub fn get_store(&self, tag: &str) -> Arc<TagStore<V>> {
        if let Some(store) = self.stores.read().get(tag) {
            return Arc::clone(store);
        }

        let mut stores = self.stores.write();
        let store = stores.entry(tag.to_owned()).or_insert_with(|| {
            debug!(tag, "created tag store");
            Arc::new(TagStore::with_clock(tag, Arc::clone(&self.clock)))
        });
        Arc::clone(store)
    }

    /// Drop the store for `tag` and everything in it; no-op if absent
    pub fn purge(&self, tag: &str) {
        if self.stores.write().remove(tag).is_some() {
            debug!(tag, "purged tag");
        }
    }

    /// Drop every store
    pub fn purge_all(&self) {
        let old = std::mem::take(&mut *self.stores.write());
        debug!(tags = old.len(), "purged all tags");
    }

    /// Seed an entry directly, creating the tag's store if needed
    pub fn set(
        &self,
        tag: &str,
        key: impl Into<String>,
        value: V,
        expire_at: Option<DateTime<Utc>>,
    ) {
        self.get_store(tag)
            .insert_entry(CacheEntry::new(key, value, expire_at));
    }

    /// Seed an entry that expires `ttl` from now
    pub fn set_with_ttl(
        &self,
        tag: &str,
        key: impl Into<String>,
        value: V,
        ttl: Option<Duration>,
    ) {
        let expire_at = self.expire_at_for(ttl);
        self.set(tag, key, value, expire_at);
    }

    /// Number of live tag stores
    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    /// Check if no tag store exists
    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }

    /// Tags that currently have a store, sorted
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.stores.read().keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl<V> Default for StoreRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for StoreRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
