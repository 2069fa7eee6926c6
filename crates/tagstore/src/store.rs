//! Per-tag key-value store with lazy expiry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ahash::RandomState;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::entry::CacheEntry;
use crate::error::{Error, Result};

/// Isolated namespace of cache entries
///
/// Expired entries are only removed by the [`lookup`](Self::lookup) that
/// finds them; nothing sweeps the map in the background.
pub struct TagStore<V> {
    tag: String,

    /// Key -> entry; each entry's key matches its map key
    entries: RwLock<HashMap<String, CacheEntry<V>, RandomState>>,

    clock: Arc<dyn Clock>,
}

impl<V> TagStore<V> {
    /// Create an empty store reading time from the system clock
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_clock(tag, Arc::new(SystemClock))
    }

    /// Create an empty store reading time from `clock`
    pub fn with_clock(tag: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tag: tag.into(),
            entries: RwLock::new(HashMap::default()),
            clock,
        }
    }

    /// Tag this store belongs to
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Discard every entry
    pub fn purge(&self) {
        let old = std::mem::take(&mut *self.entries.write());
        debug!(tag = %self.tag, dropped = old.len(), "purged tag store");
    }

    /// Insert a value, replacing any existing entry for `key`
    pub fn insert(&self, key: impl Into<String>, value: V, expire_at: Option<DateTime<Utc>>) {
        self.insert_entry(CacheEntry::new(key, value, expire_at));
    }

    /// Insert a prebuilt entry under its own key, replacing any existing entry
    pub fn insert_entry(&self, entry: CacheEntry<V>) {
        let key = entry.key().to_owned();
        self.entries.write().insert(key, entry);
    }

    /// Number of stored entries, including expired entries not yet looked up
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn not_found(&self, key: &str) -> Error {
        Error::KeyNotFound {
            tag: self.tag.clone(),
            key: key.to_owned(),
        }
    }
}

impl<V: Clone> TagStore<V> {
    /// Get the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(value)` - live entry found
    /// * `Err(Error::KeyNotFound)` - key absent, or expired (the entry is removed)
    pub fn lookup(&self, key: &str) -> Result<V> {
        let now = self.clock.now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Err(self.not_found(key)),
                Some(entry) if !entry.is_expired(now) => return Ok(entry.value().clone()),
                Some(_) => {}
            }
        }

        // Expired under the read lock; re-check before evicting since a
        // writer may have replaced the entry in between.
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Ok(entry.value().clone()),
            Some(_) => {
                entries.remove(key);
                debug!(tag = %self.tag, key, "evicted expired entry");
                Err(self.not_found(key))
            }
            None => Err(self.not_found(key)),
        }
    }
}

impl<V> fmt::Debug for TagStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagStore")
            .field("tag", &self.tag)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration;

    fn store_with_clock() -> (TagStore<i32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let store = TagStore::with_clock("test", clock.clone());
        (store, clock)
    }

    #[test]
    fn test_insert_and_lookup() {
        let store = TagStore::new("test");

        store.insert("a", 1, None);
        store.insert("b", 2, None);

        assert_eq!(store.lookup("a").unwrap(), 1);
        assert_eq!(store.lookup("b").unwrap(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.tag(), "test");
    }

    #[test]
    fn test_lookup_missing() {
        let store: TagStore<i32> = TagStore::new("test");

        let result = store.lookup("nope");
        assert!(matches!(result, Err(Error::KeyNotFound { ref key, .. }) if key == "nope"));
    }

    #[test]
    fn test_overwrite_replaces_expiry() {
        let (store, clock) = store_with_clock();
        let now = clock.now();

        store.insert("a", 1, Some(now + Duration::seconds(5)));
        store.insert("a", 2, None);

        clock.advance(Duration::seconds(60));
        assert_eq!(store.lookup("a").unwrap(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expired_entry_evicted_on_read() {
        let (store, clock) = store_with_clock();
        let now = clock.now();

        store.insert("a", 1, Some(now + Duration::seconds(5)));
        clock.advance(Duration::seconds(6));

        // Still held until something reads it
        assert_eq!(store.len(), 1);

        assert!(store.lookup("a").unwrap_err().is_not_found());
        assert_eq!(store.len(), 0);

        // Second read is a plain miss
        assert!(store.lookup("a").unwrap_err().is_not_found());
    }

    #[test]
    fn test_expiry_only_affects_expired_keys() {
        let (store, clock) = store_with_clock();
        let now = clock.now();

        store.insert("short", 1, Some(now + Duration::seconds(1)));
        store.insert("long", 2, Some(now + Duration::seconds(100)));
        store.insert("forever", 3, None);

        clock.advance(Duration::seconds(10));

        assert!(store.lookup("short").is_err());
        assert_eq!(store.lookup("long").unwrap(), 2);
        assert_eq!(store.lookup("forever").unwrap(), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_entry_uses_entry_key() {
        let store = TagStore::new("test");

        store.insert_entry(CacheEntry::new("k", "v".to_string(), None));
        assert_eq!(store.lookup("k").unwrap(), "v");
    }

    #[test]
    fn test_purge() {
        let store = TagStore::new("test");

        store.insert("a", 1, None);
        store.insert("b", 2, None);
        store.purge();

        assert!(store.is_empty());
        assert!(store.lookup("a").is_err());

        // Still usable after purge
        store.insert("a", 3, None);
        assert_eq!(store.lookup("a").unwrap(), 3);
    }
}
