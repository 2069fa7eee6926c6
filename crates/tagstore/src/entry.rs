//! Cache entry representation

use chrono::{DateTime, Duration, Utc};

/// A cached value with an optional absolute expiry
///
/// Entries are never mutated in place; an overwrite replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    key: String,
    value: V,
    /// `None` means the entry never expires
    expire_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    /// Create a new entry
    pub fn new(key: impl Into<String>, value: V, expire_at: Option<DateTime<Utc>>) -> Self {
        Self {
            key: key.into(),
            value,
            expire_at,
        }
    }

    /// Key this entry is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cached value
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consume the entry, returning its value
    pub fn into_value(self) -> V {
        self.value
    }

    /// Absolute expiry time, if any
    pub fn expire_at(&self) -> Option<DateTime<Utc>> {
        self.expire_at
    }

    /// Whether the entry had expired at `now`
    ///
    /// An entry is still valid at exactly its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.is_some_and(|at| at < now)
    }

    /// Time left until expiry, or `None` if the entry never expires
    ///
    /// Negative once the entry has expired. Only [`is_expired`](Self::is_expired)
    /// decides expiry.
    pub fn expire_in(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expire_at.map(|at| at - now)
    }
}
