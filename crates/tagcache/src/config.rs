//! Wrapper configuration

use std::sync::Arc;
use std::time::Duration;

use tagstore::StoreRegistry;

use crate::async_cache::{wrap_async, CachedAsync};
use crate::cache::{wrap, Cached};

/// Tag and TTL for a cached function
///
/// A builder-style alternative to calling [`wrap`] / [`wrap_async`] with
/// positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Namespace the results are stored under
    pub tag: String,

    /// Lifetime of each result; `None` caches forever
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    /// Config for `tag` with no expiry
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ttl: None,
        }
    }

    /// Set the TTL; zero means no expiry
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Set the TTL in whole seconds; zero means no expiry
    pub fn with_ttl_secs(self, secs: u64) -> Self {
        self.with_ttl(Duration::from_secs(secs))
    }

    /// Wrap a synchronous function with this config
    pub fn wrap<F, K, V>(
        self,
        registry: &Arc<StoreRegistry<V>>,
        func: F,
        key_fn: K,
    ) -> Cached<F, K, V> {
        wrap(registry, func, self.tag, key_fn, self.ttl)
    }

    /// Wrap an async function with this config
    pub fn wrap_async<F, K, V>(
        self,
        registry: &Arc<StoreRegistry<V>>,
        func: F,
        key_fn: K,
    ) -> CachedAsync<F, K, V> {
        wrap_async(registry, func, self.tag, key_fn, self.ttl)
    }
}
