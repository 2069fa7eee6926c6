//! Asynchronous read-through wrapper

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tagstore::StoreRegistry;

use crate::binding::TagBinding;
use crate::cache::CachedFunction;
use crate::stats::CacheStats;

/// An async function wrapped with a read-through cache
///
/// The only await point is the recomputation on a miss. A hit resolves on
/// the first poll, and no lock is held while the wrapped future runs, so
/// dropping a pending call leaves the store untouched.
pub struct CachedAsync<F, K, V> {
    func: F,
    key_fn: K,
    binding: TagBinding<V>,
}

/// Wrap an async function with a read-through cache
///
/// Same arguments as [`wrap`](crate::wrap); `func` returns a future.
pub fn wrap_async<F, K, V>(
    registry: &Arc<StoreRegistry<V>>,
    func: F,
    tag: impl Into<String>,
    key_fn: K,
    ttl: Option<Duration>,
) -> CachedAsync<F, K, V> {
    CachedAsync {
        func,
        key_fn,
        binding: TagBinding::new(Arc::clone(registry), tag.into(), ttl),
    }
}

impl<F, K, V> CachedAsync<F, K, V> {
    /// Registry this wrapper reads and writes
    pub fn registry(&self) -> &Arc<StoreRegistry<V>> {
        self.binding.registry()
    }
}

impl<F, K, V: Clone> CachedAsync<F, K, V> {
    /// Call through the cache, awaiting the function only on a miss
    pub async fn call<A, Fut>(&self, args: A) -> V
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = V>,
        K: Fn(&A) -> String,
    {
        let key = (self.key_fn)(&args);
        let store = self.binding.store();

        if let Some(value) = self.binding.hit(&store, &key) {
            return value;
        }

        let value = (self.func)(args).await;
        self.binding.fill(&store, key, value.clone());
        value
    }

    /// Call a fallible async function through the cache
    ///
    /// Only `Ok` results are stored; an `Err` is returned unchanged.
    pub async fn try_call<A, E, Fut>(&self, args: A) -> Result<V, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        K: Fn(&A) -> String,
    {
        let key = (self.key_fn)(&args);
        let store = self.binding.store();

        if let Some(value) = self.binding.hit(&store, &key) {
            return Ok(value);
        }

        match (self.func)(args).await {
            Ok(value) => {
                self.binding.fill(&store, key, value.clone());
                Ok(value)
            }
            Err(err) => {
                self.binding.failed(&key);
                Err(err)
            }
        }
    }
}

impl<F, K, V> CachedFunction for CachedAsync<F, K, V> {
    fn tag(&self) -> &str {
        self.binding.tag()
    }

    fn ttl(&self) -> Option<Duration> {
        self.binding.ttl()
    }

    fn stats(&self) -> &CacheStats {
        self.binding.stats()
    }

    fn purge(&self) {
        self.binding.purge();
    }
}

impl<F, K, V> fmt::Debug for CachedAsync<F, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedAsync")
            .field("tag", &self.binding.tag())
            .field("ttl", &self.binding.ttl())
            .field("hit_ratio", &self.binding.stats().hit_ratio())
            .finish_non_exhaustive()
    }
}
