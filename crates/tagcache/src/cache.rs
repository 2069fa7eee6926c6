//! Synchronous read-through wrapper

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tagstore::StoreRegistry;

use crate::binding::TagBinding;
use crate::stats::CacheStats;

/// Operations every cached function exposes besides being called
pub trait CachedFunction {
    /// Tag the cached results live under
    fn tag(&self) -> &str;

    /// Lifetime of newly cached results, `None` for forever
    fn ttl(&self) -> Option<Duration>;

    /// Hit/miss counters for this wrapper
    fn stats(&self) -> &CacheStats;

    /// Drop every cached entry under this wrapper's tag
    ///
    /// This clears the whole tag, including keys written by other wrappers
    /// or by [`StoreRegistry::set`] under the same tag. There is no per-key
    /// purge.
    fn purge(&self);
}

/// A synchronous function wrapped with a read-through cache
///
/// Arguments are passed as a single value; use a tuple for several.
pub struct Cached<F, K, V> {
    func: F,
    key_fn: K,
    binding: TagBinding<V>,
}

/// Wrap a synchronous function with a read-through cache
///
/// # Arguments
/// * `registry` - Registry holding the tag's store
/// * `func` - Function to memoize
/// * `tag` - Namespace for the cached results
/// * `key_fn` - Derives the cache key from the call arguments
/// * `ttl` - Lifetime of each result; `None` or zero caches forever
pub fn wrap<F, K, V>(
    registry: &Arc<StoreRegistry<V>>,
    func: F,
    tag: impl Into<String>,
    key_fn: K,
    ttl: Option<Duration>,
) -> Cached<F, K, V> {
    Cached {
        func,
        key_fn,
        binding: TagBinding::new(Arc::clone(registry), tag.into(), ttl),
    }
}

impl<F, K, V> Cached<F, K, V> {
    /// Registry this wrapper reads and writes
    pub fn registry(&self) -> &Arc<StoreRegistry<V>> {
        self.binding.registry()
    }
}

impl<F, K, V: Clone> Cached<F, K, V> {
    /// Call through the cache
    ///
    /// Returns the stored value on a hit without invoking the function.
    /// On a miss (or an expired entry) the function runs once and its
    /// result is stored.
    pub fn call<A>(&self, args: A) -> V
    where
        F: Fn(A) -> V,
        K: Fn(&A) -> String,
    {
        let key = (self.key_fn)(&args);
        let store = self.binding.store();

        if let Some(value) = self.binding.hit(&store, &key) {
            return value;
        }

        let value = (self.func)(args);
        self.binding.fill(&store, key, value.clone());
        value
    }

    /// Call a fallible function through the cache
    ///
    /// Only `Ok` results are stored. An `Err` is returned unchanged and
    /// leaves the store as the lookup left it.
    pub fn try_call<A, E>(&self, args: A) -> Result<V, E>
    where
        F: Fn(A) -> Result<V, E>,
        K: Fn(&A) -> String,
    {
        let key = (self.key_fn)(&args);
        let store = self.binding.store();

        if let Some(value) = self.binding.hit(&store, &key) {
            return Ok(value);
        }

        match (self.func)(args) {
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

impl<F, K, V> CachedFunction for Cached<F, K, V> {
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

impl<F, K, V> fmt::Debug for Cached<F, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("tag", &self.binding.tag())
            .field("ttl", &self.binding.ttl())
            .field("hit_ratio", &self.binding.stats().hit_ratio())
            .finish_non_exhaustive()
    }
}
