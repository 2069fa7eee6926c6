//! # tagcache
//!
//! Read-through result cache for plain and async functions.
//!
//! ## Architecture
//! - **Storage**: results live in a [`tagstore::StoreRegistry`], one isolated store per tag
//! - **Keys**: the caller always supplies the key function; arguments are never hashed implicitly
//! - **Expiry**: optional TTL per wrapper, checked lazily when an entry is read
//! - **Sync/async**: [`wrap`] and [`wrap_async`] pick the code path at wrap time
//! - **Failures**: `try_call` caches `Ok` only; errors pass through untouched
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use tagcache::{wrap, CachedFunction, StoreRegistry};
//!
//! let registry: Arc<StoreRegistry<u64>> = Arc::new(StoreRegistry::new());
//! let square = wrap(&registry, |n: u64| n * n, "square", |n: &u64| n.to_string(), None);
//!
//! assert_eq!(square.call(12), 144);
//! assert_eq!(square.call(12), 144);
//! assert_eq!(square.stats().hits(), 1);
//!
//! square.purge();
//! assert!(registry.get_store("square").is_empty());
//! ```

#![warn(missing_docs)]

mod async_cache;
mod binding;
mod cache;
mod config;
mod stats;

pub use async_cache::{wrap_async, CachedAsync};
pub use cache::{wrap, Cached, CachedFunction};
pub use config::CacheConfig;
pub use stats::CacheStats;

pub use tagstore::{CacheEntry, Clock, ManualClock, StoreRegistry, SystemClock, TagStore};
