//! # tagstore
//!
//! In-process key-value storage for the tagcache result cache.
//!
//! ## Architecture
//! - **Tags**: every tag owns an isolated [`TagStore`]; keys never collide across tags
//! - **Entries**: immutable [`CacheEntry`] records with an optional absolute expiry
//! - **Lazy expiry**: an expired entry is evicted by the lookup that discovers it, never by a sweeper
//! - **Registry**: [`StoreRegistry`] creates stores on first use and drops them on purge
//! - **Clock**: time is read through [`Clock`], so tests can drive expiry with [`ManualClock`]

#![warn(missing_docs)]

mod clock;
mod entry;
mod error;
mod registry;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use error::{Error, Result};
pub use registry::StoreRegistry;
pub use store::TagStore;
