//! Error types for tagstore

use thiserror::Error;

/// Result type alias for tagstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Key is absent from the tag, or its entry had expired and was just evicted
    #[error("Key not found: tag {tag}, key {key}")]
    KeyNotFound {
        /// Tag that was searched
        tag: String,
        /// Key that missed
        key: String,
    },
}

impl Error {
    /// Whether this error is a cache miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }
}
