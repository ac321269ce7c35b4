//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Key-related variants hand the offending key back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError<K> {
    /// A live entry already occupies the key
    #[error("Key already exists: {0:?}")]
    AlreadyExists(K),

    /// No entry occupies the key
    #[error("Key not found: {0:?}")]
    NotFound(K),

    /// The entry occupying the key had expired and was removed
    #[error("Key expired: {0:?}")]
    Expired(K),

    /// Sweep interval must be strictly positive
    #[error("Invalid sweep interval: {0:?}")]
    InvalidSweepInterval(Duration),

    /// The background sweeper needs a Tokio runtime
    #[error("No Tokio runtime available to run the background sweeper")]
    NoRuntime,
}

impl<K> CacheError<K> {
    /// Returns the key named by this error, if any.
    pub fn key(&self) -> Option<&K> {
        match self {
            CacheError::AlreadyExists(key)
            | CacheError::NotFound(key)
            | CacheError::Expired(key) => Some(key),
            CacheError::InvalidSweepInterval(_) | CacheError::NoRuntime => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T, K> = std::result::Result<T, CacheError<K>>;
