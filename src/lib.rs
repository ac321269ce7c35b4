//! TTL Cache - An embeddable in-memory key-value cache
//!
//! Provides a generic, thread-safe store with per-entry TTL expiration,
//! lazy removal on access and a background sweeper.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod tasks;

pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use engine::TtlCache;
pub use error::{CacheError, Result};
