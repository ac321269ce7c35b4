//! Cache Module
//!
//! Provides the unsynchronized entry store with TTL expiration and its statistics.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, MAX_TTL};
pub use stats::CacheStats;
pub use store::CacheStore;
