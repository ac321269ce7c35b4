//! Cache Store Module
//!
//! Main cache engine core: HashMap storage with TTL expiration and existence semantics.
//! The store itself is not synchronized; `TtlCache` wraps it in a single lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Key-value storage where every entry carries an absolute expiry.
///
/// Expired entries are never returned by reads. They stay physically present
/// until an operation touches their key or `remove_expired` runs.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Usage statistics
    stats: CacheStats,
}

impl<K, V> Default for CacheStore<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates a new, empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a key-value pair living for `ttl`.
    ///
    /// Any previous entry for the key, live or expired, is overwritten.
    pub fn set(&mut self, key: K, value: V, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    // == Add ==
    /// Stores a key-value pair only if no live entry holds the key.
    ///
    /// An expired entry is dropped first and the insert proceeds.
    ///
    /// # Errors
    /// `CacheError::AlreadyExists` if a live entry occupies the key.
    pub fn add(&mut self, key: K, value: V, ttl: Duration) -> Result<(), K> {
        match self.entries.get(&key).map(CacheEntry::is_expired) {
            Some(false) => return Err(CacheError::AlreadyExists(key)),
            Some(true) => self.evict_expired(&key),
            None => {}
        }

        self.set(key, value, ttl);
        Ok(())
    }

    // == Replace ==
    /// Overwrites the value and expiry of a live entry.
    ///
    /// # Errors
    /// - `CacheError::NotFound` if no entry holds the key
    /// - `CacheError::Expired` if the entry had expired; it is removed and nothing is written
    pub fn replace(&mut self, key: K, value: V, ttl: Duration) -> Result<(), K> {
        match self.entries.get(&key).map(CacheEntry::is_expired) {
            None => Err(CacheError::NotFound(key)),
            Some(true) => {
                self.evict_expired(&key);
                Err(CacheError::Expired(key))
            }
            Some(false) => {
                self.set(key, value, ttl);
                Ok(())
            }
        }
    }

    // == Get ==
    /// Returns a copy of the live value for `key`.
    ///
    /// An expired entry is removed and reported as absent. The TTL is never refreshed.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.evict_expired(key);
        }
        self.stats.record_miss();
        None
    }

    // == Pop ==
    /// Removes the entry for `key` and returns its value if it was live.
    ///
    /// The key is absent afterwards whatever the outcome.
    pub fn pop<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.remove(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value)
            }
            Some(_) => {
                trace!("popped an expired entry");
                self.stats.record_expirations(1);
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Deletes the entry for `key`, if any.
    pub fn remove<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key);
    }

    // == Remove Expired ==
    /// Removes all entries expired at call time.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        removed
    }

    // == Clear ==
    /// Removes every entry regardless of liveness.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Contains Key ==
    /// Returns true if a live entry holds `key`. Never mutates the store.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == TTL Remaining ==
    /// Returns the remaining lifetime of a live entry.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of entries physically held, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_expired<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.entries.remove(key).is_some() {
            trace!("removed expired entry on access");
            self.stats.record_expirations(1);
        }
    }
}
