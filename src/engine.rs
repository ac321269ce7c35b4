//! Cache Engine
//!
//! Thread-safe cache handle combining the entry store with its background sweeper.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == TTL Cache ==
/// In-memory key-value cache with per-entry TTL.
///
/// Every operation, reads included, runs under one exclusive lock, so each call is
/// atomic with respect to every other call and to the background sweep. Sequences
/// of calls are not.
///
/// Share between threads with `Arc<TtlCache<K, V>>`. Dropping the cache stops the
/// sweeper; `close` does the same and waits for it to finish.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_cache::TtlCache;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), ttl_cache::CacheError<&'static str>> {
/// let cache = TtlCache::new(Duration::from_secs(1))?;
/// cache.set("x", 1, Duration::from_secs(3));
/// assert_eq!(cache.get(&"x"), Some(1));
/// cache.close().await;
/// # Ok(())
/// # }
/// ```
pub struct TtlCache<K, V> {
    /// Store shared with the sweep task
    store: Arc<Mutex<CacheStore<K, V>>>,
    sweep_interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates an empty cache swept every `sweep_interval`.
    ///
    /// # Errors
    /// - `CacheError::InvalidSweepInterval` for a zero interval
    /// - `CacheError::NoRuntime` when called outside a Tokio runtime
    pub fn new(sweep_interval: Duration) -> Result<Self, K> {
        Self::with_config(CacheConfig::new().with_sweep_interval(sweep_interval))
    }

    /// Creates an empty cache from a `CacheConfig`.
    ///
    /// # Errors
    /// Same as [`TtlCache::new`].
    pub fn with_config(config: CacheConfig) -> Result<Self, K> {
        let sweep_interval = config.sweep_interval;
        if sweep_interval.is_zero() {
            return Err(CacheError::InvalidSweepInterval(sweep_interval));
        }
        Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let store = Arc::new(Mutex::new(CacheStore::new()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = spawn_sweep_task(Arc::clone(&store), sweep_interval, shutdown_rx);

        Ok(Self {
            store,
            sweep_interval,
            shutdown_tx,
            sweeper: Some(sweeper),
        })
    }

    // == Mutations ==
    /// Inserts or overwrites the entry for `key`, expiring after `ttl`.
    ///
    /// A zero TTL stores an entry that is already expired.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        self.store.lock().set(key, value, ttl);
    }

    /// Inserts only if `key` has no live entry.
    ///
    /// # Errors
    /// `CacheError::AlreadyExists` with the key if a live entry is present.
    pub fn add(&self, key: K, value: V, ttl: Duration) -> Result<(), K> {
        self.store.lock().add(key, value, ttl)
    }

    /// Updates only if `key` has a live entry, resetting its TTL.
    ///
    /// # Errors
    /// `CacheError::NotFound` if absent, `CacheError::Expired` if the entry was
    /// expired (it is removed as a side effect).
    pub fn replace(&self, key: K, value: V, ttl: Duration) -> Result<(), K> {
        self.store.lock().replace(key, value, ttl)
    }

    /// Removes the entry for `key` and returns its value if it was live.
    pub fn pop<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().pop(key)
    }

    /// Deletes the entry for `key`. No-op if absent.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().remove(key);
    }

    /// Purges every entry expired at call time and returns how many were removed.
    pub fn remove_expired(&self) -> usize {
        self.store.lock().remove_expired()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    // == Reads ==
    /// Returns a copy of the live value for `key`.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.store.lock().get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().contains_key(key)
    }

    /// Remaining lifetime of the live entry for `key`.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().ttl_remaining(key)
    }

    /// Number of entries physically held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    // == Shutdown ==
    /// Stops the background sweeper and waits for it to exit.
    pub async fn close(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(sweeper) = self.sweeper.take() {
            if let Err(err) = sweeper.await {
                warn!(%err, "TTL sweep task ended abnormally");
            }
        }
    }
}

impl<K, V> Drop for TtlCache<K, V> {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}
