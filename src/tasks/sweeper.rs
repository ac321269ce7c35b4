//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// Every `interval` the task locks the store and calls `remove_expired`. The first
/// sweep happens one full interval after the spawn.
///
/// The task stops when `true` is sent on the shutdown channel or when its sender
/// is dropped.
///
/// # Arguments
/// * `store` - Shared reference to the cache store
/// * `interval` - Time between sweeps, must be non-zero
/// * `shutdown_rx` - Receiving half of the stop signal
///
/// # Panics
/// Must be called from within a Tokio runtime.
pub fn spawn_sweep_task<K, V>(
    store: Arc<Mutex<CacheStore<K, V>>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "Starting TTL sweep task");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.lock().remove_expired();
                    debug!(removed, "TTL sweep complete");
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("TTL sweep task stopped");
    })
}
