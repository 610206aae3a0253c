//! Deferred-Deletion Consumer Task
//!
//! A single long-lived task drains the deletion queue and physically
//! removes expired entries. Detection happens elsewhere under the cheap
//! read lock; only this task takes the write lock to reclaim slots, so
//! the hot read path never upgrades a lock.

use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::store::Store;

/// Spawns the deferred-deletion consumer.
///
/// For every queued key the entry is re-fetched under the write lock and
/// removed only if it is still expired. A key overwritten with a fresh
/// value after being queued is left alone, so a revived entry can never
/// be destroyed by a stale deletion signal. Duplicate signals for the
/// same key collapse into no-ops the same way.
///
/// The task exits once every queue producer is gone and the remaining
/// signals are drained.
pub(crate) fn spawn_reaper_task<K, V>(
    store: Arc<RwLock<Store<K, V>>>,
    mut deletions: mpsc::Receiver<K>,
) -> JoinHandle<()>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!("deletion queue consumer started");

        while let Some(key) = deletions.recv().await {
            let removed = store.write().await.remove_if_evicted(&key);
            if removed {
                debug!("reclaimed one expired entry");
            }
        }

        debug!("deletion queue closed, consumer exiting");
    })
}
