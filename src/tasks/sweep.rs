//! Eviction Sweep Task
//!
//! Background task that periodically scans the whole store and queues
//! every expired entry for deferred deletion, so entries that are never
//! read again still get reclaimed.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::store::Store;

/// Spawns the periodic eviction sweep.
///
/// Each tick runs [`queue_evicted`]; the task exits when the shutdown
/// signal fires. The first tick lands one full period after the task
/// starts.
///
/// # Panics
/// Panics if `every` is zero.
pub(crate) fn spawn_sweep_task<K, V>(
    store: Arc<RwLock<Store<K, V>>>,
    deletions: mpsc::Sender<K>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("eviction sweep started, sweeping every {:?}", every);

        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    let queued = queue_evicted(&store, &deletions).await;
                    if queued > 0 {
                        info!("sweep queued {} expired entries for deletion", queued);
                    } else {
                        debug!("sweep found no expired entries");
                    }
                }
            }
        }

        debug!("eviction sweep stopped");
    })
}

/// Collects the keys of every expired entry under the read lock, then
/// queues them for deletion with the lock released.
///
/// Enqueueing is best-effort: keys rejected by a full or closed queue are
/// simply picked up again by a later sweep or access. Returns the number
/// of keys queued.
pub(crate) async fn queue_evicted<K, V>(
    store: &RwLock<Store<K, V>>,
    deletions: &mpsc::Sender<K>,
) -> usize
where
    K: Hash + Eq + Clone,
{
    let expired = store.read().await.evicted_keys();

    let mut queued = 0;
    for key in expired {
        if deletions.try_send(key).is_ok() {
            queued += 1;
        }
    }
    queued
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlMode;
    use tokio::time::{sleep, timeout};

    fn shared_store() -> Arc<RwLock<Store<String, u32>>> {
        Arc::new(RwLock::new(Store::new(TtlMode::NoDefault)))
    }

    #[tokio::test]
    async fn test_queue_evicted_queues_only_expired_keys() {
        let store = shared_store();
        {
            let mut store = store.write().await;
            store.insert("kept".to_string(), 1);
            store.insert_with_ttl("gone".to_string(), 2, Duration::ZERO);
        }
        sleep(Duration::from_millis(5)).await;

        let (tx, mut rx) = mpsc::channel(16);
        let queued = queue_evicted(&store, &tx).await;

        assert_eq!(queued, 1);
        assert_eq!(rx.try_recv().unwrap(), "gone");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_queue_evicted_survives_full_queue() {
        let store = shared_store();
        {
            let mut store = store.write().await;
            store.insert_with_ttl("a".to_string(), 1, Duration::ZERO);
            store.insert_with_ttl("b".to_string(), 2, Duration::ZERO);
            store.insert_with_ttl("c".to_string(), 3, Duration::ZERO);
        }
        sleep(Duration::from_millis(5)).await;

        let (tx, mut rx) = mpsc::channel(1);
        let queued = queue_evicted(&store, &tx).await;

        // one signal fits, the rest are dropped without blocking
        assert_eq!(queued, 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sweep_task_queues_expired_entries() {
        let store = shared_store();
        {
            let mut store = store.write().await;
            store.insert("kept".to_string(), 1);
            store.insert_with_ttl("gone".to_string(), 2, Duration::from_millis(5));
        }

        let (tx, mut rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_sweep_task(
            Arc::clone(&store),
            tx,
            Duration::from_millis(30),
            shutdown_rx,
        );

        sleep(Duration::from_millis(45)).await;

        // only the expired key may ever be queued, possibly more than once
        let first = rx.try_recv().expect("expired key should be queued");
        assert_eq!(first, "gone");
        while let Ok(key) = rx.try_recv() {
            assert_eq!(key, "gone");
        }

        shutdown_tx.send(true).unwrap();
        timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep should stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweep_task_stops_on_shutdown_signal() {
        let store = shared_store();
        let (tx, _rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = spawn_sweep_task(store, tx, Duration::from_millis(10), shutdown_rx);
        shutdown_tx.send(true).unwrap();

        timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep should exit promptly after shutdown")
            .unwrap();
    }
}
