//! Cache Handle Module
//!
//! The public face of the cache: owns the locked store, the deferred-
//! deletion queue and whatever background tasks the options asked for.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::store::{Lookup, Store};
use crate::cache::{CacheOptions, TtlMode, DELETION_QUEUE_CAPACITY};
use crate::tasks;

// == Sweeper ==
/// The periodic sweep task together with its shutdown signal.
struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

// == Cache ==
/// A thread-safe key/value cache with TTL expiration.
///
/// Entries past their expiry are hidden from [`get`](Cache::get),
/// [`has`](Cache::has) and [`count`](Cache::count) immediately, but their
/// slots are reclaimed asynchronously: the access that notices an expired
/// entry queues its key, and a background consumer removes it under the
/// write lock after re-checking that it is still expired. An overwrite can
/// therefore revive a key between detection and deletion without losing
/// the new value.
///
/// The cache is shared across tasks behind an [`Arc`]; all methods take
/// `&self`. Call [`close`](Cache::close) on the owning handle to release
/// the background tasks; a dropped cache aborts them instead.
///
/// Values are returned by clone. Store an `Arc<T>` as the value type when
/// cloning is too expensive.
pub struct Cache<K, V> {
    /// Entry map, shared with the background tasks
    store: Arc<RwLock<Store<K, V>>>,
    /// Producer side of the deferred-deletion queue
    deletions: mpsc::Sender<K>,
    /// Deferred-deletion consumer, present when a default TTL is set
    reaper: Option<JoinHandle<()>>,
    /// Periodic sweep, present when auto deletion was requested
    sweeper: Option<Sweeper>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and spawns the background tasks its options call
    /// for. Must be called from within a Tokio runtime.
    ///
    /// With default options the cache behaves as a plain map: nothing
    /// expires spontaneously, while explicit per-entry TTLs still apply
    /// and are checked lazily on access.
    ///
    /// # Panics
    /// Panics if auto deletion was requested with a zero period.
    pub fn new(options: CacheOptions) -> Self {
        let ttl = options.ttl();
        let store = Arc::new(RwLock::new(Store::new(ttl)));
        let (deletions, queue) = mpsc::channel(DELETION_QUEUE_CAPACITY);

        // Without a default TTL no consumer runs; queued deletions are then
        // dropped on the floor, which only delays reclamation.
        let reaper = if matches!(ttl, TtlMode::Fixed(_)) {
            Some(tasks::spawn_reaper_task(Arc::clone(&store), queue))
        } else {
            None
        };

        let sweeper = options.sweep_every().map(|every| {
            let (shutdown, signal) = watch::channel(false);
            let handle =
                tasks::spawn_sweep_task(Arc::clone(&store), deletions.clone(), every, signal);
            Sweeper { shutdown, handle }
        });

        Self {
            store,
            deletions,
            reaper,
            sweeper,
        }
    }

    // == Add ==
    /// Inserts a value under the cache's default TTL policy, silently
    /// overwriting any previous entry for the key.
    pub async fn add(&self, key: K, value: V) {
        self.store.write().await.insert(key, value);
    }

    // == Add With TTL ==
    /// Inserts a value expiring `ttl` from now, regardless of the default
    /// policy. Silently overwrites any previous entry for the key.
    ///
    /// Under [`CacheOptions::with_no_ttl`] the stored expiry is inert: the
    /// entry never becomes invisible.
    pub async fn add_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.store.write().await.insert_with_ttl(key, value, ttl);
    }

    // == Get ==
    /// Returns a clone of the value for `key`, or `None` if the key is
    /// absent or expired.
    ///
    /// An expired entry is queued for deferred deletion and never returned.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let store = self.store.read().await;
        match store.lookup(key) {
            Lookup::Hit(value) => Some(value.clone()),
            Lookup::Expired(stored_key) => {
                self.queue_deletion(stored_key.clone());
                None
            }
            Lookup::Miss => None,
        }
    }

    // == Has ==
    /// Returns whether a live value exists for `key`, with the same
    /// hide-and-queue treatment of expired entries as [`get`](Cache::get),
    /// minus the value clone.
    pub async fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let store = self.store.read().await;
        match store.lookup(key) {
            Lookup::Hit(_) => true,
            Lookup::Expired(stored_key) => {
                self.queue_deletion(stored_key.clone());
                false
            }
            Lookup::Miss => false,
        }
    }

    // == Delete ==
    /// Removes an entry immediately; no-op if the key is absent.
    pub async fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.write().await.remove(key);
    }

    // == Count ==
    /// Number of live entries. Expired slots awaiting reclamation are
    /// excluded; counting queues no deletions.
    pub async fn count(&self) -> usize {
        self.store.read().await.count()
    }

    /// Whether the cache holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.count().await == 0
    }

    // == Raw Length ==
    /// Number of occupied slots, including expired entries whose deferred
    /// deletion has not run yet. Mostly useful to observe reclamation in
    /// tests and diagnostics.
    pub async fn len_raw(&self) -> usize {
        self.store.read().await.len_raw()
    }

    // == Purge ==
    /// Drops every entry, live or expired. Deletions already queued become
    /// harmless no-ops.
    pub async fn purge(&self) {
        self.store.write().await.clear();
    }

    // == Delete Evicted ==
    /// Scans the whole store under the read lock and queues every expired
    /// entry for deletion. The periodic sweep runs exactly this.
    pub async fn delete_evicted(&self) {
        tasks::queue_evicted(&self.store, &self.deletions).await;
    }

    // == Stop ==
    /// Signals the periodic sweep to exit. Safe to call repeatedly, and a
    /// no-op when no sweep was configured. The deferred-deletion consumer
    /// keeps running until [`close`](Cache::close).
    pub fn stop(&self) {
        if let Some(sweeper) = &self.sweeper {
            // the sweep may already be gone; stopping twice is fine
            let _ = sweeper.shutdown.send(true);
        }
    }

    // == Close ==
    /// Tears the cache down: stops the sweep, closes the deletion queue
    /// and waits for both background tasks to finish. Once `close`
    /// returns, no further tick or deletion will run.
    ///
    /// Taking `self` by value makes use after close unrepresentable.
    pub async fn close(mut self) {
        self.stop();

        let sweeper = self.sweeper.take();
        let reaper = self.reaper.take();

        // The sweep holds a queue producer, so it must exit before the
        // queue can close.
        if let Some(sweeper) = sweeper {
            let _ = sweeper.handle.await;
        }

        // Dropping the handle drops the last producer; the consumer drains
        // what is left and exits.
        drop(self);
        if let Some(reaper) = reaper {
            let _ = reaper.await;
        }
    }

    // == Queue Deletion ==
    /// Best-effort enqueue of an expired key. A full or closed queue drops
    /// the signal; the entry stays hidden and gets queued again by the
    /// next access or sweep.
    fn queue_deletion(&self, key: K) {
        if let Err(err) = self.deletions.try_send(key) {
            debug!("deletion signal dropped: {}", err);
        }
    }
}

impl<K, V> Drop for Cache<K, V> {
    /// A cache dropped without [`close`](Cache::close) aborts its
    /// background tasks so they cannot outlive the handle.
    fn drop(&mut self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.handle.abort();
        }
        if let Some(reaper) = &self.reaper {
            reaper.abort();
        }
    }
}
