//! Cache Store Module
//!
//! The synchronous core of the cache: the entry map plus the TTL policy.
//! All concurrency lives a layer above, where the store sits behind a
//! reader/writer lock shared between the public handle and the background
//! tasks.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, TtlMode};

// == Lookup Outcome ==
/// Result of probing the store for a key.
///
/// An expired entry reports the stored key so the caller can queue it for
/// deferred deletion without owning a key of type `K` itself.
pub(crate) enum Lookup<'a, K, V> {
    /// Key present and live
    Hit(&'a V),
    /// Key present but expired; hidden from the caller
    Expired(&'a K),
    /// Key absent
    Miss,
}

// == Cache Store ==
/// Entry map with TTL bookkeeping.
///
/// A key in the map is either live or expired-but-not-yet-reclaimed. The
/// store never hands out an expired value; physical removal happens later
/// through [`remove_if_evicted`](Store::remove_if_evicted).
#[derive(Debug)]
pub(crate) struct Store<K, V> {
    /// Key-value storage, unique owner of all entries
    entries: HashMap<K, CacheEntry<V>>,
    /// Default expiry policy, fixed at construction
    ttl: TtlMode,
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq,
{
    pub(crate) fn new(ttl: TtlMode) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    // == Insert ==
    /// Inserts or silently overwrites an entry, applying the default TTL.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        let expires_at = self.ttl.default_expiry(Instant::now());
        self.entries.insert(key, CacheEntry::new(value, expires_at));
    }

    // == Insert With TTL ==
    /// Inserts or silently overwrites an entry with an explicit TTL,
    /// independent of the default policy.
    pub(crate) fn insert_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        let expires_at = Some(Instant::now() + ttl);
        self.entries.insert(key, CacheEntry::new(value, expires_at));
    }

    // == Lookup ==
    /// Probes for a key, classifying the slot as live, expired or absent.
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Lookup<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get_key_value(key) {
            None => Lookup::Miss,
            Some((stored_key, entry)) if self.ttl.is_evicted(entry) => Lookup::Expired(stored_key),
            Some((_, entry)) => Lookup::Hit(&entry.value),
        }
    }

    // == Remove ==
    /// Unconditionally removes an entry; no-op if the key is absent.
    pub(crate) fn remove<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key);
    }

    // == Remove If Evicted ==
    /// Removes an entry only if it is still expired right now.
    ///
    /// This is the compare-and-delete step behind deferred deletion: a key
    /// queued for removal may have been overwritten with a fresh value in
    /// the meantime, and that revived entry must survive the stale signal.
    pub(crate) fn remove_if_evicted(&mut self, key: &K) -> bool {
        match self.entries.get(key) {
            Some(entry) if self.ttl.is_evicted(entry) => {
                self.entries.remove(key);
                true
            }
            // absent (already deleted) or revived since it was queued
            _ => false,
        }
    }

    // == Count ==
    /// Number of live entries. Expired slots awaiting reclamation are not
    /// counted and counting triggers no deletions.
    pub(crate) fn count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| !self.ttl.is_evicted(entry))
            .count()
    }

    // == Clear ==
    /// Drops every entry, live or expired.
    pub(crate) fn clear(&mut self) {
        self.entries = HashMap::new();
    }

    // == Evicted Keys ==
    /// Keys of every currently expired entry, for the sweep path.
    pub(crate) fn evicted_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.entries
            .iter()
            .filter(|(_, entry)| self.ttl.is_evicted(entry))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Raw Length ==
    /// Number of occupied slots, expired-but-unreclaimed entries included.
    pub(crate) fn len_raw(&self) -> usize {
        self.entries.len()
    }
}
