//! TTL Policy Module
//!
//! The cache-wide default expiry policy and the single eviction predicate
//! shared by every operation that must decide whether an entry is still
//! visible.

use std::time::{Duration, Instant};

use crate::cache::CacheEntry;

// == TTL Mode ==
/// Default time-to-live policy of a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TtlMode {
    /// Plain inserts store no expiry; entries only expire when inserted
    /// with an explicit per-entry TTL.
    #[default]
    NoDefault,
    /// Every plain insert expires this long after insertion.
    Fixed(Duration),
    /// Expiry checking is switched off entirely. Entries never expire,
    /// explicit per-entry TTLs included.
    Disabled,
}

impl TtlMode {
    // == Eviction Predicate ==
    /// Returns true if the entry is expired under this policy.
    ///
    /// This is the only place eviction is decided; lookups, counting and
    /// the background sweep all go through it.
    pub(crate) fn is_evicted<V>(&self, entry: &CacheEntry<V>) -> bool {
        if matches!(self, TtlMode::Disabled) {
            return false;
        }
        match entry.expires_at {
            // entry has no expiry set
            None => false,
            Some(expires_at) => expires_at < Instant::now(),
        }
    }

    // == Default Expiry ==
    /// The expiry a plain insert receives at `now`, if any.
    pub(crate) fn default_expiry(&self, now: Instant) -> Option<Instant> {
        match self {
            TtlMode::Fixed(ttl) => Some(now + *ttl),
            TtlMode::NoDefault | TtlMode::Disabled => None,
        }
    }
}
