//! Cache Options Module
//!
//! Construction-time tunables for [`Cache`](crate::cache::Cache). The
//! defaults give a plain map: no default TTL, no background sweep.

use std::time::Duration;

use crate::cache::TtlMode;

// == Cache Options ==
/// Options consumed by [`Cache::new`](crate::cache::Cache::new).
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use ttlcache::CacheOptions;
///
/// let options = CacheOptions::new()
///     .with_ttl(Duration::from_secs(30))
///     .with_auto_deletion(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Default expiry policy
    ttl: TtlMode,
    /// Period of the background eviction sweep, None = no sweep
    sweep_every: Option<Duration>,
}

impl CacheOptions {
    /// Creates options with no default TTL and no background sweep.
    pub fn new() -> Self {
        Self::default()
    }

    // == With TTL ==
    /// Sets the default time-to-live applied by plain `add` calls.
    ///
    /// A non-zero `ttl` also enables the deferred-deletion consumer task so
    /// that expired entries detected on reads are physically reclaimed. A
    /// zero `ttl` leaves entries without a default expiry; explicit
    /// per-entry TTLs still apply.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = if ttl.is_zero() {
            TtlMode::NoDefault
        } else {
            TtlMode::Fixed(ttl)
        };
        self
    }

    // == With No TTL ==
    /// Disables expiry checking entirely.
    ///
    /// Entries never expire, even when inserted with an explicit TTL.
    pub fn with_no_ttl(mut self) -> Self {
        self.ttl = TtlMode::Disabled;
        self
    }

    // == With Auto Deletion ==
    /// Enables a periodic background sweep that queues every expired entry
    /// for deletion, independent of access patterns.
    ///
    /// # Panics
    /// `Cache::new` panics if `every` is zero.
    pub fn with_auto_deletion(mut self, every: Duration) -> Self {
        self.sweep_every = Some(every);
        self
    }

    pub(crate) fn ttl(&self) -> TtlMode {
        self.ttl
    }

    pub(crate) fn sweep_every(&self) -> Option<Duration> {
        self.sweep_every
    }
}
