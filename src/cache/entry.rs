//! Cache Entry Module
//!
//! Defines the slot stored for each key: the value plus its expiry instant.

use std::time::Instant;

// == Cache Entry ==
/// A single stored value with an optional absolute expiry.
///
/// `expires_at == None` means the entry never expires on its own.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    /// The stored value
    pub(crate) value: V,
    /// Absolute expiry instant, None = no expiration
    pub(crate) expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(value: V, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }
}
