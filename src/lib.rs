//! A thread-safe, generic in-memory cache with time-to-live expiration.
//!
//! Expired entries are hidden lazily on access and reclaimed asynchronously
//! through a deferred-deletion queue; an optional background sweep reclaims
//! entries that are never accessed again.
//!
//! # Example
//! ```
//! use std::time::Duration;
//!
//! use ttlcache::{Cache, CacheOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = Cache::new(CacheOptions::new().with_ttl(Duration::from_secs(30)));
//!
//!     cache.add("session".to_string(), "alive".to_string()).await;
//!     assert_eq!(cache.get("session").await, Some("alive".to_string()));
//!
//!     cache.close().await;
//! }
//! ```

pub mod cache;

mod tasks;

pub use cache::{Cache, CacheOptions, TtlMode};
