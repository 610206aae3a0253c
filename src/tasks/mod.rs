//! Background Tasks Module
//!
//! Tasks spawned by the cache to do its asynchronous housekeeping.
//!
//! # Tasks
//! - Reaper: consumes the deferred-deletion queue and reclaims entries
//!   that are still expired when their turn comes
//! - Sweep: periodically queues every expired entry, independent of
//!   access patterns

mod reaper;
mod sweep;

pub(crate) use reaper::spawn_reaper_task;
pub(crate) use sweep::{queue_evicted, spawn_sweep_task};
