//! User-idle clock.
//!
//! A single atomic timestamp of the most recent accepted input event.
//! The worker touches it on every classified event; external callers may
//! reset it (e.g. after activity observed on another interface) and query
//! elapsed idle time for power-management policy.
//!
//! Reads and writes are single-word atomics, so an external reset racing
//! the worker's own update resolves to one of the two values, never a
//! torn mix.

use core::sync::atomic::{AtomicU64, Ordering};

pub struct IdleClock {
    last_activity_us: AtomicU64,
}

impl IdleClock {
    pub const fn new() -> Self {
        Self {
            last_activity_us: AtomicU64::new(0),
        }
    }

    /// Record activity at `now_us`.
    pub fn touch(&self, now_us: u64) {
        self.last_activity_us.store(now_us, Ordering::Relaxed);
    }

    /// Milliseconds with no recorded activity, saturating at `u32::MAX`.
    pub fn idle_ms(&self, now_us: u64) -> u32 {
        let idle_us = now_us.saturating_sub(self.last_activity_us.load(Ordering::Relaxed));
        (idle_us / 1_000).min(u64::from(u32::MAX)) as u32
    }
}

impl Default for IdleClock {
    fn default() -> Self {
        Self::new()
    }
}
