//! Timing parameters for the input subsystem.
//!
//! All values have hardware-derived defaults; they are compiled in rather
//! than persisted (the input core keeps no state across restarts).

use serde::{Deserialize, Serialize};

/// Input subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Software debounce window per line (microseconds).
    pub debounce_window_us: u64,
    /// Continuous button hold that forces a device restart (microseconds).
    pub force_restart_hold_us: u64,
    /// Worker queue-wait slice (milliseconds).  Bounds watchdog latency
    /// when no edges arrive.
    pub queue_wait_ms: u32,
    /// Grace delay before the forced restart, so pending log output can
    /// flush (milliseconds).
    pub restart_grace_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            // 2 ms rejects contact bounce on both the button and the
            // encoder detent switches without eating real detents.
            debounce_window_us: 2_000,
            // 15 s — the physical safety valve against a jammed button.
            force_restart_hold_us: 15_000_000,
            queue_wait_ms: 100,
            restart_grace_ms: 100,
        }
    }
}
