//! Force-restart watchdog.
//!
//! If the button stays down for the full hold threshold the device is
//! restarted unconditionally — a physical safety valve against a stuck or
//! jammed button.  The decision lives here; the worker performs the grace
//! delay and invokes the [`Restarter`](crate::ports::Restarter) port.
//!
//! The worker polls this once per loop iteration, including on queue-wait
//! timeout, so a stuck button is detected even when no new edges arrive.

/// Hold-duration monitor for the button line.
pub struct HoldWatchdog {
    threshold_us: u64,
}

impl HoldWatchdog {
    pub fn new(threshold_us: u64) -> Self {
        Self { threshold_us }
    }

    /// True once the press that started at `held_since_us` has lasted at
    /// least the threshold.
    pub fn expired(&self, held_since_us: Option<u64>, now_us: u64) -> bool {
        match held_since_us {
            Some(start) => now_us.saturating_sub(start) >= self.threshold_us,
            None => false,
        }
    }
}
