//! Port traits — the hexagonal boundary between the input core and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ InputSubsystem (domain)
//! ```
//!
//! Driven adapters (GPIO, monotonic timer, restart, NVS) implement these
//! traits.  The [`InputSubsystem`](crate::input::subsystem::InputSubsystem)
//! consumes them via generics, so the decode core never touches hardware
//! directly and the whole pipeline runs under test with mock adapters.

use crate::error::{Result, StorageError};
use crate::events::Line;

// ───────────────────────────────────────────────────────────────
// Monotonic clock
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock.  Immune to wall-clock adjustment and to
/// wraparound at the scale of normal device uptime (u64 microseconds wrap
/// after ~584,000 years).
///
/// Implementations must be cheap: the worker queries this once per
/// dequeued edge and once per watchdog poll.
pub trait Clock: Clone + Send + 'static {
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1_000
    }
}

// ───────────────────────────────────────────────────────────────
// Input lines (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Configuration and level access for the five monitored lines.
///
/// Interrupt handlers registered by `arm()` must do minimal work: read the
/// line level and push into the capture queue.  No timing calls, no
/// logging, no blocking, no allocation.
pub trait InputLines {
    /// Configure all lines as inputs with pull-ups, interrupts disabled.
    fn configure(&mut self) -> Result<()>;

    /// Register any-edge interrupt handlers and enable interrupts.
    /// Must only be called after a successful [`configure`](Self::configure).
    fn arm(&mut self) -> Result<()>;

    /// Read the current level of a line (0 = low, 1 = high).
    fn read(&self, line: Line) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Forced restart (driven adapter: domain → platform)
// ───────────────────────────────────────────────────────────────

/// Unconditional, irreversible device restart.
///
/// On the target this wraps `esp_restart()` and never returns; mock
/// implementations record the call so the worker loop can observe it and
/// exit.  This is the only path in the input core that terminates the
/// process, and it is a deliberate safety action, not an error.
pub trait Restarter: Send + Sync + 'static {
    fn restart(&self);
}

// ───────────────────────────────────────────────────────────────
// Persistent key-value storage (identity collaborator only)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.  The input core does not consume this;
/// it exists for the device-identity collaborator.
///
/// Write operations must be atomic — no partial writes on power loss.
/// The ESP-IDF NVS API guarantees this natively; the in-memory simulation
/// achieves it trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> core::result::Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> core::result::Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> core::result::Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}
