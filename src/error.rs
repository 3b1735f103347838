//! Unified error types for the Cosmo Pager firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! composition root's error handling uniform.  All variants are `Copy` so
//! they can be passed around without allocation.
//!
//! Per-edge processing errors deliberately do not exist: interrupt-sourced
//! noise is reclassified as "no event" and dropped, never surfaced, so that
//! a bouncing contact can never stall or crash the pipeline.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Queue or worker creation failed at initialisation.  Fatal to the
    /// input subsystem — the device must not proceed to arm interrupts.
    ResourceExhausted(&'static str),
    /// Line configuration rejected by the platform.  Propagated.
    HardwareConfig(&'static str),
    /// Lifecycle operation out of order (e.g. `start()` before `initialize()`).
    NotInitialized,
    /// Persistent storage operation failed (identity collaborator only).
    Storage(StorageError),
    /// Device identity value rejected (name length, number range).
    Identity(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceExhausted(what) => write!(f, "resource exhausted: {what}"),
            Self::HardwareConfig(msg) => write!(f, "hardware config: {msg}"),
            Self::NotInitialized => write!(f, "not initialized"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Identity(msg) => write!(f, "identity: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
