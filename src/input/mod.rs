//! The input core: raw line transitions in, typed events out.
//!
//! ```text
//! hardware edge ─▶ ISR (line id + level, no timing calls)
//!                   │
//!                   ▼
//!            capture queue (bounded, lock-free, drop-on-full)
//!                   │
//!                   ▼
//!         worker: timestamp ─▶ debounce ─▶ button / quadrature
//!                   │                            │
//!                   ▼                            ▼
//!            watchdog poll              idle clock + dispatcher
//! ```
//!
//! Everything below the capture queue runs in a single background
//! context that owns all mutable decode state — no locking, single
//! writer.  The watchdog is polled once per loop iteration whether or
//! not edges arrived.

pub mod button;
pub mod capture;
pub mod debounce;
pub mod idle;
pub mod pipeline;
pub mod quadrature;
pub mod subsystem;
pub mod watchdog;

pub use capture::{CaptureQueue, RawEdge, CAPTURE_QUEUE, CAPTURE_QUEUE_CAP};
pub use pipeline::InputPipeline;
pub use subsystem::InputSubsystem;
