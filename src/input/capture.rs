//! Interrupt-to-worker capture bridge.
//!
//! Raw line transitions are produced by GPIO ISRs and consumed by the
//! input worker:
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌───────────────┐
//! │ Button ISR   │────▶│               │     │               │
//! │ Enc1 ISRs    │────▶│ Capture Queue │────▶│ Input Worker  │
//! │ Enc2 ISRs    │────▶│  (lock-free)  │     │  (consumer)   │
//! └──────────────┘     └───────────────┘     └───────────────┘
//! ```
//!
//! The ISR side does the minimum possible work: read the line level and
//! enqueue one byte.  No timestamps are taken in interrupt context — the
//! worker assigns them on dequeue, so `capture_order` (FIFO position) is
//! the only ordering information an edge carries across the boundary.
//!
//! When the queue is full the edge is dropped silently.  There is no
//! backpressure at this layer; 32 slots absorb the worst-case burst of
//! five lines under human input rates.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::events::Line;

/// Queue capacity in slots.  Power of 2 for efficient ring modulo; one
/// slot is sacrificed to distinguish full from empty.
pub const CAPTURE_QUEUE_CAP: usize = 32;

/// A raw line transition captured in interrupt context.
///
/// Consumed exactly once by the worker, which assigns the wall-clock
/// timestamp and runs debounce + classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEdge {
    pub line: Line,
    /// Line level at capture time (0 = low, 1 = high).
    pub level: u8,
}

/// Lock-free bounded FIFO between interrupt context and the worker.
///
/// Edges are packed into single bytes (`line << 1 | level`) stored in
/// atomic slots, so the queue is const-constructible and a `static`
/// instance can be handed to `extern "C"` ISR callbacks that cannot
/// capture closures.
///
/// Producer side: GPIO ISRs.  On the ESP32 these are serialized on the
/// core that took the interrupt, so there is a single producer at any
/// instant.  Consumer side: the input worker, sole reader.
pub struct CaptureQueue {
    head: AtomicU8,
    tail: AtomicU8,
    slots: [AtomicU8; CAPTURE_QUEUE_CAP],
}

/// The ISR-facing process-wide queue.  Tests construct private instances.
pub static CAPTURE_QUEUE: CaptureQueue = CaptureQueue::new();

impl CaptureQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            slots: [const { AtomicU8::new(0) }; CAPTURE_QUEUE_CAP],
        }
    }

    /// Enqueue a line transition.
    /// Safe to call from ISR context: lock-free, no allocation, no timing.
    /// Returns `false` if the queue is full (edge dropped).
    pub fn push(&self, line: Line, level: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % CAPTURE_QUEUE_CAP as u8;

        if next_head == tail {
            return false; // Queue full — drop edge.
        }

        self.slots[head as usize].store(pack(line, level), Ordering::Relaxed);
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Dequeue the oldest edge.  Called only from the worker (single
    /// consumer).  Returns `None` if the queue is empty.
    pub fn pop(&self) -> Option<RawEdge> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None; // Empty.
        }

        let raw = self.slots[tail as usize].load(Ordering::Relaxed);
        self.tail
            .store((tail + 1) % CAPTURE_QUEUE_CAP as u8, Ordering::Release);

        unpack(raw)
    }

    /// Number of pending edges.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        (head + CAPTURE_QUEUE_CAP - tail) % CAPTURE_QUEUE_CAP
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all pending edges.  Called from the lifecycle path before
    /// arming interrupts, so edges left over from a previous run (or
    /// enqueued briefly after a stop signal) are drained harmlessly.
    pub fn clear(&self) {
        while self.pop().is_some() {}
    }
}

fn pack(line: Line, level: u8) -> u8 {
    ((line as u8) << 1) | (level & 1)
}

fn unpack(raw: u8) -> Option<RawEdge> {
    let line = Line::from_u8(raw >> 1)?;
    Some(RawEdge {
        line,
        level: raw & 1,
    })
}
