//! Per-line software debounce.
//!
//! Mechanical contacts bounce for a few hundred microseconds after each
//! transition; the filter rejects any edge that arrives within the window
//! of the previous *accepted* edge on the same line.
//!
//! Every edge passes through here before any event can be emitted.  This
//! is a hard requirement — a rejected edge must never fire, or contact
//! bounce produces false triggers.  (Phase *tracking* in the quadrature
//! decoders is exempt: it follows every edge so the decoders stay in sync
//! with the hardware.)

use crate::events::{Line, LINE_COUNT};

/// Debounce filter over all five monitored lines.
pub struct DebounceFilter {
    window_us: u64,
    /// Wall-clock time of the last accepted edge, per line.
    last_accept_us: [u64; LINE_COUNT],
}

impl DebounceFilter {
    pub fn new(window_us: u64) -> Self {
        Self {
            window_us,
            last_accept_us: [0; LINE_COUNT],
        }
    }

    /// Accept or reject an edge on `line` at time `now_us`.
    /// On acceptance the per-line table is updated.
    pub fn accept(&mut self, line: Line, now_us: u64) -> bool {
        let slot = &mut self.last_accept_us[line as usize];
        if now_us.saturating_sub(*slot) < self.window_us {
            return false;
        }
        *slot = now_us;
        true
    }
}
