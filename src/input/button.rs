//! Button edge tracker.
//!
//! The button is active-low (pull-up wiring): a falling edge is a press,
//! a rising edge a release.  The tracker records the press start time for
//! the force-restart watchdog; it is cleared on release.

use crate::events::InputEventKind;

/// Level-change tracker for the button line.
pub struct ButtonTracker {
    last_level: u8,
    press_start_us: Option<u64>,
}

impl ButtonTracker {
    /// Seed with the level read before interrupts are armed
    /// (1 = released on pull-up wiring).
    pub fn new(initial_level: u8) -> Self {
        Self {
            last_level: initial_level & 1,
            press_start_us: None,
        }
    }

    /// Process an accepted (post-debounce) edge on the button line.
    ///
    /// Same-level repeats should not occur after debounce; they are
    /// classified as nothing and dropped.
    pub fn edge(&mut self, level: u8, now_us: u64) -> Option<InputEventKind> {
        let level = level & 1;
        let event = match (self.last_level, level) {
            (1, 0) => {
                self.press_start_us = Some(now_us);
                Some(InputEventKind::ButtonPress)
            }
            (0, 1) => {
                self.press_start_us = None;
                Some(InputEventKind::ButtonRelease)
            }
            _ => None,
        };
        self.last_level = level;
        event
    }

    /// Start time of the press currently in progress, if any.
    /// Consumed only by the watchdog.
    pub fn held_since(&self) -> Option<u64> {
        self.press_start_us
    }
}
