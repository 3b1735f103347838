//! Classified input events — the data contract with downstream consumers.
//!
//! Every consumer (keystroke mapper, wireless-advertisement mapper, LED
//! colour mapper) receives the same [`InputEvent`] via the subscriber
//! callback and maps the subset of variants it cares about, ignoring the
//! rest.

/// A physical input line on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Line {
    Button = 0,
    Enc1Clk = 1,
    Enc1Dt = 2,
    Enc2Clk = 3,
    Enc2Dt = 4,
}

/// Number of monitored input lines.
pub const LINE_COUNT: usize = 5;

impl Line {
    /// All monitored lines, in capture-id order.
    pub const ALL: [Line; LINE_COUNT] =
        [Line::Button, Line::Enc1Clk, Line::Enc1Dt, Line::Enc2Clk, Line::Enc2Dt];

    pub(crate) fn from_u8(raw: u8) -> Option<Line> {
        match raw {
            0 => Some(Line::Button),
            1 => Some(Line::Enc1Clk),
            2 => Some(Line::Enc1Dt),
            3 => Some(Line::Enc2Clk),
            4 => Some(Line::Enc2Dt),
            _ => None,
        }
    }
}

/// The semantic classification of an accepted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEventKind {
    ButtonPress,
    ButtonRelease,
    /// Encoder 1 clockwise detent.
    Enc1Cw,
    /// Encoder 1 counter-clockwise detent.
    Enc1Ccw,
    /// Encoder 2 clockwise detent.
    Enc2Cw,
    /// Encoder 2 counter-clockwise detent.
    Enc2Ccw,
}

/// A classified input event with its background-loop timestamp.
///
/// Timestamps are monotonic microseconds since boot, assigned when the
/// edge is dequeued (never in interrupt context).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub timestamp_us: u64,
}
