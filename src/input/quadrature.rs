//! Quadrature decoder with detent-edge triggering.
//!
//! A rotary encoder produces a 2-bit Gray-code sequence on its CLK and DT
//! lines as the shaft turns.  The mechanically stable rest position (the
//! detent) corresponds to phase `0b11` on this hardware.
//!
//! One mechanical click produces *two* line transitions; triggering only
//! on the transition that leaves the settled detent avoids double-counting
//! them, and treating every other transition as a silent phase update
//! tolerates one line toggling before the other without misclassifying
//! the direction.

/// The fully-settled detent phase: both lines high (pull-ups, switches open).
const DETENT: u8 = 0b11;

/// Rotation direction of a single detent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Cw,
    Ccw,
}

/// Per-encoder phase state machine.
///
/// Two independent instances run, one per encoder, with fully isolated
/// state.
pub struct QuadratureDecoder {
    /// `(clk << 1) | dt` of the most recently observed levels.
    state: u8,
}

impl QuadratureDecoder {
    /// Seed the decoder with the current line levels, read before the
    /// first edge arrives.
    pub fn new(clk_level: u8, dt_level: u8) -> Self {
        Self {
            state: phase(clk_level, dt_level),
        }
    }

    /// Observed combined phase (for routing sibling-line edges).
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Feed the latest combined levels; returns a rotation only when the
    /// phase leaves the detent.
    ///
    /// The phase is updated unconditionally, whether or not an event
    /// fires, so it always reflects the most recently observed levels.
    pub fn step(&mut self, clk_level: u8, dt_level: u8) -> Option<Rotation> {
        let new_state = phase(clk_level, dt_level);

        if new_state == self.state {
            return None; // Duplicate level report — no transition.
        }

        let result = if self.state == DETENT {
            match new_state {
                0b10 => Some(Rotation::Cw),
                0b01 => Some(Rotation::Ccw),
                _ => None,
            }
        } else {
            None
        };

        self.state = new_state;
        result
    }
}

fn phase(clk_level: u8, dt_level: u8) -> u8 {
    ((clk_level & 1) << 1) | (dt_level & 1)
}
