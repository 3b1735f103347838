//! The decode pipeline: debounce → route → classify.
//!
//! Owns all mutable decoding state (debounce table, two encoder phases,
//! button tracker).  The worker is the sole caller, so no locking is
//! needed anywhere in here — single-writer discipline by construction.
//!
//! Debounce gates event *emission*, not phase tracking: the encoder
//! decoders observe every edge so their phase stays synchronized with
//! the hardware, while rejected edges can never produce an event.
//!
//! Per-edge processing errors do not exist: malformed or duplicate edges
//! are classified as nothing and dropped, never surfaced, because
//! interrupt-sourced noise is expected and must not stall the pipeline.

use crate::events::{InputEvent, InputEventKind, Line, LINE_COUNT};

use super::button::ButtonTracker;
use super::capture::RawEdge;
use super::debounce::DebounceFilter;
use super::quadrature::{QuadratureDecoder, Rotation};

/// Full decode pipeline for the five input lines.
pub struct InputPipeline {
    debounce: DebounceFilter,
    enc1: QuadratureDecoder,
    enc2: QuadratureDecoder,
    button: ButtonTracker,
}

impl InputPipeline {
    /// Build the pipeline from the line levels read just before interrupts
    /// are armed, indexed in [`Line::ALL`] order.
    pub fn new(debounce_window_us: u64, levels: [u8; LINE_COUNT]) -> Self {
        Self {
            debounce: DebounceFilter::new(debounce_window_us),
            enc1: QuadratureDecoder::new(
                levels[Line::Enc1Clk as usize],
                levels[Line::Enc1Dt as usize],
            ),
            enc2: QuadratureDecoder::new(
                levels[Line::Enc2Clk as usize],
                levels[Line::Enc2Dt as usize],
            ),
            button: ButtonTracker::new(levels[Line::Button as usize]),
        }
    }

    /// Run one dequeued edge through debounce, routing, and classification.
    ///
    /// `now_us` is the dequeue-time timestamp; it becomes the event
    /// timestamp on successful classification.
    pub fn process(&mut self, edge: RawEdge, now_us: u64) -> Option<InputEvent> {
        let accepted = self.debounce.accept(edge.line, now_us);

        let kind = match edge.line {
            Line::Button => {
                if !accepted {
                    return None;
                }
                self.button.edge(edge.level, now_us)
            }
            // An edge carries only its own line's level; the sibling level
            // comes from the decoder's phase.  The phase is stepped on
            // EVERY edge, rejected ones included, so it always matches the
            // hardware — a debounced return to the detent must not leave
            // the decoder stranded and eat the next click.  Rejected edges
            // can still never emit: only accepted ones pass their rotation
            // through.
            Line::Enc1Clk => {
                let dt = self.enc1.state() & 1;
                let rot = self.enc1.step(edge.level, dt);
                if accepted { rot.map(enc1_event) } else { None }
            }
            Line::Enc1Dt => {
                let clk = self.enc1.state() >> 1;
                let rot = self.enc1.step(clk, edge.level);
                if accepted { rot.map(enc1_event) } else { None }
            }
            Line::Enc2Clk => {
                let dt = self.enc2.state() & 1;
                let rot = self.enc2.step(edge.level, dt);
                if accepted { rot.map(enc2_event) } else { None }
            }
            Line::Enc2Dt => {
                let clk = self.enc2.state() >> 1;
                let rot = self.enc2.step(clk, edge.level);
                if accepted { rot.map(enc2_event) } else { None }
            }
        }?;

        Some(InputEvent {
            kind,
            timestamp_us: now_us,
        })
    }

    /// Start time of an in-progress button press (watchdog input).
    pub fn held_since(&self) -> Option<u64> {
        self.button.held_since()
    }
}

fn enc1_event(rot: Rotation) -> InputEventKind {
    match rot {
        Rotation::Cw => InputEventKind::Enc1Cw,
        Rotation::Ccw => InputEventKind::Enc1Ccw,
    }
}

fn enc2_event(rot: Rotation) -> InputEventKind {
    match rot {
        Rotation::Cw => InputEventKind::Enc2Cw,
        Rotation::Ccw => InputEventKind::Enc2Ccw,
    }
}
