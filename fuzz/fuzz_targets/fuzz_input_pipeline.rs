//! Fuzz target: `InputPipeline::process`
//!
//! Drives arbitrary edge streams with arbitrary timing into the decode
//! pipeline and asserts it never panics, events carry the dequeue
//! timestamp, and button hold tracking stays consistent.
//!
//! cargo fuzz run fuzz_input_pipeline

#![no_main]

use cosmopager::events::{InputEventKind, Line, LINE_COUNT};
use cosmopager::input::{InputPipeline, RawEdge};
use libfuzzer_sys::fuzz_target;

fn line_from(byte: u8) -> Line {
    match byte % LINE_COUNT as u8 {
        0 => Line::Button,
        1 => Line::Enc1Clk,
        2 => Line::Enc1Dt,
        3 => Line::Enc2Clk,
        _ => Line::Enc2Dt,
    }
}

fuzz_target!(|data: &[u8]| {
    let mut pipeline = InputPipeline::new(2_000, [1; LINE_COUNT]);
    let mut now = 0u64;

    for chunk in data.chunks_exact(2) {
        now += u64::from(chunk[1]) * 100;
        let edge = RawEdge {
            line: line_from(chunk[0] >> 1),
            level: chunk[0] & 1,
        };

        if let Some(event) = pipeline.process(edge, now) {
            assert_eq!(event.timestamp_us, now);
            if event.kind == InputEventKind::ButtonPress {
                assert_eq!(pipeline.held_since(), Some(now));
            }
            if event.kind == InputEventKind::ButtonRelease {
                assert_eq!(pipeline.held_since(), None);
            }
        }

        // Hold start can never be in the future.
        if let Some(since) = pipeline.held_since() {
            assert!(since <= now);
        }
    }
});
