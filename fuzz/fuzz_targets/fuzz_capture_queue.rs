//! Fuzz target: `CaptureQueue` push/pop interleavings
//!
//! Asserts the queue never panics, never exceeds its capacity, and
//! delivers edges back exactly as packed.
//!
//! cargo fuzz run fuzz_capture_queue

#![no_main]

use cosmopager::events::{Line, LINE_COUNT};
use cosmopager::input::{CaptureQueue, CAPTURE_QUEUE_CAP};
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
    let queue = CaptureQueue::new();
    let mut pending = std::collections::VecDeque::new();

    for &byte in data {
        if byte & 0x80 == 0 {
            let line = line_from(byte >> 1);
            let level = byte & 1;
            if queue.push(line, level) {
                pending.push_back((line, level));
            } else {
                assert_eq!(pending.len(), CAPTURE_QUEUE_CAP - 1);
            }
        } else {
            match queue.pop() {
                Some(edge) => {
                    let (line, level) = pending.pop_front().unwrap();
                    assert_eq!(edge.line, line);
                    assert_eq!(edge.level, level);
                }
                None => assert!(pending.is_empty()),
            }
        }
        assert_eq!(queue.len(), pending.len());
        assert!(queue.len() < CAPTURE_QUEUE_CAP);
    }
});
