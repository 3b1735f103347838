//! Scenario tests for the decode pipeline: realistic edge sequences as
//! they would arrive from the capture queue, spanning multiple lines.

use cosmopager::events::{InputEventKind, Line, LINE_COUNT};
use cosmopager::input::{InputPipeline, RawEdge};

fn idle_pipeline() -> InputPipeline {
    InputPipeline::new(2_000, [1; LINE_COUNT])
}

fn edge(line: Line, level: u8) -> RawEdge {
    RawEdge { line, level }
}

/// Feed a sequence of (line, level, time) edges and collect events.
fn run(
    pipeline: &mut InputPipeline,
    edges: &[(Line, u8, u64)],
) -> Vec<InputEventKind> {
    edges
        .iter()
        .filter_map(|&(line, level, t)| pipeline.process(edge(line, level), t))
        .map(|ev| ev.kind)
        .collect()
}

#[test]
fn full_cw_detent_cycle_yields_one_event() {
    let mut p = idle_pipeline();
    // CW: DT leads.  11 → 10 → 00 → 01 → 11.
    let events = run(
        &mut p,
        &[
            (Line::Enc1Dt, 0, 10_000),
            (Line::Enc1Clk, 0, 13_000),
            (Line::Enc1Dt, 1, 16_000),
            (Line::Enc1Clk, 1, 19_000),
        ],
    );
    assert_eq!(events, vec![InputEventKind::Enc1Cw]);
}

#[test]
fn full_ccw_detent_cycle_yields_one_event() {
    let mut p = idle_pipeline();
    // CCW: CLK leads.  11 → 01 → 00 → 10 → 11.
    let events = run(
        &mut p,
        &[
            (Line::Enc1Clk, 0, 10_000),
            (Line::Enc1Dt, 0, 13_000),
            (Line::Enc1Clk, 1, 16_000),
            (Line::Enc1Dt, 1, 19_000),
        ],
    );
    assert_eq!(events, vec![InputEventKind::Enc1Ccw]);
}

#[test]
fn three_rapid_detents_count_three() {
    let mut p = idle_pipeline();
    let mut edges = Vec::new();
    // Three CW clicks, 30 ms apart, edges 3 ms apart within a click —
    // fast scrolling at human speed.
    for click in 0u64..3 {
        let base = 10_000 + click * 30_000;
        edges.extend_from_slice(&[
            (Line::Enc1Dt, 0, base),
            (Line::Enc1Clk, 0, base + 3_000),
            (Line::Enc1Dt, 1, base + 6_000),
            (Line::Enc1Clk, 1, base + 9_000),
        ]);
    }
    let events = run(&mut p, &edges);
    assert_eq!(events, vec![InputEventKind::Enc1Cw; 3]);
}

#[test]
fn direction_reversal_between_detents() {
    let mut p = idle_pipeline();
    let events = run(
        &mut p,
        &[
            // CW click.
            (Line::Enc1Dt, 0, 10_000),
            (Line::Enc1Clk, 0, 13_000),
            (Line::Enc1Dt, 1, 16_000),
            (Line::Enc1Clk, 1, 19_000),
            // Immediately back CCW.
            (Line::Enc1Clk, 0, 40_000),
            (Line::Enc1Dt, 0, 43_000),
            (Line::Enc1Clk, 1, 46_000),
            (Line::Enc1Dt, 1, 49_000),
        ],
    );
    assert_eq!(events, vec![InputEventKind::Enc1Cw, InputEventKind::Enc1Ccw]);
}

#[test]
fn each_detent_departure_counts_once() {
    let mut p = idle_pipeline();
    // Leaving the detent fires once; backing out without completing the
    // cycle produces nothing further.
    let events = run(
        &mut p,
        &[
            (Line::Enc1Dt, 0, 10_000),
            (Line::Enc1Dt, 1, 15_000),
            (Line::Enc1Dt, 0, 40_000),
            (Line::Enc1Dt, 1, 45_000),
        ],
    );
    // Each detent departure counts — physical clicks the user felt.
    assert_eq!(events, vec![InputEventKind::Enc1Cw, InputEventKind::Enc1Cw]);
}

#[test]
fn click_after_debounced_snap_back_is_not_lost() {
    let mut p = idle_pipeline();
    let events = run(
        &mut p,
        &[
            // Click out of the detent, snap straight back inside the
            // debounce window, then two clean clicks.
            (Line::Enc1Dt, 0, 10_000),
            (Line::Enc1Dt, 1, 11_500),
            (Line::Enc1Dt, 0, 30_000),
            (Line::Enc1Dt, 1, 35_000),
            (Line::Enc1Dt, 0, 60_000),
        ],
    );
    assert_eq!(events, vec![InputEventKind::Enc1Cw; 3]);
}

#[test]
fn button_and_both_encoders_interleaved() {
    let mut p = idle_pipeline();
    let events = run(
        &mut p,
        &[
            (Line::Button, 0, 10_000),
            (Line::Enc1Dt, 0, 12_500),
            (Line::Enc2Clk, 0, 15_000),
            (Line::Button, 1, 250_000),
        ],
    );
    assert_eq!(
        events,
        vec![
            InputEventKind::ButtonPress,
            InputEventKind::Enc1Cw,
            InputEventKind::Enc2Ccw,
            InputEventKind::ButtonRelease,
        ]
    );
}

#[test]
fn debounce_windows_are_per_line() {
    let mut p = idle_pipeline();
    // Edges on different lines 500 µs apart all pass; a repeat on the
    // same line inside 2 ms does not.
    assert!(p.process(edge(Line::Button, 0), 10_000).is_some());
    assert!(p.process(edge(Line::Enc1Dt, 0), 10_500).is_some());
    assert!(p.process(edge(Line::Button, 1), 10_900).is_none());
}

#[test]
fn event_timestamps_are_dequeue_times() {
    let mut p = idle_pipeline();
    let ev = p.process(edge(Line::Button, 0), 123_456).unwrap();
    assert_eq!(ev.timestamp_us, 123_456);
    let ev = p.process(edge(Line::Button, 1), 500_000).unwrap();
    assert_eq!(ev.timestamp_us, 500_000);
}

#[test]
fn held_since_tracks_press_through_encoder_activity() {
    let mut p = idle_pipeline();
    assert!(p.process(edge(Line::Button, 0), 10_000).is_some());
    // Encoder activity while the button is held does not disturb it.
    assert!(p.process(edge(Line::Enc2Dt, 0), 50_000).is_some());
    assert_eq!(p.held_since(), Some(10_000));
}

#[test]
fn seeded_pressed_button_reports_release_only() {
    // Button already low at arm time.
    let mut levels = [1u8; LINE_COUNT];
    levels[Line::Button as usize] = 0;
    let mut p = InputPipeline::new(2_000, levels);

    // A repeat low edge (noise) is not a press.
    assert!(p.process(edge(Line::Button, 0), 10_000).is_none());
    let ev = p.process(edge(Line::Button, 1), 20_000).unwrap();
    assert_eq!(ev.kind, InputEventKind::ButtonRelease);
}
