//! End-to-end subsystem tests: real worker thread, mock adapters, private
//! capture queues.
//!
//! The clock is advanced manually; the worker's wait slice is real time,
//! so assertions on delivery poll with a generous timeout instead of
//! sleeping fixed amounts.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cosmopager::config::InputConfig;
use cosmopager::events::{InputEvent, InputEventKind, Line};
use cosmopager::input::{CaptureQueue, InputSubsystem};

use crate::mock_adapters::{MockClock, MockLines, MockRestart};

/// Short wait slices so lifecycle tests finish quickly.
fn test_config() -> InputConfig {
    InputConfig {
        queue_wait_ms: 10,
        restart_grace_ms: 5,
        ..InputConfig::default()
    }
}

fn wait_until(mut pred: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    pred()
}

type EventLog = Arc<Mutex<Vec<InputEvent>>>;

fn collecting_subsystem(
    queue: &'static CaptureQueue,
) -> (
    InputSubsystem<MockClock, MockLines, MockRestart>,
    MockClock,
    MockRestart,
    EventLog,
) {
    let clock = MockClock::new();
    let restart = MockRestart::new();
    let subsystem = InputSubsystem::new(
        test_config(),
        clock.clone(),
        MockLines::new(),
        restart.clone(),
        queue,
    );
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    subsystem.register_callback(move |ev| sink.lock().unwrap().push(ev));
    (subsystem, clock, restart, log)
}

fn logged(log: &EventLog) -> Vec<InputEventKind> {
    log.lock().unwrap().iter().map(|ev| ev.kind).collect()
}

#[test]
fn start_requires_initialize() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, _clock, _restart, _log) = collecting_subsystem(&QUEUE);
    assert!(subsystem.start().is_err());
    assert!(!subsystem.is_running());
}

#[test]
fn lifecycle_start_stop_restart() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, _clock, _restart, _log) = collecting_subsystem(&QUEUE);

    subsystem.initialize().unwrap();
    // Second initialize is a logged no-op.
    subsystem.initialize().unwrap();

    subsystem.start().unwrap();
    assert!(subsystem.is_running());
    // Second start is a logged no-op.
    subsystem.start().unwrap();

    subsystem.stop();
    assert!(!subsystem.is_running());

    // The subsystem restarts cleanly after a stop.
    subsystem.start().unwrap();
    assert!(subsystem.is_running());
    subsystem.stop();
}

#[test]
fn button_press_and_release_are_delivered() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, clock, _restart, log) = collecting_subsystem(&QUEUE);

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    clock.set_us(100_000);
    QUEUE.push(Line::Button, 0);
    assert!(wait_until(|| log.lock().unwrap().len() == 1, Duration::from_secs(2)));

    clock.set_us(350_000);
    QUEUE.push(Line::Button, 1);
    assert!(wait_until(|| log.lock().unwrap().len() == 2, Duration::from_secs(2)));

    subsystem.stop();
    assert_eq!(
        logged(&log),
        vec![InputEventKind::ButtonPress, InputEventKind::ButtonRelease]
    );
    // Timestamps come from the clock at dequeue time.
    let events = log.lock().unwrap();
    assert_eq!(events[0].timestamp_us, 100_000);
    assert_eq!(events[1].timestamp_us, 350_000);
}

#[test]
fn encoder_detents_are_delivered() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, clock, _restart, log) = collecting_subsystem(&QUEUE);

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    // CW detent on encoder 1 (DT leads), then CCW on encoder 2 (CLK leads).
    clock.set_us(10_000);
    QUEUE.push(Line::Enc1Dt, 0);
    assert!(wait_until(|| log.lock().unwrap().len() == 1, Duration::from_secs(2)));

    clock.set_us(60_000);
    QUEUE.push(Line::Enc2Clk, 0);
    assert!(wait_until(|| log.lock().unwrap().len() == 2, Duration::from_secs(2)));

    subsystem.stop();
    assert_eq!(
        logged(&log),
        vec![InputEventKind::Enc1Cw, InputEventKind::Enc2Ccw]
    );
}

#[test]
fn stale_edges_are_discarded_at_start() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, clock, _restart, log) = collecting_subsystem(&QUEUE);

    // Garbage enqueued before start (e.g. from a previous run).
    QUEUE.push(Line::Button, 0);
    QUEUE.push(Line::Enc1Clk, 0);

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    // Only the post-start edge is delivered.
    clock.set_us(50_000);
    QUEUE.push(Line::Enc2Dt, 0);
    assert!(wait_until(|| !log.lock().unwrap().is_empty(), Duration::from_secs(2)));

    subsystem.stop();
    assert_eq!(logged(&log), vec![InputEventKind::Enc2Cw]);
}

#[test]
fn replacing_the_callback_reroutes_events() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, clock, _restart, first_log) = collecting_subsystem(&QUEUE);

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    clock.set_us(10_000);
    QUEUE.push(Line::Button, 0);
    assert!(wait_until(
        || !first_log.lock().unwrap().is_empty(),
        Duration::from_secs(2)
    ));

    // Exactly one subscriber: a new registration replaces the old.
    let second_log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&second_log);
    subsystem.register_callback(move |ev| sink.lock().unwrap().push(ev));

    clock.set_us(300_000);
    QUEUE.push(Line::Button, 1);
    assert!(wait_until(
        || !second_log.lock().unwrap().is_empty(),
        Duration::from_secs(2)
    ));

    subsystem.stop();
    assert_eq!(logged(&first_log), vec![InputEventKind::ButtonPress]);
    assert_eq!(logged(&second_log), vec![InputEventKind::ButtonRelease]);
}

#[test]
fn panicking_subscriber_does_not_kill_the_worker() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let clock = MockClock::new();
    let restart = MockRestart::new();
    let mut subsystem = InputSubsystem::new(
        test_config(),
        clock.clone(),
        MockLines::new(),
        restart.clone(),
        &QUEUE,
    );

    let fired = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    subsystem.register_callback(move |_ev| {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
        panic!("subscriber blew up");
    });

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    clock.set_us(100_000);
    QUEUE.push(Line::Button, 0);
    assert!(wait_until(
        || fired.load(std::sync::atomic::Ordering::SeqCst),
        Duration::from_secs(2)
    ));

    // The worker survives; the broken registration is dropped and a
    // replacement receives subsequent events.
    assert!(subsystem.is_running());
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    subsystem.register_callback(move |ev| sink.lock().unwrap().push(ev));

    clock.set_us(400_000);
    QUEUE.push(Line::Button, 1);
    assert!(wait_until(|| !log.lock().unwrap().is_empty(), Duration::from_secs(2)));

    subsystem.stop();
    assert_eq!(logged(&log), vec![InputEventKind::ButtonRelease]);
}

#[test]
fn idle_timer_resets_on_events() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, clock, _restart, log) = collecting_subsystem(&QUEUE);

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    clock.set_us(5_000_000);
    assert!(subsystem.idle_time_ms() >= 4_000);

    QUEUE.push(Line::Button, 0);
    assert!(wait_until(|| !log.lock().unwrap().is_empty(), Duration::from_secs(2)));
    assert!(subsystem.idle_time_ms() < 1_000);

    // Manual reset after simulated external activity.
    clock.set_us(9_000_000);
    assert!(subsystem.idle_time_ms() >= 3_000);
    subsystem.reset_idle_timer();
    assert!(subsystem.idle_time_ms() < 1_000);

    subsystem.stop();
}

#[test]
fn held_button_forces_restart() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, clock, restart, log) = collecting_subsystem(&QUEUE);

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    // Press and never release.
    clock.set_us(1_000_000);
    QUEUE.push(Line::Button, 0);
    assert!(wait_until(|| !log.lock().unwrap().is_empty(), Duration::from_secs(2)));
    assert!(!restart.was_restarted());

    // Jump past the hold threshold; the watchdog fires with no further edges.
    clock.set_us(1_000_000 + 15_000_000 + 1);
    assert!(wait_until(|| restart.was_restarted(), Duration::from_secs(2)));

    // The worker exits after the restart request (mock restart returns).
    assert!(wait_until(|| !subsystem.is_running(), Duration::from_secs(2)));
}

#[test]
fn released_button_never_restarts() {
    static QUEUE: CaptureQueue = CaptureQueue::new();
    let (mut subsystem, clock, restart, log) = collecting_subsystem(&QUEUE);

    subsystem.initialize().unwrap();
    subsystem.start().unwrap();

    // Press for 10 s, release, then idle well past the threshold.
    clock.set_us(1_000_000);
    QUEUE.push(Line::Button, 0);
    assert!(wait_until(|| log.lock().unwrap().len() == 1, Duration::from_secs(2)));

    clock.set_us(11_000_000);
    QUEUE.push(Line::Button, 1);
    assert!(wait_until(|| log.lock().unwrap().len() == 2, Duration::from_secs(2)));

    clock.set_us(60_000_000);
    // Give the worker a few wait slices to poll the watchdog.
    std::thread::sleep(Duration::from_millis(100));
    assert!(!restart.was_restarted());

    subsystem.stop();
}
