//! Input subsystem lifecycle and event dispatch.
//!
//! [`InputSubsystem`] is the owned instance threaded through
//! initialize/start/stop — no hidden process-wide state beyond the
//! ISR-facing capture queue and the shared idle atomic.
//!
//! ```text
//! Uninitialized ──initialize()──▶ Configured ──start()──▶ Armed ──▶ Running
//!                                                                      │
//!                      Stopped ◀──────────────── stop() ───────────────┘
//! ```
//!
//! The worker owns all decode state and runs it lock-free; the only
//! synchronized hand-off is the capture queue.  `stop()` is cooperative:
//! it clears the run flag and the worker exits after its current wait
//! slice, so the join is bounded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{info, warn};

use crate::config::InputConfig;
use crate::drivers::task_pin::{self, Core};
use crate::error::{Error, Result};
use crate::events::{InputEvent, Line, LINE_COUNT};
use crate::ports::{Clock, InputLines, Restarter};

use super::capture::CaptureQueue;
use super::idle::IdleClock;
use super::pipeline::InputPipeline;
use super::watchdog::HoldWatchdog;

/// Subscriber callback.  Runs inline in the worker, so it must not block
/// for materially long durations or it delays servicing of queued edges.
pub type EventCallback = Box<dyn FnMut(InputEvent) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    /// Lines configured, interrupts disabled.
    Configured,
    /// Interrupts enabled, worker not yet running.
    Armed,
    Running,
    /// Worker exited; resources remain allocated but idle.
    Stopped,
}

/// State shared between the subsystem handle and the worker.
struct SharedState {
    running: AtomicBool,
    idle: IdleClock,
}

/// The input subsystem: capture bridge consumer, decode pipeline host,
/// watchdog poller, and dispatcher.
pub struct InputSubsystem<C: Clock, L: InputLines, R: Restarter> {
    config: InputConfig,
    state: Lifecycle,
    clock: C,
    lines: L,
    restarter: Arc<R>,
    queue: &'static CaptureQueue,
    shared: Arc<SharedState>,
    callback: Arc<Mutex<Option<EventCallback>>>,
    worker: Option<JoinHandle<()>>,
}

impl<C: Clock, L: InputLines, R: Restarter> InputSubsystem<C, L, R> {
    pub fn new(
        config: InputConfig,
        clock: C,
        lines: L,
        restarter: R,
        queue: &'static CaptureQueue,
    ) -> Self {
        Self {
            config,
            state: Lifecycle::Uninitialized,
            clock,
            lines,
            restarter: Arc::new(restarter),
            queue,
            shared: Arc::new(SharedState {
                running: AtomicBool::new(false),
                idle: IdleClock::new(),
            }),
            callback: Arc::new(Mutex::new(None)),
            worker: None,
        }
    }

    /// Configure the input lines (pull-ups, directions, interrupts
    /// disabled).  Idempotent: calling twice is a logged no-op.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != Lifecycle::Uninitialized {
            warn!("input: already initialized");
            return Ok(());
        }
        self.lines.configure()?;
        self.state = Lifecycle::Configured;
        info!("input: lines configured (interrupts disabled)");
        Ok(())
    }

    /// Register the event subscriber, replacing any prior registration.
    /// Exactly one subscriber is active at a time.
    pub fn register_callback(&self, callback: impl FnMut(InputEvent) + Send + 'static) {
        if let Ok(mut slot) = self.callback.lock() {
            *slot = Some(Box::new(callback));
        }
    }

    /// Arm interrupts and start the worker.
    /// Idempotent while running: a second call is a logged no-op.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            Lifecycle::Running => {
                warn!("input: already running");
                return Ok(());
            }
            Lifecycle::Uninitialized => return Err(Error::NotInitialized),
            Lifecycle::Configured | Lifecycle::Armed | Lifecycle::Stopped => {}
        }

        // Drop anything enqueued before this run (including edges from
        // in-flight interrupts after a previous stop signal).
        self.queue.clear();

        self.lines.arm()?;
        self.state = Lifecycle::Armed;

        // Seed decode state from the settled line levels so the first
        // real edge is classified against reality, not assumptions.
        let mut levels = [1u8; LINE_COUNT];
        for line in Line::ALL {
            levels[line as usize] = self.lines.read(line);
        }

        let worker = Worker {
            config: self.config.clone(),
            queue: self.queue,
            clock: self.clock.clone(),
            restarter: Arc::clone(&self.restarter),
            shared: Arc::clone(&self.shared),
            callback: Arc::clone(&self.callback),
            pipeline: InputPipeline::new(self.config.debounce_window_us, levels),
        };

        self.shared.running.store(true, Ordering::Release);
        let handle = task_pin::spawn_on_core(Core::App, 10, 4, "input\0", move || worker.run())
            .map_err(|_| {
                self.shared.running.store(false, Ordering::Release);
                Error::ResourceExhausted("input worker thread")
            })?;

        self.worker = Some(handle);
        self.state = Lifecycle::Running;
        info!("input: worker started");
        Ok(())
    }

    /// Signal the worker to exit and wait for it.  The wait is bounded:
    /// the worker re-checks the run flag at every iteration boundary, at
    /// most one wait slice away.
    pub fn stop(&mut self) {
        if self.state != Lifecycle::Running {
            return;
        }
        self.shared.running.store(false, Ordering::Release);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.state = Lifecycle::Stopped;
        info!("input: stopped");
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Milliseconds since the last accepted input event.
    pub fn idle_time_ms(&self) -> u32 {
        self.shared.idle.idle_ms(self.clock.now_us())
    }

    /// Reset the idle timer, e.g. after activity observed on another
    /// interface.  Single atomic store — safe to race the worker.
    pub fn reset_idle_timer(&self) {
        self.shared.idle.touch(self.clock.now_us());
    }
}

// ───────────────────────────────────────────────────────────────
// Worker
// ───────────────────────────────────────────────────────────────

struct Worker<C: Clock, R: Restarter> {
    config: InputConfig,
    queue: &'static CaptureQueue,
    clock: C,
    restarter: Arc<R>,
    shared: Arc<SharedState>,
    callback: Arc<Mutex<Option<EventCallback>>>,
    pipeline: InputPipeline,
}

impl<C: Clock, R: Restarter> Worker<C, R> {
    fn run(mut self) {
        info!("input: worker loop entered");
        let watchdog = HoldWatchdog::new(self.config.force_restart_hold_us);
        self.shared.idle.touch(self.clock.now_us());

        while self.shared.running.load(Ordering::Acquire) {
            let serviced = self.drain_queue();

            // The watchdog is polled every iteration regardless of queue
            // activity, so a stuck button is detected even with no edges.
            if watchdog.expired(self.pipeline.held_since(), self.clock.now_us()) {
                self.force_restart();
                break;
            }

            if !serviced {
                self.wait_for_edge();
            }
        }

        self.shared.running.store(false, Ordering::Release);
        info!("input: worker loop exited");
    }

    /// Process every pending edge.  Returns true if any edge was serviced.
    fn drain_queue(&mut self) -> bool {
        let mut serviced = false;
        while let Some(raw) = self.queue.pop() {
            serviced = true;
            // Timestamps are assigned here, never in interrupt context.
            let now_us = self.clock.now_us();
            if let Some(event) = self.pipeline.process(raw, now_us) {
                self.shared.idle.touch(now_us);
                self.dispatch(event);
            }
        }
        serviced
    }

    /// Invoke the subscriber synchronously.  No subscriber, no delivery.
    ///
    /// A panicking subscriber must not take the worker down with it (or
    /// poison the callback mutex, leaving `is_running()` stuck true): the
    /// unwind is caught inside the lock and the offending registration is
    /// dropped.
    fn dispatch(&mut self, event: InputEvent) {
        if let Ok(mut slot) = self.callback.lock() {
            if let Some(callback) = slot.as_mut() {
                let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    callback(event);
                }));
                if caught.is_err() {
                    *slot = None;
                    log::error!("input: subscriber panicked — registration dropped");
                }
            }
        }
    }

    /// Bounded wait for the next edge: poll in 1 ms steps up to the
    /// configured wait slice, returning early when an edge arrives.
    ///
    /// TODO: on espidf, replace the poll with a blocking FreeRTOS
    /// queue-receive to cut idle wakeups.
    fn wait_for_edge(&self) {
        let slice = Duration::from_millis(1);
        for _ in 0..self.config.queue_wait_ms.max(1) {
            if !self.queue.is_empty() || !self.shared.running.load(Ordering::Acquire) {
                return;
            }
            std::thread::sleep(slice);
        }
    }

    /// The deliberate, irreversible safety action: grace delay so pending
    /// log output can flush, then an unconditional device restart.  On
    /// the target `restart()` never returns; mocks record the call and
    /// the loop exits via the `break` in `run()`.
    fn force_restart(&self) {
        warn!(
            "input: button held {} s — forcing device restart",
            self.config.force_restart_hold_us / 1_000_000
        );
        std::thread::sleep(Duration::from_millis(u64::from(self.config.restart_grace_ms)));
        self.restarter.restart();
    }
}
