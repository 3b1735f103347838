//! Cosmo Pager input firmware — main entry point.
//!
//! Hexagonal architecture: the interrupt-driven input core consumes the
//! platform through port traits, and this binary wires the real ESP32-S3
//! adapters to it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  Esp32Lines     MonotonicClock   Esp32Restart            │
//! │  (InputLines)   (Clock)          (Restarter)             │
//! │  NvsAdapter ──▶ DeviceIdentity                           │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ──────────────        │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │         InputSubsystem (pure logic)            │      │
//! │  │  Debounce · Quadrature · Button · Watchdog     │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::{info, warn};

use cosmopager::adapters::hardware::{Esp32Lines, Esp32Restart};
use cosmopager::adapters::identity::DeviceIdentity;
use cosmopager::adapters::nvs::NvsAdapter;
use cosmopager::adapters::time::MonotonicClock;
use cosmopager::config::InputConfig;
use cosmopager::drivers::status_led::StatusLed;
use cosmopager::events::InputEventKind;
use cosmopager::input::capture::CAPTURE_QUEUE;
use cosmopager::input::subsystem::InputSubsystem;
use cosmopager::keymap::{self, KeyAction};

/// User-idle threshold after which the status LED goes dark.
const IDLE_DIM_MS: u32 = 60_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Cosmo Pager v{}                   ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Device identity (NVS-backed) ───────────────────────
    let identity = match NvsAdapter::new() {
        Ok(nvs) => match DeviceIdentity::load(nvs) {
            Ok(id) => {
                info!("Device: {} ({})", id.name(), id.serial());
                Some(id)
            }
            Err(e) => {
                warn!("Identity load failed ({}), continuing anonymous", e);
                None
            }
        },
        Err(e) => {
            warn!("NVS init failed ({}), continuing without persistence", e);
            None
        }
    };

    // ── 3. Input subsystem ────────────────────────────────────
    let config = InputConfig::default();
    let mut input = InputSubsystem::new(
        config,
        MonotonicClock::new(),
        Esp32Lines::new(),
        Esp32Restart,
        &CAPTURE_QUEUE,
    );

    // Configures GPIO directions/pull-ups and the LEDC channels; the LED
    // must not be touched before this succeeds.
    input.initialize()?;

    // Shared with the event callback: the worker flashes press feedback,
    // the supervisor loop dims on idle.
    let led = Arc::new(Mutex::new(StatusLed::new()));
    if let Ok(mut led) = led.lock() {
        led.green();
    }

    // ── 4. Subscriber: HID key reports + LED feedback ─────────
    let callback_led = Arc::clone(&led);
    input.register_callback(move |event| {
        match keymap::key_action(&event) {
            KeyAction::Down(code) => info!("key down: {:?} (usage 0x{:02X})", code, code.usage_id()),
            KeyAction::Up => info!("key up"),
            KeyAction::Pulse(code) => info!("key pulse: {:?} (usage 0x{:02X})", code, code.usage_id()),
        }
        if let Ok(mut led) = callback_led.lock() {
            match event.kind {
                InputEventKind::ButtonPress => led.red(),
                InputEventKind::ButtonRelease => led.green(),
                _ => {}
            }
        }
    });

    input.start()?;
    info!("System ready. Input worker running.");

    // ── 5. Supervisor loop ────────────────────────────────────
    // The input worker does all the real work; this loop applies the
    // idle-time power policy to the LED and reports for diagnostics.
    let mut dimmed = false;
    loop {
        std::thread::sleep(std::time::Duration::from_secs(5));
        let idle_ms = input.idle_time_ms();

        if idle_ms >= IDLE_DIM_MS && !dimmed {
            if let Ok(mut led) = led.lock() {
                led.off();
            }
            dimmed = true;
            if let Some(id) = identity.as_ref() {
                info!("{}: idle {} ms, LED off", id.name(), idle_ms);
            }
        } else if idle_ms < IDLE_DIM_MS && dimmed {
            if let Ok(mut led) = led.lock() {
                led.green();
            }
            dimmed = false;
        }

        if !input.is_running() {
            warn!("input worker exited unexpectedly");
        }
    }
}
