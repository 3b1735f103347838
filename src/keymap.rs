//! Keystroke mapping — a pure table from input events to HID key actions.
//!
//! Consumed via the event callback by the USB-HID transport.  The mapping
//! matches the shipped knob layout: the button is Enter (held while
//! pressed), encoder 1 scrolls vertically, encoder 2 horizontally.

use crate::events::{InputEvent, InputEventKind};

/// USB HID keyboard usage IDs for the keys this device emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyCode {
    Enter = 0x28,
    RightArrow = 0x4F,
    LeftArrow = 0x50,
    DownArrow = 0x51,
    UpArrow = 0x52,
}

impl KeyCode {
    /// HID usage ID (keyboard usage page).
    pub const fn usage_id(self) -> u8 {
        self as u8
    }
}

/// What the HID transport should do for one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Press and hold (report until the matching `Up`).
    Down(KeyCode),
    /// Release whatever is held.
    Up,
    /// Press-and-release in one go (encoder detents).
    Pulse(KeyCode),
}

/// Total mapping — every event variant has an action.
pub fn key_action(event: &InputEvent) -> KeyAction {
    match event.kind {
        InputEventKind::ButtonPress => KeyAction::Down(KeyCode::Enter),
        InputEventKind::ButtonRelease => KeyAction::Up,
        InputEventKind::Enc1Cw => KeyAction::Pulse(KeyCode::UpArrow),
        InputEventKind::Enc1Ccw => KeyAction::Pulse(KeyCode::DownArrow),
        InputEventKind::Enc2Cw => KeyAction::Pulse(KeyCode::RightArrow),
        InputEventKind::Enc2Ccw => KeyAction::Pulse(KeyCode::LeftArrow),
    }
}
