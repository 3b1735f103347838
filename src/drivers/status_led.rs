//! Single-pixel RGB status LED driver.
//!
//! Three LEDC PWM channels drive a common-cathode RGB LED.  The driver is
//! a stateless colour setter as far as consumers are concerned; it tracks
//! the last commanded colour for diagnostics and host-side tests.
//!
//! On ESP-IDF: drives the LEDC channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct StatusLed {
    current: (u8, u8, u8),
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: (0, 0, 0) }
    }

    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.current = (r, g, b);
    }

    pub fn off(&mut self) {
        self.set_rgb(0, 0, 0);
    }

    pub fn red(&mut self) {
        self.set_rgb(255, 0, 0);
    }

    pub fn green(&mut self) {
        self.set_rgb(0, 255, 0);
    }

    pub fn blue(&mut self) {
        self.set_rgb(0, 0, 255);
    }

    pub fn current_rgb(&self) -> (u8, u8, u8) {
        self.current
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
