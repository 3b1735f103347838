//! GPIO line and restart adapters for the ESP32-S3.
//!
//! Thin implementations of [`InputLines`] and [`Restarter`] over the
//! raw ESP-IDF calls in [`hw_init`](crate::drivers::hw_init).  On host
//! targets the line reads return pull-up idle levels and the restart is
//! a logged no-op; tests use their own mocks instead.

use crate::drivers::hw_init;
use crate::error::Result;
use crate::events::Line;
use crate::pins;
use crate::ports::{InputLines, Restarter};

/// Map a capture line id to its GPIO number.
fn gpio_for(line: Line) -> i32 {
    match line {
        Line::Button => pins::BUTTON_GPIO,
        Line::Enc1Clk => pins::ENC1_CLK_GPIO,
        Line::Enc1Dt => pins::ENC1_DT_GPIO,
        Line::Enc2Clk => pins::ENC2_CLK_GPIO,
        Line::Enc2Dt => pins::ENC2_DT_GPIO,
    }
}

/// The five physical input lines.
pub struct Esp32Lines {
    configured: bool,
}

impl Esp32Lines {
    pub fn new() -> Self {
        Self { configured: false }
    }
}

impl Default for Esp32Lines {
    fn default() -> Self {
        Self::new()
    }
}

impl InputLines for Esp32Lines {
    fn configure(&mut self) -> Result<()> {
        hw_init::init_peripherals()?;
        self.configured = true;
        Ok(())
    }

    fn arm(&mut self) -> Result<()> {
        if !self.configured {
            return Err(crate::error::Error::HardwareConfig("arm before configure"));
        }
        hw_init::arm_input_interrupts()?;
        Ok(())
    }

    fn read(&self, line: Line) -> u8 {
        hw_init::gpio_read(gpio_for(line))
    }
}

/// Unconditional device restart via `esp_restart()`.
pub struct Esp32Restart;

impl Restarter for Esp32Restart {
    #[cfg(target_os = "espidf")]
    fn restart(&self) {
        // SAFETY: esp_restart is the documented software reset entry
        // point; it does not return.
        unsafe {
            esp_idf_svc::sys::esp_restart();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn restart(&self) {
        // Simulation cannot reset the host; the worker loop exits instead.
        log::warn!("restart(sim): device reset requested");
    }
}
