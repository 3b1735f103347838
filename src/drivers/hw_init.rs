//! One-shot hardware peripheral initialisation.
//!
//! Configures the five input GPIOs, the LEDC channels for the status
//! LED, and the per-line GPIO interrupt handlers, using raw ESP-IDF sys
//! calls.  Called once from `main()` before the input worker starts.
//!
//! The ISR handlers registered here are the whole of the interrupt-side
//! contract: read the line level, push one byte into the capture queue.
//! No timing calls (`esp_timer_get_time()` in an ISR can trip the
//! interrupt watchdog), no logging, no allocation.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed,
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::GpioConfigFailed(_) => Self::HardwareConfig("GPIO config rejected"),
            HwInitError::LedcInitFailed => Self::HardwareConfig("LEDC config rejected"),
            HwInitError::IsrInstallFailed(_) => Self::HardwareConfig("ISR service install failed"),
        }
    }
}

/// All five input lines in capture-id order.
#[cfg(target_os = "espidf")]
const INPUT_GPIOS: [i32; 5] = [
    pins::BUTTON_GPIO,
    pins::ENC1_CLK_GPIO,
    pins::ENC1_DT_GPIO,
    pins::ENC2_CLK_GPIO,
    pins::ENC2_DT_GPIO,
];

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the worker starts; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_ledc();
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Interrupts stay disabled until arm_input_interrupts(); the worker
    // must be ready before the first edge can be captured.
    for &pin in &INPUT_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: input GPIOs configured (pull-up, interrupts disabled)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> u8 {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) as u8 & 1
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> u8 {
    // Pull-up idle levels: button released, encoders at detent.
    1
}

// ── LEDC PWM (status LED) ─────────────────────────────────────

pub const LEDC_CH_LED_R: u32 = 0;
pub const LEDC_CH_LED_G: u32 = 1;
pub const LEDC_CH_LED_B: u32 = 2;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() {
    // SAFETY: Called from the single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    unsafe {
        ledc_timer_config(&timer0);
    }

    let led_gpios = [pins::LED_R_GPIO, pins::LED_G_GPIO, pins::LED_B_GPIO];
    for (i, &gpio) in led_gpios.iter().enumerate() {
        unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel: LEDC_CH_LED_R + i as u32,
                timer_sel: ledc_timer_t_LEDC_TIMER_0,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            });
        }
    }

    info!("hw_init: LEDC configured (led=CH0-2)");
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::events::Line;
#[cfg(target_os = "espidf")]
use crate::input::capture::CAPTURE_QUEUE;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn input_line_isr(arg: *mut core::ffi::c_void) {
    // The registered argument encodes the line id; the level is read
    // fresh so a missed intermediate transition still leaves the queue
    // consistent with the hardware.
    let raw = arg as usize as u8;
    let Some(line) = Line::from_u8(raw) else {
        return;
    };
    // SAFETY: gpio_get_level is a register read; safe in ISR context.
    let level = (unsafe { gpio_get_level(INPUT_GPIOS[raw as usize]) }) as u8 & 1;
    // Queue full ⇒ silent drop, by design.
    let _ = CAPTURE_QUEUE.push(line, level);
}

/// Install the per-pin GPIO ISR service and register any-edge handlers
/// for the five input lines.  Call after [`init_peripherals`], once the
/// worker is ready to consume.
#[cfg(target_os = "espidf")]
pub fn arm_input_interrupts() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handlers registered
    // below only read a GPIO level and push to the lock-free capture queue.
    unsafe {
        let ret = gpio_install_isr_service(ESP_INTR_FLAG_IRAM as i32);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (id, &pin) in INPUT_GPIOS.iter().enumerate() {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_ANYEDGE);
            let ret = gpio_isr_handler_add(pin, Some(input_line_isr), id as *mut core::ffi::c_void);
            if ret != ESP_OK as i32 {
                return Err(HwInitError::IsrInstallFailed(ret));
            }
            gpio_intr_enable(pin);
        }

        info!("hw_init: input interrupts armed (button, enc1×2, enc2×2)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn arm_input_interrupts() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): interrupt arm skipped");
    Ok(())
}
