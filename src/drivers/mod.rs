//! Hardware initialisation and peripheral helpers.

pub mod hw_init;
pub mod status_led;
pub mod task_pin;
