//! Driven adapters — platform implementations of the port traits.

pub mod hardware;
pub mod identity;
pub mod nvs;
pub mod time;
