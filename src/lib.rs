//! Cosmo Pager input firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod keymap;
pub mod pins;
pub mod ports;

// Re-export the ESP-IDF-facing modules so the crate compiles on host
// targets; the actual implementations are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
