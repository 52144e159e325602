//! RA drift compensation for a manually driven equatorial mount.
//!
//! A polar-aligned mount's RA setting circle is fixed relative to the
//! date it was calibrated. Stars drift ~4 minutes of RA per day, so the
//! dial reading for a target changes with the date and time. This crate
//! keeps the corrected reading on a four-character LED display and lets
//! the observer browse and edit the target, clock, calibration date and
//! brightness with four buttons.
//!
//! The logic is hardware independent and tested on the host:
//!
//! | Module           | Role                                              |
//! |------------------|---------------------------------------------------|
//! | [`compensation`] | corrected RA from target, calibration and clock   |
//! | [`storage`]      | crash-consistent settings in byte-wise NV memory   |
//! | [`channel`]      | single-slot coalescing command mailbox            |
//! | [`input`]        | debounced short/long press classification         |
//! | [`ui`]           | display state machine, edit buffer, renderings    |
//! | [`app`]          | startup spinner, control loop, shutdown           |
//! | [`drivers`]      | FRAM, RTC and LED matrix drivers (embedded-hal)   |
//!
//! With the `embedded` feature, `hw` adds the Embassy tasks that turn
//! GPIO edges and timer expiry into commands; `main.rs` wires it all up
//! on an nRF52840.
//!
//! Usage: `cargo test --lib`

#![cfg_attr(not(test), no_std)]

// Must come first: the logging macros are textually scoped.
#[macro_use]
mod fmt;

pub mod app;
pub mod channel;
pub mod compensation;
pub mod config;
pub mod drivers;
pub mod error;
pub mod input;
pub mod storage;
pub mod ticker;
pub mod types;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod hw;

#[cfg(test)]
mod testing;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use app::Shutdown;
pub use channel::CommandMailbox;
pub use compensation::Compensation;
pub use error::{Error, Result};
pub use input::{Button, PressClassifier};
pub use storage::{ConfigStore, NvStore};
pub use ticker::TickerControl;
pub use types::{Brightness, CalibrationDate, DateTime, RaValue};
pub use ui::{Clock, Command, Flow, LedDisplay, StateMachine, Ticker, UiState};
