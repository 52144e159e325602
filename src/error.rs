//! Unified error type for ra-compensator.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

use thiserror_no_std::Error;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Non-volatile store
    /// A byte write was not acknowledged by the store.
    #[error("store did not acknowledge write at offset {offset}")]
    StoreWrite { offset: u16 },

    /// A byte read transaction failed.
    #[error("store read failed at offset {offset}")]
    StoreRead { offset: u16 },

    /// Offset lies outside the device.
    #[error("offset {offset} is outside the store")]
    StoreOffset { offset: u16 },

    /// Only 7-bit values are persisted.
    #[error("value {value} cannot be stored")]
    StoreValue { value: u8 },

    // Clock
    /// I²C transaction to the RTC failed.
    #[error("clock transaction failed")]
    Clock,

    /// The RTC returned a date-time that does not exist.
    #[error("clock returned an invalid date-time")]
    ClockData,

    // Display
    /// I²C transaction to a display module failed.
    #[error("display transaction failed")]
    Display,

    /// Text handed to the display was not exactly 4 characters.
    #[error("display text must be 4 characters")]
    DisplayText,
}

pub type Result<T> = core::result::Result<T, Error>;
