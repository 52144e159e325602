//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, defaults and the
//! persisted memory map live here so they can be tuned in one place.

// Calendar

/// Minutes in one day.
pub const DAY_MINUTES: u16 = 1_440;

/// Sidereal drift per whole day since calibration (minutes).
pub const DRIFT_MINUTES_PER_DAY: u16 = 4;

/// One minute of sub-day drift is added per this many clock hours.
pub const SUB_DAY_DRIFT_HOURS: u8 = 6;

// Buttons

/// What constitutes a 'long' button press (ms).
///
/// Observed firmware variants use 2000 ms and 3000 ms.
pub const LONG_PRESS_MS: u64 = 2_000;

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Interval between level re-checks while a long-press button is held (ms).
pub const BUTTON_POLL_MS: u64 = 50;

// Ticker / idle

/// Period of the ticker while something is displayed (ms).
pub const TICK_PERIOD_MS: u64 = 500;

/// Ticks without interaction before a display returns to idle (8 = 4 s).
pub const HOLD_TICKS: u8 = 8;

/// Delay between startup spinner frames (ms).
pub const SPINNER_FRAME_MS: u64 = 250;

/// Pause on the blank frame after the spinner (ms).
pub const SPINNER_SETTLE_MS: u64 = 1_000;

// Display brightness

/// Dimmest brightness level.
pub const MIN_BRIGHTNESS: u8 = 1;

/// Full-intensity brightness level.
pub const MAX_BRIGHTNESS: u8 = 20;

// Defaults (written on first boot or after an erase)

/// Default brightness (dimmest, kind to dark-adapted eyes).
pub const DEFAULT_BRIGHTNESS: u8 = MIN_BRIGHTNESS;

/// Default target RA: Capella, 05h16m.
pub const DEFAULT_RA_TARGET: (u8, u8) = (5, 16);

/// Default calibration date: 3 January (day, month).
pub const DEFAULT_CALIBRATION_DATE: (u8, u8) = (3, 1);

// I²C devices
//
//   FRAM (MB85RC256V)       → 0x50 (0x50..=0x57 strappable)
//   RTC (RV3028)            → 0x52
//   LED matrix pair (LTP305) → 0x61 left, 0x62 right (0x61..=0x63)
//
// All four share one bus at 100 kHz.

pub const FRAM_ADDRESS: u8 = 0x50;
pub const RTC_ADDRESS: u8 = 0x52;
pub const DISPLAY_LEFT_ADDRESS: u8 = 0x61;
pub const DISPLAY_RIGHT_ADDRESS: u8 = 0x62;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Logical names only; `embassy_nrf::peripherals::*` are selected in
// `main.rs`. Buttons are active-low with internal pull-ups.
//
//   Button DISPLAY → P0.11
//   Button PROGRAM → P0.12
//   Button DOWN    → P0.24
//   Button UP      → P0.25
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

// Persisted memory map
//
// +--------+----------------------------------
// | Offset | Purpose
// +--------+----------------------------------
// | *   0  | Brightness marker
// |     1  | Brightness [1..20]
// | *   2  | RA target marker
// |     3  | RA target hours [0..23]
// |     4  | RA target minutes [0..59]
// | *   5  | Calibration date marker
// |     6  | Calibration day [1..31]
// |     7  | Calibration month [1..12]
// +--------+----------------------------------
//
// This is the on-device format. Do not reorder.

/// Base offset of our region in the non-volatile store.
pub const STORE_BASE_OFFSET: u16 = 0;

pub const OFFSET_BRIGHTNESS: u16 = STORE_BASE_OFFSET;
pub const OFFSET_RA_TARGET: u16 = STORE_BASE_OFFSET + 2;
pub const OFFSET_CALIBRATION_DATE: u16 = STORE_BASE_OFFSET + 5;

/// Marker: the following payload cannot be trusted.
pub const MARKER_INVALID: u8 = 0;

/// Marker: the following payload is complete and consistent.
pub const MARKER_VALID: u8 = 33;

/// Largest byte value the store accepts (payloads are 7-bit).
pub const MAX_STORED_BYTE: u8 = 127;
