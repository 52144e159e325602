//! Lite-On LTP-305 dual 5x7 LED matrix, driven through its IS31FL3730
//! controller, and the four-character display built from two modules.
//!
//! Each module holds two characters. The controller keeps one frame
//! buffer per matrix; the left matrix is column-major and the right one
//! row-major, so [`Ltp305::set_pixel`] hides the difference.

use embedded_hal::i2c::I2c;

use crate::config::{DISPLAY_LEFT_ADDRESS, DISPLAY_RIGHT_ADDRESS};
use crate::error::{Error, Result};
use crate::types::Brightness;
use crate::ui::text::{blank_leading_zero, TEXT_LEN};
use crate::ui::LedDisplay;

// =============================================================================
// I2C Address
// =============================================================================

/// Jumper-selectable: 0x61, 0x62 or 0x63.
pub const I2C_ADDR_DEFAULT: u8 = 0x61;

// =============================================================================
// Commands
// =============================================================================

pub const CMD_MODE: u8 = 0x00;
pub const CMD_MATRIX_R: u8 = 0x01;
pub const CMD_UPDATE: u8 = 0x0C;
pub const CMD_OPTIONS: u8 = 0x0D;
pub const CMD_MATRIX_L: u8 = 0x0E;
pub const CMD_BRIGHTNESS: u8 = 0x19;

/// Both matrices enabled, 8x8.
pub const MODE: u8 = 0b0001_1000;
/// 35 mA drive.
pub const OPTIONS: u8 = 0b0000_1110;
pub const UPDATE: u8 = 0x01;

/// PWM register value for full brightness.
pub const FULL_SCALE_BRIGHTNESS: u8 = 127;

// =============================================================================
// Geometry
// =============================================================================

pub const CHAR_WIDTH: usize = 5;
const ROWS: usize = 8;

/// Column bitmaps for a character, bit 0 at the top.
pub fn glyph(c: char) -> Option<[u8; CHAR_WIDTH]> {
    let columns = match c {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00],
        // Squared-off zero, same as 'O'
        '0' => [0x3e, 0x41, 0x41, 0x41, 0x3e],
        '1' => [0x00, 0x42, 0x7f, 0x40, 0x00],
        '2' => [0x42, 0x61, 0x51, 0x49, 0x46],
        '3' => [0x21, 0x41, 0x45, 0x4b, 0x31],
        '4' => [0x18, 0x14, 0x12, 0x7f, 0x10],
        '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
        '6' => [0x3c, 0x4a, 0x49, 0x49, 0x30],
        '7' => [0x01, 0x71, 0x09, 0x05, 0x03],
        '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
        '9' => [0x06, 0x49, 0x49, 0x29, 0x1e],

        'A' => [0x7e, 0x11, 0x11, 0x11, 0x7e],
        'B' => [0x7f, 0x49, 0x49, 0x49, 0x36],
        'C' => [0x3e, 0x41, 0x41, 0x41, 0x22],
        'D' => [0x7f, 0x41, 0x41, 0x22, 0x1c],
        'E' => [0x7f, 0x49, 0x49, 0x49, 0x41],
        'F' => [0x7f, 0x09, 0x09, 0x01, 0x01],
        'G' => [0x3e, 0x41, 0x41, 0x51, 0x32],
        'H' => [0x7f, 0x08, 0x08, 0x08, 0x7f],
        'I' => [0x00, 0x41, 0x7f, 0x41, 0x00],
        'J' => [0x20, 0x40, 0x41, 0x3f, 0x01],
        'K' => [0x7f, 0x08, 0x14, 0x22, 0x41],
        'L' => [0x7f, 0x40, 0x40, 0x40, 0x40],
        'M' => [0x7f, 0x02, 0x04, 0x02, 0x7f],
        'N' => [0x7f, 0x04, 0x08, 0x10, 0x7f],
        'O' => [0x3e, 0x41, 0x41, 0x41, 0x3e],
        'P' => [0x7f, 0x09, 0x09, 0x09, 0x06],
        'Q' => [0x3e, 0x41, 0x51, 0x21, 0x5e],
        'R' => [0x7f, 0x09, 0x19, 0x29, 0x46],
        'S' => [0x46, 0x49, 0x49, 0x49, 0x31],
        'T' => [0x01, 0x01, 0x7f, 0x01, 0x01],
        'U' => [0x3f, 0x40, 0x40, 0x40, 0x3f],
        'V' => [0x1f, 0x20, 0x40, 0x20, 0x1f],
        'W' => [0x7f, 0x20, 0x18, 0x20, 0x7f],
        'X' => [0x63, 0x14, 0x08, 0x14, 0x63],
        'Y' => [0x03, 0x04, 0x78, 0x04, 0x03],
        'Z' => [0x61, 0x51, 0x49, 0x45, 0x43],

        'a' => [0x20, 0x54, 0x54, 0x54, 0x78],
        'b' => [0x7f, 0x48, 0x44, 0x44, 0x38],
        'c' => [0x38, 0x44, 0x44, 0x44, 0x20],
        'd' => [0x38, 0x44, 0x44, 0x48, 0x7f],
        'e' => [0x38, 0x54, 0x54, 0x54, 0x18],
        'f' => [0x08, 0x7e, 0x09, 0x01, 0x02],
        'g' => [0x08, 0x14, 0x54, 0x54, 0x3c],
        'h' => [0x7f, 0x08, 0x04, 0x04, 0x78],
        'i' => [0x00, 0x44, 0x7d, 0x40, 0x00],
        'j' => [0x20, 0x40, 0x44, 0x3d, 0x00],
        'k' => [0x00, 0x7f, 0x10, 0x28, 0x44],
        'l' => [0x00, 0x41, 0x7f, 0x40, 0x00],
        'm' => [0x7c, 0x04, 0x18, 0x04, 0x78],
        'n' => [0x7c, 0x08, 0x04, 0x04, 0x78],
        'o' => [0x38, 0x44, 0x44, 0x44, 0x38],
        'p' => [0x7c, 0x14, 0x14, 0x14, 0x08],
        'q' => [0x08, 0x14, 0x14, 0x18, 0x7c],
        'r' => [0x7c, 0x08, 0x04, 0x04, 0x08],
        's' => [0x48, 0x54, 0x54, 0x54, 0x20],
        't' => [0x04, 0x3f, 0x44, 0x40, 0x20],
        'u' => [0x3c, 0x40, 0x40, 0x20, 0x7c],
        'v' => [0x1c, 0x20, 0x40, 0x20, 0x1c],
        'w' => [0x3c, 0x40, 0x30, 0x40, 0x3c],
        'x' => [0x44, 0x28, 0x10, 0x28, 0x44],
        'y' => [0x0c, 0x50, 0x50, 0x50, 0x3c],
        'z' => [0x44, 0x64, 0x54, 0x4c, 0x44],
        _ => return None,
    };
    Some(columns)
}

/// One LTP-305 module: two characters side by side.
pub struct Ltp305<I2C> {
    i2c: I2C,
    address: u8,
    left: [u8; ROWS],
    right: [u8; ROWS],
    brightness: u8,
}

impl<I2C: I2c> Ltp305<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            left: [0; ROWS],
            right: [0; ROWS],
            brightness: Brightness::MIN.to_register(FULL_SCALE_BRIGHTNESS),
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Blank the frame buffers. Takes effect on the next [`show`](Self::show).
    pub fn clear(&mut self) {
        self.left = [0; ROWS];
        self.right = [0; ROWS];
    }

    /// Draw two characters into the frame buffers.
    pub fn set_pair(&mut self, first: char, second: char) -> Result<()> {
        self.set_character(0, first)?;
        self.set_character(CHAR_WIDTH, second)
    }

    pub fn set_character(&mut self, x: usize, c: char) -> Result<()> {
        let Some(columns) = glyph(c) else {
            warn!("LTP305: no glyph for {}", c);
            return Err(Error::DisplayText);
        };
        for (dx, column) in columns.iter().enumerate() {
            for y in 0..ROWS {
                self.set_pixel(x + dx, y, column & (1 << y) != 0);
            }
        }
        Ok(())
    }

    /// `x` in 0..10, `y` in 0..8.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let (byte, bit) = if x < CHAR_WIDTH {
            (&mut self.left[x], y)
        } else {
            (&mut self.right[y], x - CHAR_WIDTH)
        };
        if on {
            *byte |= 1 << bit;
        } else {
            *byte &= !(1 << bit);
        }
    }

    /// Write the new level straight to the controller.
    pub fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        self.brightness = brightness.to_register(FULL_SCALE_BRIGHTNESS);
        self.command(CMD_BRIGHTNESS, &[self.brightness])
    }

    /// Push both frame buffers and latch them.
    pub fn show(&mut self) -> Result<()> {
        let (left, right) = (self.left, self.right);
        self.command(CMD_MATRIX_L, &left)?;
        self.command(CMD_MATRIX_R, &right)?;
        self.command(CMD_MODE, &[MODE])?;
        self.command(CMD_OPTIONS, &[OPTIONS])?;
        self.command(CMD_BRIGHTNESS, &[self.brightness])?;
        self.command(CMD_UPDATE, &[UPDATE])
    }

    fn command(&mut self, command: u8, data: &[u8]) -> Result<()> {
        let mut buf = [0u8; ROWS + 1];
        buf[0] = command;
        buf[1..=data.len()].copy_from_slice(data);
        self.i2c
            .write(self.address, &buf[..=data.len()])
            .map_err(|_| {
                error!("LTP305 {=u8:#x}: command {=u8:#x} failed", self.address, command);
                Error::Display
            })
    }
}

/// The four-character `HHMM` display: two modules, left then right.
pub struct PairDisplay<I2C> {
    left: Ltp305<I2C>,
    right: Ltp305<I2C>,
}

impl<I2C: I2c> PairDisplay<I2C> {
    pub fn new(left: Ltp305<I2C>, right: Ltp305<I2C>) -> Self {
        Self { left, right }
    }

    /// Both modules on their usual addresses.
    pub fn with_default_addresses(left: I2C, right: I2C) -> Self {
        Self::new(
            Ltp305::new(left, DISPLAY_LEFT_ADDRESS),
            Ltp305::new(right, DISPLAY_RIGHT_ADDRESS),
        )
    }

    pub fn release(self) -> (Ltp305<I2C>, Ltp305<I2C>) {
        (self.left, self.right)
    }
}

impl<I2C: I2c> LedDisplay for PairDisplay<I2C> {
    fn show(&mut self, text: &str) -> Result<()> {
        if text.chars().count() != TEXT_LEN {
            return Err(Error::DisplayText);
        }
        let text = blank_leading_zero(text);
        let mut chars = [' '; TEXT_LEN];
        for (slot, c) in chars.iter_mut().zip(text.chars()) {
            *slot = c;
        }

        self.left.set_pair(chars[0], chars[1])?;
        self.right.set_pair(chars[2], chars[3])?;
        self.left.show()?;
        self.right.show()
    }

    fn clear(&mut self, left: bool, right: bool) -> Result<()> {
        if left {
            self.left.clear();
            self.left.show()?;
        }
        if right {
            self.right.clear();
            self.right.show()?;
        }
        Ok(())
    }

    fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        self.left.set_brightness(brightness)?;
        self.right.set_brightness(brightness)
    }
}
