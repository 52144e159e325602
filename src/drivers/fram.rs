//! MB85RC-family I²C FRAM.
//!
//! Byte-addressed with a 16-bit big-endian memory address. Writes take
//! effect immediately; there is no page buffer or write delay.

use embedded_hal::i2c::I2c;

use crate::config::MAX_STORED_BYTE;
use crate::error::{Error, Result};
use crate::storage::NvStore;

// =============================================================================
// I2C Address
// =============================================================================

/// Base address; A0..A2 select 0x50..=0x57.
pub const I2C_ADDR_BASE: u8 = 0x50;
pub const I2C_ADDR_LAST: u8 = 0x57;

// =============================================================================
// Geometry
// =============================================================================

/// MB85RC256V: 32 KiB.
pub const CAPACITY: u16 = 0x8000;

pub struct Mb85rc<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mb85rc<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        debug_assert!((I2C_ADDR_BASE..=I2C_ADDR_LAST).contains(&address));
        Self { i2c, address }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn check_offset(offset: u16) -> Result<[u8; 2]> {
        if offset >= CAPACITY {
            return Err(Error::StoreOffset { offset });
        }
        Ok(offset.to_be_bytes())
    }
}

impl<I2C: I2c> NvStore for Mb85rc<I2C> {
    fn read_byte(&mut self, offset: u16) -> Result<u8> {
        let pointer = Self::check_offset(offset)?;
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &pointer, &mut buf)
            .map_err(|_| {
                error!("FRAM: read at {} failed", offset);
                Error::StoreRead { offset }
            })?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<()> {
        let [hi, lo] = Self::check_offset(offset)?;
        if value > MAX_STORED_BYTE {
            return Err(Error::StoreValue { value });
        }
        self.i2c.write(self.address, &[hi, lo, value]).map_err(|_| {
            error!("FRAM: write at {} not acknowledged", offset);
            Error::StoreWrite { offset }
        })
    }
}
