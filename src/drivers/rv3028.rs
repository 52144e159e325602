//! Micro Crystal RV-3028-C7 real-time clock.
//!
//! Time registers are BCD. The device counts weekdays from 0; the rest of
//! the crate counts from 1, so the driver translates on both paths. Years
//! are stored as an offset from 2000.

use embedded_hal::i2c::I2c;

use crate::error::{Error, Result};
use crate::types::DateTime;
use crate::ui::Clock;

// =============================================================================
// I2C Address
// =============================================================================

pub const I2C_ADDR: u8 = 0x52;

// =============================================================================
// Register Addresses
// =============================================================================

// Clock registers, read and written as one burst starting at SECONDS
pub const REG_SECONDS: u8 = 0x00;
pub const REG_MINUTES: u8 = 0x01;
pub const REG_HOURS: u8 = 0x02;
pub const REG_WEEKDAY: u8 = 0x03;
pub const REG_DATE: u8 = 0x04;
pub const REG_MONTH: u8 = 0x05;
pub const REG_YEAR: u8 = 0x06;

pub const REG_CONTROL_2: u8 = 0x10;
/// RAM mirror of the EEPROM backup configuration.
pub const REG_EEPROM_BACKUP: u8 = 0x37;

// =============================================================================
// Bit Fields
// =============================================================================

/// CONTROL_2: set selects 12-hour mode.
pub const CONTROL_2_12_24: u8 = 1 << 1;

/// EEPROM_BACKUP: backup switchover mode, bits 3:2.
pub const BACKUP_BSM_SHIFT: u8 = 2;
pub const BACKUP_BSM_MASK: u8 = 0b11 << BACKUP_BSM_SHIFT;
/// Level switching mode: VBACKUP takes over whenever VDD drops below it.
pub const BSM_LEVEL_SWITCHING: u8 = 3;

const CLOCK_REGISTERS: usize = (REG_YEAR - REG_SECONDS + 1) as usize;
const YEAR_BASE: u16 = 2000;

const fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

const fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

pub struct Rv3028<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Rv3028<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Put the clock in 24-hour mode and enable level-switching backup so
    /// it keeps time from the coin cell.
    pub fn init(&mut self) -> Result<()> {
        let control = self.read_register(REG_CONTROL_2)?;
        self.write_register(REG_CONTROL_2, control & !CONTROL_2_12_24)?;

        let backup = self.read_register(REG_EEPROM_BACKUP)?;
        let backup = (backup & !BACKUP_BSM_MASK) | (BSM_LEVEL_SWITCHING << BACKUP_BSM_SHIFT);
        self.write_register(REG_EEPROM_BACKUP, backup)?;

        info!("RTC: 24-hour mode, backup switchover enabled");
        Ok(())
    }

    fn read_register(&mut self, register: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|_| Error::Clock)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| Error::Clock)
    }
}

impl<I2C: I2c> Clock for Rv3028<I2C> {
    fn now(&mut self) -> Result<DateTime> {
        let mut regs = [0u8; CLOCK_REGISTERS];
        self.i2c
            .write_read(self.address, &[REG_SECONDS], &mut regs)
            .map_err(|_| {
                error!("RTC: read failed");
                Error::Clock
            })?;

        let [seconds, minutes, hours, weekday, date, month, year] = regs;
        DateTime::new(
            YEAR_BASE + from_bcd(year) as u16,
            from_bcd(month & 0x1F),
            from_bcd(date & 0x3F),
            (weekday & 0x07) + 1,
            from_bcd(hours & 0x3F),
            from_bcd(minutes & 0x7F),
            from_bcd(seconds & 0x7F),
        )
        .ok_or_else(|| {
            warn!("RTC: registers {} are not a date-time", regs);
            Error::ClockData
        })
    }

    fn set(&mut self, datetime: DateTime) -> Result<()> {
        let year = datetime
            .year()
            .checked_sub(YEAR_BASE)
            .filter(|y| *y < 100)
            .ok_or(Error::ClockData)? as u8;
        let burst = [
            REG_SECONDS,
            to_bcd(datetime.second()),
            to_bcd(datetime.minute()),
            to_bcd(datetime.hour()),
            datetime.weekday() - 1,
            to_bcd(datetime.day()),
            to_bcd(datetime.month()),
            to_bcd(year),
        ];
        self.i2c.write(self.address, &burst).map_err(|_| {
            error!("RTC: set failed");
            Error::Clock
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBus;

    fn rtc_with(regs: [u8; 7]) -> Rv3028<FakeBus> {
        let mut bus = FakeBus::new(I2C_ADDR, 1, 0x40);
        bus.memory[..7].copy_from_slice(&regs);
        Rv3028::new(bus, I2C_ADDR)
    }

    #[test]
    fn bcd_conversion() {
        assert_eq!(from_bcd(0x59), 59);
        assert_eq!(to_bcd(23), 0x23);
        for v in 0..100 {
            assert_eq!(from_bcd(to_bcd(v)), v);
        }
    }

    #[test]
    fn reads_bcd_registers() {
        // 2024-03-09 (Saturday, device weekday 5) 21:47:05
        let mut rtc = rtc_with([0x05, 0x47, 0x21, 5, 0x09, 0x03, 0x24]);
        let now = rtc.now().unwrap();
        assert_eq!(now, DateTime::new(2024, 3, 9, 6, 21, 47, 5).unwrap());
    }

    #[test]
    fn set_writes_one_burst() {
        let mut rtc = rtc_with([0; 7]);
        let dt = DateTime::new(2025, 12, 31, 1, 8, 16, 0).unwrap();
        rtc.set(dt).unwrap();
        assert_eq!(rtc.now().unwrap(), dt);
        let bus = rtc.release();
        assert_eq!(bus.writes[0], [REG_SECONDS, 0x00, 0x16, 0x08, 0, 0x31, 0x12, 0x25]);
    }

    #[test]
    fn impossible_registers_are_clock_data() {
        // 31 February
        let mut rtc = rtc_with([0, 0, 0, 0, 0x31, 0x02, 0x24]);
        assert_eq!(rtc.now(), Err(Error::ClockData));
    }

    #[test]
    fn year_outside_the_century_is_rejected() {
        let mut rtc = rtc_with([0; 7]);
        let dt = DateTime::new(1999, 1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(rtc.set(dt), Err(Error::ClockData));
        assert!(rtc.release().writes.is_empty());
    }

    #[test]
    fn init_selects_24_hour_and_level_switching() {
        let mut bus = FakeBus::new(I2C_ADDR, 1, 0x40);
        bus.memory[REG_CONTROL_2 as usize] = CONTROL_2_12_24 | 0x01;
        bus.memory[REG_EEPROM_BACKUP as usize] = 0b1000_0001;
        let mut rtc = Rv3028::new(bus, I2C_ADDR);
        rtc.init().unwrap();
        let bus = rtc.release();
        assert_eq!(bus.memory[REG_CONTROL_2 as usize], 0x01);
        assert_eq!(bus.memory[REG_EEPROM_BACKUP as usize], 0b1000_1101);
    }

    #[test]
    fn bus_failure_is_clock_error() {
        let mut bus = FakeBus::new(I2C_ADDR, 1, 0x40);
        bus.nack = true;
        let mut rtc = Rv3028::new(bus, I2C_ADDR);
        assert_eq!(rtc.now(), Err(Error::Clock));
        assert_eq!(rtc.init(), Err(Error::Clock));
    }
}
