//! Host fakes for the collaborator traits, shared by unit tests.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::storage::{MemoryStore, NvStore};
use crate::types::{Brightness, DateTime};
use crate::ui::{Clock, LedDisplay, Ticker};

#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Text(String),
    Clear(bool, bool),
    Brightness(u8),
}

/// Records every request; optionally fails them all.
#[derive(Default)]
pub struct RecordingDisplay {
    pub log: Vec<Shown>,
    pub broken: bool,
}

impl RecordingDisplay {
    pub fn last_text(&self) -> Option<&str> {
        self.log.iter().rev().find_map(|s| match s {
            Shown::Text(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn texts(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|s| match s {
                Shown::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.broken {
            Err(Error::Display)
        } else {
            Ok(())
        }
    }
}

impl LedDisplay for RecordingDisplay {
    fn show(&mut self, text: &str) -> Result<()> {
        self.check()?;
        if text.chars().count() != 4 {
            return Err(Error::DisplayText);
        }
        self.log.push(Shown::Text(text.to_string()));
        Ok(())
    }

    fn clear(&mut self, left: bool, right: bool) -> Result<()> {
        self.check()?;
        self.log.push(Shown::Clear(left, right));
        Ok(())
    }

    fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        self.check()?;
        self.log.push(Shown::Brightness(brightness.level()));
        Ok(())
    }
}

pub struct FixedClock {
    pub now: DateTime,
    pub sets: usize,
}

impl FixedClock {
    pub fn at(now: DateTime) -> Self {
        Self { now, sets: 0 }
    }
}

impl Clock for FixedClock {
    fn now(&mut self) -> Result<DateTime> {
        Ok(self.now)
    }

    fn set(&mut self, datetime: DateTime) -> Result<()> {
        self.now = datetime;
        self.sets += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTicker {
    pub period: Option<u64>,
    pub starts: usize,
}

impl Ticker for RecordingTicker {
    fn start(&mut self, period_ms: u64) {
        self.period = Some(period_ms);
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.period = None;
    }
}

/// Memory store whose writes fail while `fail` is set.
pub struct FlakyStore {
    pub inner: MemoryStore<16>,
    pub fail: Rc<Cell<bool>>,
}

impl NvStore for FlakyStore {
    fn read_byte(&mut self, offset: u16) -> Result<u8> {
        self.inner.read_byte(offset)
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<()> {
        if self.fail.get() {
            return Err(Error::StoreWrite { offset });
        }
        self.inner.write_byte(offset, value)
    }
}

/// 3 January 2024 at midnight: the default calibration day.
pub fn calibration_midnight() -> DateTime {
    DateTime::new(2024, 1, 3, 3, 0, 0, 0).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError;

impl embedded_hal::i2c::Error for BusError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        embedded_hal::i2c::ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Data,
        )
    }
}

/// Scripted I2C device: the first `pointer_width` bytes of each write set
/// an auto-incrementing address pointer, remaining bytes are stored, and
/// reads return memory from the pointer.
pub struct FakeBus {
    pub address: u8,
    pub pointer_width: usize,
    pub memory: Vec<u8>,
    pub writes: Vec<Vec<u8>>,
    pub nack: bool,
    pointer: usize,
}

impl FakeBus {
    pub fn new(address: u8, pointer_width: usize, size: usize) -> Self {
        Self {
            address,
            pointer_width,
            memory: vec![0; size],
            writes: Vec::new(),
            nack: false,
            pointer: 0,
        }
    }
}

impl embedded_hal::i2c::ErrorType for FakeBus {
    type Error = BusError;
}

impl embedded_hal::i2c::I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal::i2c::Operation<'_>],
    ) -> core::result::Result<(), BusError> {
        if self.nack || address != self.address {
            return Err(BusError);
        }
        for operation in operations {
            match operation {
                embedded_hal::i2c::Operation::Write(bytes) => {
                    self.writes.push(bytes.to_vec());
                    if bytes.len() < self.pointer_width {
                        continue;
                    }
                    let (pointer, data) = bytes.split_at(self.pointer_width);
                    self.pointer = pointer.iter().fold(0, |acc, &b| (acc << 8) | b as usize);
                    for &b in data {
                        self.memory[self.pointer] = b;
                        self.pointer += 1;
                    }
                }
                embedded_hal::i2c::Operation::Read(buffer) => {
                    for b in buffer.iter_mut() {
                        *b = self.memory[self.pointer];
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
