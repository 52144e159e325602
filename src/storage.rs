//! Persistent configuration: brightness, RA target and calibration date.
//!
//! Values live in a byte-addressable non-volatile store (an I²C FRAM on
//! the device) as fixed records at the offsets in [`crate::config`]:
//!
//! ```text
//! [marker][payload 0]..[payload N-1]
//! ```
//!
//! A write first sets the marker to `MARKER_INVALID`, then writes the
//! payload, then sets the marker to `MARKER_VALID`. A reader arriving
//! between any two steps (or after a power cut) sees an invalid record and
//! falls back to the default, never a half-written payload.
//!
//! [`ConfigStore`] caches each value in memory after the first read or
//! successful write, minimising bus traffic.

use crate::config::{
    DEFAULT_BRIGHTNESS, DEFAULT_CALIBRATION_DATE, DEFAULT_RA_TARGET, MARKER_INVALID, MARKER_VALID,
    MAX_STORED_BYTE, OFFSET_BRIGHTNESS, OFFSET_CALIBRATION_DATE, OFFSET_RA_TARGET,
};
use crate::error::{Error, Result};
use crate::types::{Brightness, CalibrationDate, RaValue};

/// Largest record payload (bytes).
const MAX_PAYLOAD: usize = 2;

/// A byte-addressable non-volatile device.
pub trait NvStore {
    fn read_byte(&mut self, offset: u16) -> Result<u8>;

    /// Write one byte. An unacknowledged write is reported as
    /// [`Error::StoreWrite`].
    fn write_byte(&mut self, offset: u16, value: u8) -> Result<()>;
}

impl<T: NvStore + ?Sized> NvStore for &mut T {
    fn read_byte(&mut self, offset: u16) -> Result<u8> {
        (**self).read_byte(offset)
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<()> {
        (**self).write_byte(offset, value)
    }
}

/// RAM-backed store, zero-filled (every marker invalid) when created.
pub struct MemoryStore<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> MemoryStore<N> {
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NvStore for MemoryStore<N> {
    fn read_byte(&mut self, offset: u16) -> Result<u8> {
        self.bytes
            .get(offset as usize)
            .copied()
            .ok_or(Error::StoreOffset { offset })
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<()> {
        let slot = self
            .bytes
            .get_mut(offset as usize)
            .ok_or(Error::StoreOffset { offset })?;
        *slot = value;
        Ok(())
    }
}

/// A value persisted as one marker byte plus a fixed-size payload.
pub trait ConfigRecord: Copy {
    /// Offset of the marker; the payload follows immediately.
    const OFFSET: u16;
    /// Payload length in bytes.
    const LEN: usize;
    /// Short name for log output.
    const NAME: &'static str;

    fn default_value() -> Self;

    fn encode(&self, payload: &mut [u8]);

    /// `None` if the payload does not describe a valid value.
    fn decode(payload: &[u8]) -> Option<Self>;
}

impl ConfigRecord for Brightness {
    const OFFSET: u16 = OFFSET_BRIGHTNESS;
    const LEN: usize = 1;
    const NAME: &'static str = "brightness";

    fn default_value() -> Self {
        Brightness::new(DEFAULT_BRIGHTNESS).unwrap_or(Brightness::MIN)
    }

    fn encode(&self, payload: &mut [u8]) {
        payload[0] = self.level();
    }

    fn decode(payload: &[u8]) -> Option<Self> {
        Brightness::new(payload[0])
    }
}

impl ConfigRecord for RaValue {
    const OFFSET: u16 = OFFSET_RA_TARGET;
    const LEN: usize = 2;
    const NAME: &'static str = "ra-target";

    fn default_value() -> Self {
        let (hour, minute) = DEFAULT_RA_TARGET;
        RaValue::new(hour, minute).unwrap_or(RaValue::from_minutes(0))
    }

    fn encode(&self, payload: &mut [u8]) {
        payload[0] = self.hour();
        payload[1] = self.minute();
    }

    fn decode(payload: &[u8]) -> Option<Self> {
        RaValue::new(payload[0], payload[1])
    }
}

impl ConfigRecord for CalibrationDate {
    const OFFSET: u16 = OFFSET_CALIBRATION_DATE;
    const LEN: usize = 2;
    const NAME: &'static str = "calibration-date";

    fn default_value() -> Self {
        let (day, month) = DEFAULT_CALIBRATION_DATE;
        CalibrationDate::new(day, month).unwrap_or(CalibrationDate::MIN)
    }

    fn encode(&self, payload: &mut [u8]) {
        payload[0] = self.day();
        payload[1] = self.month();
    }

    fn decode(payload: &[u8]) -> Option<Self> {
        CalibrationDate::new(payload[0], payload[1])
    }
}

/// Cached, crash-consistent accessor for the persisted configuration.
pub struct ConfigStore<S> {
    store: S,
    brightness: Option<Brightness>,
    ra_target: Option<RaValue>,
    calibration_date: Option<CalibrationDate>,
}

impl<S: NvStore> ConfigStore<S> {
    /// Wrap a store. Nothing is read until the first accessor call.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            brightness: None,
            ra_target: None,
            calibration_date: None,
        }
    }

    pub fn read_brightness(&mut self) -> Result<Brightness> {
        read_cached(&mut self.store, &mut self.brightness)
    }

    pub fn write_brightness(&mut self, brightness: Brightness) -> Result<()> {
        write_cached(&mut self.store, &mut self.brightness, brightness)
    }

    pub fn read_ra_target(&mut self) -> Result<RaValue> {
        read_cached(&mut self.store, &mut self.ra_target)
    }

    pub fn write_ra_target(&mut self, ra_target: RaValue) -> Result<()> {
        write_cached(&mut self.store, &mut self.ra_target, ra_target)
    }

    pub fn read_calibration_date(&mut self) -> Result<CalibrationDate> {
        read_cached(&mut self.store, &mut self.calibration_date)
    }

    pub fn write_calibration_date(&mut self, calibration_date: CalibrationDate) -> Result<()> {
        write_cached(&mut self.store, &mut self.calibration_date, calibration_date)
    }

    /// Invalidate every record. Payload bytes are left in place; the next
    /// read of each value writes and returns its default.
    pub fn clear(&mut self) -> Result<()> {
        info!("ConfigStore: clearing all records");
        self.brightness = None;
        self.ra_target = None;
        self.calibration_date = None;
        self.store.write_byte(Brightness::OFFSET, MARKER_INVALID)?;
        self.store.write_byte(RaValue::OFFSET, MARKER_INVALID)?;
        self.store.write_byte(CalibrationDate::OFFSET, MARKER_INVALID)?;
        Ok(())
    }

    /// Give the underlying store back.
    pub fn release(self) -> S {
        self.store
    }
}

fn read_cached<S: NvStore, R: ConfigRecord>(store: &mut S, cache: &mut Option<R>) -> Result<R> {
    if let Some(value) = *cache {
        return Ok(value);
    }

    if let Some(value) = read_record::<S, R>(store)? {
        *cache = Some(value);
        return Ok(value);
    }

    warn!("ConfigStore: {} record invalid, writing default", R::NAME);
    let value = R::default_value();
    write_cached(store, cache, value)?;
    Ok(value)
}

fn read_record<S: NvStore, R: ConfigRecord>(store: &mut S) -> Result<Option<R>> {
    if store.read_byte(R::OFFSET)? != MARKER_VALID {
        return Ok(None);
    }

    let mut payload = [0u8; MAX_PAYLOAD];
    for (i, byte) in payload[..R::LEN].iter_mut().enumerate() {
        *byte = store.read_byte(R::OFFSET + 1 + i as u16)?;
    }

    let value = R::decode(&payload[..R::LEN]);
    if value.is_none() {
        warn!("ConfigStore: {} payload out of range", R::NAME);
    }
    Ok(value)
}

fn write_cached<S: NvStore, R: ConfigRecord>(
    store: &mut S,
    cache: &mut Option<R>,
    value: R,
) -> Result<()> {
    let mut payload = [0u8; MAX_PAYLOAD];
    value.encode(&mut payload[..R::LEN]);

    let result = write_record(store, R::OFFSET, &payload[..R::LEN]);
    match result {
        Ok(()) => {
            debug!("ConfigStore: wrote {}", R::NAME);
            *cache = Some(value);
        }
        Err(e) => {
            error!("ConfigStore: {} write failed: {}", R::NAME, e);
            // The durable record may now be invalid; force a re-read.
            *cache = None;
        }
    }
    result
}

fn write_record<S: NvStore>(store: &mut S, offset: u16, payload: &[u8]) -> Result<()> {
    if let Some(&value) = payload.iter().find(|&&b| b > MAX_STORED_BYTE) {
        return Err(Error::StoreValue { value });
    }

    store.write_byte(offset, MARKER_INVALID)?;
    for (i, &byte) in payload.iter().enumerate() {
        store.write_byte(offset + 1 + i as u16, byte)?;
    }
    store.write_byte(offset, MARKER_VALID)
}
