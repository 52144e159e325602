//! The value under edit and its flashing half.

use crate::config::DAY_MINUTES;
use crate::types::{CalibrationDate, DateTime, RaValue};

use super::text::{self, Text};
use super::UiState;

/// Which half of the display is being edited (and flashes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Left,
    Right,
    Both,
}

impl Field {
    /// `(left, right)` participation.
    pub const fn halves(self) -> (bool, bool) {
        match self {
            Field::Left => (true, false),
            Field::Right => (false, true),
            Field::Both => (true, true),
        }
    }
}

/// Typed value being edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditValue {
    /// Left = hour, right = minute; each wraps on its own.
    RaTarget(RaValue),
    /// Hour and minute together; minutes roll into hours.
    Clock { hour: u8, minute: u8 },
    /// Left = day, right = month.
    Calibration(CalibrationDate),
}

/// State of an edit in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditBuffer {
    value: EditValue,
    field: Field,
    origin: UiState,
    left_on: bool,
    right_on: bool,
}

impl EditBuffer {
    fn new(value: EditValue, field: Field, origin: UiState) -> Self {
        Self {
            value,
            field,
            origin,
            left_on: true,
            right_on: true,
        }
    }

    /// Edit the stored target, starting with the hour.
    pub fn ra_target(target: RaValue) -> Self {
        Self::new(EditValue::RaTarget(target), Field::Left, UiState::DisplayRaTarget)
    }

    /// Edit the clock's hour and minute together.
    pub fn clock(now: &DateTime) -> Self {
        Self::new(
            EditValue::Clock {
                hour: now.hour(),
                minute: now.minute(),
            },
            Field::Both,
            UiState::DisplayClock,
        )
    }

    /// Edit the calibration date, starting with the day.
    pub fn calibration(date: CalibrationDate) -> Self {
        Self::new(
            EditValue::Calibration(date),
            Field::Left,
            UiState::DisplayCalibrationDate,
        )
    }

    pub const fn value(&self) -> EditValue {
        self.value
    }

    pub const fn field(&self) -> Field {
        self.field
    }

    /// Display state to return to when the edit ends.
    pub const fn origin(&self) -> UiState {
        self.origin
    }

    /// The program state matching the value and active field.
    pub const fn state(&self) -> UiState {
        match (self.value, self.field) {
            (EditValue::RaTarget(_), Field::Right) => UiState::ProgramRaTargetMinute,
            (EditValue::RaTarget(_), _) => UiState::ProgramRaTargetHour,
            (EditValue::Clock { .. }, _) => UiState::ProgramClock,
            (EditValue::Calibration(_), Field::Right) => UiState::ProgramCalibrationMonth,
            (EditValue::Calibration(_), _) => UiState::ProgramCalibrationDay,
        }
    }

    pub fn text(&self) -> Text {
        match self.value {
            EditValue::RaTarget(ra) => text::ra(ra),
            EditValue::Clock { hour, minute } => text::hhmm(hour, minute),
            EditValue::Calibration(date) => text::calibration(date),
        }
    }

    /// Swap between the two sub-fields. The clock has only one.
    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Left => Field::Right,
            Field::Right => Field::Left,
            Field::Both => Field::Both,
        };
    }

    pub fn up(&mut self) {
        self.step(true);
    }

    pub fn down(&mut self) {
        self.step(false);
    }

    fn step(&mut self, up: bool) {
        self.value = match (self.value, self.field) {
            (EditValue::RaTarget(ra), Field::Right) => {
                let minute = wrap(ra.minute(), up, 0, 59);
                EditValue::RaTarget(RaValue::new(ra.hour(), minute).unwrap_or(ra))
            }
            (EditValue::RaTarget(ra), _) => {
                let hour = wrap(ra.hour(), up, 0, 23);
                EditValue::RaTarget(RaValue::new(hour, ra.minute()).unwrap_or(ra))
            }
            (EditValue::Clock { hour, minute }, _) => {
                let total = hour as u16 * 60 + minute as u16;
                let total = if up {
                    (total + 1) % DAY_MINUTES
                } else {
                    (total + DAY_MINUTES - 1) % DAY_MINUTES
                };
                EditValue::Clock {
                    hour: (total / 60) as u8,
                    minute: (total % 60) as u8,
                }
            }
            (EditValue::Calibration(date), Field::Right) => {
                let month = wrap(date.month(), up, 1, 12);
                EditValue::Calibration(date.with_month(month).unwrap_or(date))
            }
            (EditValue::Calibration(date), _) => {
                let max = CalibrationDate::max_day(date.month());
                let day = wrap(date.day(), up, 1, max);
                EditValue::Calibration(CalibrationDate::new(day, date.month()).unwrap_or(date))
            }
        };
    }

    /// Advance the flash: returns which halves to blank after the text is
    /// re-shown, and flips the visibility of each active half.
    pub fn flash(&mut self) -> (bool, bool) {
        let (left, right) = self.field.halves();
        let clear_left = left && self.left_on;
        let clear_right = right && self.right_on;
        if left {
            self.left_on = !self.left_on;
        }
        if right {
            self.right_on = !self.right_on;
        }
        (clear_left, clear_right)
    }
}

/// One step within `min..=max`, wrapping at both ends.
fn wrap(value: u8, up: bool, min: u8, max: u8) -> u8 {
    match (up, value) {
        (true, v) if v >= max => min,
        (true, v) => v + 1,
        (false, v) if v <= min => max,
        (false, v) => v - 1,
    }
}
