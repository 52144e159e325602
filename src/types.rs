//! Validated value types shared by every module.
//!
//! Fields are private and every constructor checks its ranges, so an
//! out-of-range RA, date or brightness cannot exist past this module.

use crate::config::{DAY_MINUTES, MAX_BRIGHTNESS, MIN_BRIGHTNESS};

/// Two-letter month abbreviations, index 0 unused (January = 1).
pub const MONTH_NAMES: [&str; 13] = [
    "xx", "Ja", "Fe", "Mc", "Ap", "Ma", "Jn", "Ju", "Au", "Se", "Oc", "No", "De",
];

/// Maximum days in a month ignoring leap years. Index 0 unused.
const MAX_DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days before the start of each month; index 12 is the year length.
/// Row 1 is used for leap years.
const CUMULATIVE_DAYS: [[u16; 13]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366],
];

/// Gregorian leap year rule.
pub const fn leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in `month` of `year`, February following the leap rule.
/// Returns 0 for a month outside 1..=12.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if leap_year(year) => 29,
        1..=12 => MAX_DAYS[month as usize],
        _ => 0,
    }
}

/// Days before the first of `month` (1..=12) in `year`.
/// `month == 13` yields the length of the year.
pub(crate) const fn days_before_month(year: u16, month: u8) -> u16 {
    CUMULATIVE_DAYS[leap_year(year) as usize][(month - 1) as usize]
}

/// Length of `year` in days.
pub(crate) const fn days_in_year(year: u16) -> u16 {
    days_before_month(year, 13)
}

// RA

/// A right-ascension setting in hours and minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RaValue {
    hour: u8,
    minute: u8,
}

impl RaValue {
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Build from a minute count, reduced modulo one day first.
    pub const fn from_minutes(total: u32) -> Self {
        let total = (total % DAY_MINUTES as u32) as u16;
        Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn total_minutes(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

// Calibration date

/// Day and month the RA axis was last aligned. No year is stored, so
/// February is capped at 28 days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationDate {
    day: u8,
    month: u8,
}

impl CalibrationDate {
    /// 1 January.
    pub const MIN: Self = Self { day: 1, month: 1 };

    pub const fn new(day: u8, month: u8) -> Option<Self> {
        if month >= 1 && month <= 12 && day >= 1 && day <= MAX_DAYS[month as usize] {
            Some(Self { day, month })
        } else {
            None
        }
    }

    /// Largest calibration day allowed in `month`, 0 if there is no such month.
    pub const fn max_day(month: u8) -> u8 {
        if month >= 1 && month <= 12 {
            MAX_DAYS[month as usize]
        } else {
            0
        }
    }

    /// Same day in another month, clamped down to that month's maximum.
    pub const fn with_month(self, month: u8) -> Option<Self> {
        if month < 1 || month > 12 {
            return None;
        }
        let max = MAX_DAYS[month as usize];
        let day = if self.day > max { max } else { self.day };
        Some(Self { day, month })
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize]
    }
}

// Brightness

/// Display brightness, 1 (dimmest) to 20 (full intensity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness(u8);

impl Brightness {
    pub const MIN: Self = Self(MIN_BRIGHTNESS);
    pub const MAX: Self = Self(MAX_BRIGHTNESS);

    pub const fn new(level: u8) -> Option<Self> {
        if level >= MIN_BRIGHTNESS && level <= MAX_BRIGHTNESS {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn level(&self) -> u8 {
        self.0
    }

    /// One step brighter, saturating at [`Brightness::MAX`].
    pub const fn up(self) -> Self {
        if self.0 < MAX_BRIGHTNESS {
            Self(self.0 + 1)
        } else {
            self
        }
    }

    /// One step dimmer, saturating at [`Brightness::MIN`].
    pub const fn down(self) -> Self {
        if self.0 > MIN_BRIGHTNESS {
            Self(self.0 - 1)
        } else {
            self
        }
    }

    /// Scale onto a device register where `full_scale` is 100%.
    pub const fn to_register(&self, full_scale: u8) -> u8 {
        (self.0 as u16 * full_scale as u16 / MAX_BRIGHTNESS as u16) as u8
    }
}

// Date-time

/// A wall-clock reading. Weekday is 1-based (Monday = 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    year: u16,
    month: u8,
    day: u8,
    weekday: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl DateTime {
    pub const fn new(
        year: u16,
        month: u8,
        day: u8,
        weekday: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Option<Self> {
        let valid = year >= 1
            && month >= 1
            && month <= 12
            && day >= 1
            && day <= days_in_month(year, month)
            && weekday >= 1
            && weekday <= 7
            && hour < 24
            && minute < 60
            && second < 60;
        if valid {
            Some(Self {
                year,
                month,
                day,
                weekday,
                hour,
                minute,
                second,
            })
        } else {
            None
        }
    }

    /// Same date with a different time of day.
    pub const fn with_time(self, hour: u8, minute: u8, second: u8) -> Option<Self> {
        Self::new(
            self.year,
            self.month,
            self.day,
            self.weekday,
            hour,
            minute,
            second,
        )
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn weekday(&self) -> u8 {
        self.weekday
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// 1-based ordinal day within the year.
    pub const fn day_of_year(&self) -> u16 {
        days_before_month(self.year, self.month) + self.day as u16
    }
}
