//! Sidereal drift compensation.
//!
//! With the mount aligned south at midnight on the calibration date, the
//! RA axis reads the target value. From then on the sky runs ahead of the
//! clock by roughly 4 minutes a day, so the axis setting for the same
//! target is:
//!
//! ```text
//! target + clock time-of-day + hour/6 + 4 * (whole days since calibration)
//! ```
//!
//! reduced modulo one day. Pure arithmetic: no I/O, no state.

use crate::config::{DRIFT_MINUTES_PER_DAY, SUB_DAY_DRIFT_HOURS};
use crate::types::{days_before_month, days_in_year, CalibrationDate, DateTime, RaValue};

/// A corrected RA together with the terms that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compensation {
    /// Value to dial onto the RA axis.
    pub corrected: RaValue,
    /// Days since calibration (0 on the calibration day itself).
    pub elapsed_days: u16,
    /// Elapsed days beyond the first.
    pub whole_days: u16,
    /// One minute per 6-hour quadrant of the current clock.
    pub sub_day_minutes: u16,
    /// `4 * whole_days`.
    pub drift_minutes: u16,
}

/// Days between the calibration date and `now`.
///
/// The calibration date is never in the future: if `now` falls earlier in
/// the year than the calibration day/month, calibration happened last
/// year. Returns 0 on the calibration day, otherwise 1..=365.
pub fn days_since_calibration(calibration: CalibrationDate, now: &DateTime) -> u16 {
    let (c_day, c_month) = (calibration.day(), calibration.month());
    if c_day == now.day() && c_month == now.month() {
        return 0;
    }

    let mut now_offset = now.day_of_year();
    let c_offset = if (now.month(), now.day()) < (c_month, c_day) {
        let last_year = now.year() - 1;
        now_offset += days_in_year(last_year);
        days_before_month(last_year, c_month) + c_day as u16
    } else {
        days_before_month(now.year(), c_month) + c_day as u16
    };

    // Both offsets come from validated dates: calibration is strictly
    // earlier, and never more than a year back.
    debug_assert!(now_offset > c_offset && now_offset - c_offset <= 365);
    now_offset - c_offset
}

/// Compute the corrected RA and its breakdown.
pub fn compensate(target: RaValue, calibration: CalibrationDate, now: &DateTime) -> Compensation {
    let elapsed_days = days_since_calibration(calibration, now);
    // The first 24 hours are covered by the sub-day term.
    let whole_days = elapsed_days.saturating_sub(1);
    let sub_day_minutes = (now.hour() / SUB_DAY_DRIFT_HOURS) as u16;
    let drift_minutes = DRIFT_MINUTES_PER_DAY * whole_days;

    let clock_minutes = now.hour() as u32 * 60 + now.minute() as u32;
    let scope_minutes = target.total_minutes() as u32
        + clock_minutes
        + sub_day_minutes as u32
        + drift_minutes as u32;

    Compensation {
        corrected: RaValue::from_minutes(scope_minutes),
        elapsed_days,
        whole_days,
        sub_day_minutes,
        drift_minutes,
    }
}

/// The RA axis setting for `target` at `now`.
pub fn corrected_ra(target: RaValue, calibration: CalibrationDate, now: &DateTime) -> RaValue {
    compensate(target, calibration, now).corrected
}
