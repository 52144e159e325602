//! Four-character display renderings.

use core::fmt::Write;

use heapless::String;

use crate::types::{CalibrationDate, DateTime, RaValue};

/// Characters on the display: two per module.
pub const TEXT_LEN: usize = 4;

pub type Text = String<TEXT_LEN>;

pub const BLANK: &str = "    ";
pub const EXIT: &str = "Exit";
pub const DONE: &str = "Done";

/// Startup animation, one frame per spinner period, then [`BLANK`].
pub const SPINNER: [&str; 4] = ["o   ", " o  ", "  o ", "   o"];

/// `HHMM`, zero padded.
pub fn hhmm(hour: u8, minute: u8) -> Text {
    let mut text = Text::new();
    let _ = write!(text, "{:02}{:02}", hour % 100, minute % 100);
    text
}

pub fn ra(value: RaValue) -> Text {
    hhmm(value.hour(), value.minute())
}

pub fn clock(now: &DateTime) -> Text {
    hhmm(now.hour(), now.minute())
}

/// Day right-aligned in two characters, then the month abbreviation:
/// `" 3Ja"`, `"14Fe"`.
pub fn calibration(date: CalibrationDate) -> Text {
    let mut text = Text::new();
    let _ = write!(text, "{:2}{}", date.day(), date.month_name());
    text
}

/// Replace a leading `'0'` with a space: `"0516"` shows as `" 516"`.
pub fn blank_leading_zero(text: &str) -> Text {
    let mut out = Text::new();
    for (i, c) in text.chars().enumerate() {
        let c = if i == 0 && c == '0' { ' ' } else { c };
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
