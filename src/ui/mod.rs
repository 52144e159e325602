//! User interface subsystem - 4-digit LED display + four buttons.
//!
//! The control loop feeds [`Command`]s into the [`StateMachine`], which
//! decides what is shown, what is being edited, and when to persist.
//!
//! ## Components
//!
//! - **State machine**: browse and edit states, idle countdown
//! - **Edit buffer**: the value under edit and which half flashes
//! - **Text**: 4-character renderings for the display
//! - **Collaborators**: [`LedDisplay`], [`Clock`], [`Ticker`]

pub mod countdown;
pub mod edit;
pub mod state_machine;
pub mod text;

pub use countdown::IdleCountdown;
pub use edit::{EditBuffer, EditValue, Field};
pub use state_machine::StateMachine;

use crate::error::Result;
use crate::types::{Brightness, DateTime};

/// Everything the control loop can be asked to do.
///
/// Button presses are classified into these by [`crate::input`]; the
/// ticker produces [`Command::Tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Short press of DISPLAY: next view, or cancel an edit.
    Display,
    /// Short press of PROGRAM: start editing, or switch sub-field.
    ProgramEnter,
    /// Long press of PROGRAM: save the edit.
    ProgramCommit,
    Down,
    Up,
    /// Long press of UP: stop the control loop.
    Kill,
    /// Periodic timer tick.
    Tick,
}

/// Views (and edit modes) the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiState {
    /// Display blank, ticker stopped.
    Idle,
    /// Drift-compensated RA.
    DisplayRa,
    DisplayRaTarget,
    DisplayClock,
    DisplayCalibrationDate,
    ProgramRaTargetHour,
    ProgramRaTargetMinute,
    ProgramClock,
    ProgramCalibrationDay,
    ProgramCalibrationMonth,
}

impl UiState {
    pub const fn is_editing(self) -> bool {
        matches!(
            self,
            UiState::ProgramRaTargetHour
                | UiState::ProgramRaTargetMinute
                | UiState::ProgramClock
                | UiState::ProgramCalibrationDay
                | UiState::ProgramCalibrationMonth
        )
    }

    /// The browse cycle entered by the DISPLAY button.
    pub const fn next_display(self) -> UiState {
        match self {
            UiState::DisplayRa => UiState::DisplayRaTarget,
            UiState::DisplayRaTarget => UiState::DisplayClock,
            UiState::DisplayClock => UiState::DisplayCalibrationDate,
            _ => UiState::DisplayRa,
        }
    }
}

/// Whether the control loop should keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flow {
    Continue,
    Terminate,
}

/// A pair of 2-character LED modules.
pub trait LedDisplay {
    /// Show exactly 4 characters: two on the left module, two on the right.
    fn show(&mut self, text: &str) -> Result<()>;

    /// Blank the selected modules.
    fn clear(&mut self, left: bool, right: bool) -> Result<()>;

    fn set_brightness(&mut self, brightness: Brightness) -> Result<()>;
}

/// Wall clock. Weekday is 1-based at this interface.
pub trait Clock {
    fn now(&mut self) -> Result<DateTime>;

    fn set(&mut self, datetime: DateTime) -> Result<()>;
}

/// Periodic source of [`Command::Tick`].
pub trait Ticker {
    /// Start (or restart) ticking every `period_ms`.
    fn start(&mut self, period_ms: u64);

    fn stop(&mut self);
}

impl<T: LedDisplay + ?Sized> LedDisplay for &mut T {
    fn show(&mut self, text: &str) -> Result<()> {
        (**self).show(text)
    }

    fn clear(&mut self, left: bool, right: bool) -> Result<()> {
        (**self).clear(left, right)
    }

    fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        (**self).set_brightness(brightness)
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now(&mut self) -> Result<DateTime> {
        (**self).now()
    }

    fn set(&mut self, datetime: DateTime) -> Result<()> {
        (**self).set(datetime)
    }
}

impl<T: Ticker + ?Sized> Ticker for &mut T {
    fn start(&mut self, period_ms: u64) {
        (**self).start(period_ms)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}
