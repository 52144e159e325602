//! UI state machine.
//!
//! ```text
//!            Display            Display              Display
//!   Idle ----------> DisplayRa -------> DisplayRaTarget -------> DisplayClock
//!                       ^                     |   ^                 |    ^
//!                       |             Program |   | Display         |    |
//!                       |                     v   |                 v    |
//!                       |            ProgramRaTargetHour <-> ..Minute    |
//!                       |                                                |
//!                       +------------- DisplayCalibrationDate <----------+
//! ```
//!
//! Browse views restart an idle countdown on entry and on Up/Down
//! (which step the brightness). Eight ticks without input return to
//! `Idle`. Edit states disable the countdown and use the ticker to flash
//! the half being edited. A long press of PROGRAM commits the edit.
//!
//! Every collaborator error is returned to the caller; the driver loop
//! treats it as fatal.

use crate::compensation::compensate;
use crate::config::TICK_PERIOD_MS;
use crate::error::{Error, Result};
use crate::storage::{ConfigStore, NvStore};
use crate::CommandMailbox;

use super::edit::{EditBuffer, EditValue};
use super::text;
use super::{Clock, Command, Flow, IdleCountdown, LedDisplay, Ticker, UiState};

pub struct StateMachine<D, C, S, T> {
    state: UiState,
    countdown: IdleCountdown,
    edit: Option<EditBuffer>,
    display: D,
    clock: C,
    config: ConfigStore<S>,
    ticker: T,
}

impl<D, C, S, T> StateMachine<D, C, S, T>
where
    D: LedDisplay,
    C: Clock,
    S: NvStore,
    T: Ticker,
{
    /// Load the persisted configuration (writing defaults where needed)
    /// and apply the stored brightness. Starts in `Idle`.
    pub fn new(mut display: D, clock: C, mut config: ConfigStore<S>, ticker: T) -> Result<Self> {
        let brightness = config.read_brightness()?;
        config.read_ra_target()?;
        config.read_calibration_date()?;
        display.set_brightness(brightness)?;
        info!("UI: ready, brightness {}", brightness.level());

        Ok(Self {
            state: UiState::Idle,
            countdown: IdleCountdown::new(),
            edit: None,
            display,
            clock,
            config,
            ticker,
        })
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// The edit in progress, if any.
    pub fn edit(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    pub fn countdown(&self) -> &IdleCountdown {
        &self.countdown
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn config(&mut self) -> &mut ConfigStore<S> {
        &mut self.config
    }

    /// Handle one command.
    pub fn process(&mut self, command: Command) -> Result<Flow> {
        trace!("UI: {} in {}", command, self.state);
        match command {
            Command::Kill => {
                info!("UI: kill requested");
                return Ok(Flow::Terminate);
            }
            Command::Display => self.on_display()?,
            Command::ProgramEnter => self.on_program_enter()?,
            Command::ProgramCommit => self.on_commit()?,
            Command::Up => self.on_adjust(true)?,
            Command::Down => self.on_adjust(false)?,
            Command::Tick => self.on_tick()?,
        }
        Ok(Flow::Continue)
    }

    /// Orderly stop: show `Exit`, stop the ticker, detach every producer
    /// from the mailbox, then show `Done`.
    pub fn shutdown(&mut self, mailbox: &CommandMailbox) -> Result<()> {
        let exit = self.display.show(text::EXIT);
        self.ticker.stop();
        self.countdown.disable();
        self.edit = None;
        mailbox.close();
        self.set_state(UiState::Idle);
        exit?;
        self.display.show(text::DONE)
    }

    fn on_display(&mut self) -> Result<()> {
        match self.edit.take() {
            // Cancel without saving.
            Some(edit) => self.enter_display(edit.origin()),
            None => self.enter_display(self.state.next_display()),
        }
    }

    fn on_program_enter(&mut self) -> Result<()> {
        if let Some(edit) = self.edit.as_mut() {
            edit.toggle_field();
            let state = edit.state();
            self.set_state(state);
            return Ok(());
        }

        let edit = match self.state {
            UiState::DisplayRaTarget => EditBuffer::ra_target(self.config.read_ra_target()?),
            UiState::DisplayClock => EditBuffer::clock(&self.clock.now()?),
            UiState::DisplayCalibrationDate => {
                EditBuffer::calibration(self.config.read_calibration_date()?)
            }
            _ => return Ok(()),
        };
        self.begin_edit(edit)
    }

    fn on_commit(&mut self) -> Result<()> {
        let Some(edit) = self.edit else {
            return Ok(());
        };

        match edit.value() {
            EditValue::RaTarget(target) => {
                self.config.write_ra_target(target)?;
                info!("UI: RA target set to {}", target);
                // The compensated value is what changed.
                self.enter_display(UiState::DisplayRa)
            }
            EditValue::Clock { hour, minute } => {
                let now = self.clock.now()?;
                let updated = now.with_time(hour, minute, 0).ok_or(Error::ClockData)?;
                self.clock.set(updated)?;
                info!("UI: clock set to {}:{}", hour, minute);
                self.enter_display(UiState::DisplayClock)
            }
            EditValue::Calibration(date) => {
                self.config.write_calibration_date(date)?;
                info!("UI: calibration date set to {}", date);
                self.enter_display(UiState::DisplayCalibrationDate)
            }
        }
    }

    fn on_adjust(&mut self, up: bool) -> Result<()> {
        if self.state == UiState::Idle {
            return Ok(());
        }

        if let Some(edit) = self.edit.as_mut() {
            if up {
                edit.up();
            } else {
                edit.down();
            }
            return Ok(());
        }

        self.countdown.reset();
        let current = self.config.read_brightness()?;
        let next = if up { current.up() } else { current.down() };
        if next != current {
            self.config.write_brightness(next)?;
            self.display.set_brightness(next)?;
            debug!("UI: brightness {}", next.level());
        }
        Ok(())
    }

    fn on_tick(&mut self) -> Result<()> {
        if self.state == UiState::Idle {
            return Ok(());
        }

        if self.countdown.is_running() {
            if self.countdown.tick() {
                self.enter_idle()?;
            }
            return Ok(());
        }

        if let Some(edit) = self.edit.as_mut() {
            let (left, right) = edit.flash();
            let text = edit.text();
            self.display.show(&text)?;
            if left || right {
                self.display.clear(left, right)?;
            }
        }
        Ok(())
    }

    /// Entry actions shared by the browse views.
    fn enter_display(&mut self, state: UiState) -> Result<()> {
        self.edit = None;
        self.set_state(state);
        self.countdown.reset();
        self.ticker.start(TICK_PERIOD_MS);

        match state {
            UiState::DisplayRa => {
                let now = self.clock.now()?;
                let target = self.config.read_ra_target()?;
                let calibration = self.config.read_calibration_date()?;
                let c = compensate(target, calibration, &now);
                info!(
                    "RA: target {} at {}:{} corrected {} (days {}, drift {}, sub-day {})",
                    target,
                    now.hour(),
                    now.minute(),
                    c.corrected,
                    c.whole_days,
                    c.drift_minutes,
                    c.sub_day_minutes
                );
                self.display.show(&text::ra(c.corrected))
            }
            UiState::DisplayRaTarget => {
                let target = self.config.read_ra_target()?;
                self.display.show(&text::ra(target))
            }
            UiState::DisplayClock => {
                let now = self.clock.now()?;
                self.display.show(&text::clock(&now))
            }
            UiState::DisplayCalibrationDate => {
                let date = self.config.read_calibration_date()?;
                self.display.show(&text::calibration(date))
            }
            _ => Ok(()),
        }
    }

    fn begin_edit(&mut self, edit: EditBuffer) -> Result<()> {
        self.countdown.disable();
        self.ticker.start(TICK_PERIOD_MS);
        self.set_state(edit.state());
        self.edit = Some(edit);
        self.display.show(&edit.text())
    }

    fn enter_idle(&mut self) -> Result<()> {
        self.edit = None;
        self.set_state(UiState::Idle);
        self.ticker.stop();
        self.countdown.disable();
        self.display.clear(true, true)
    }

    fn set_state(&mut self, state: UiState) {
        if state != self.state {
            debug!("UI: {} -> {}", self.state, state);
        }
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::{Brightness, CalibrationDate, DateTime, RaValue};
    use crate::testing::{
        calibration_midnight, FixedClock, FlakyStore, RecordingDisplay, RecordingTicker, Shown,
    };
    use std::cell::Cell;
    use std::rc::Rc;

    type Machine = StateMachine<RecordingDisplay, FixedClock, MemoryStore<16>, RecordingTicker>;

    fn machine_at(now: DateTime) -> Machine {
        StateMachine::new(
            RecordingDisplay::default(),
            FixedClock::at(now),
            ConfigStore::new(MemoryStore::new()),
            RecordingTicker::default(),
        )
        .unwrap()
    }

    fn machine() -> Machine {
        machine_at(calibration_midnight())
    }

    fn run(m: &mut Machine, commands: &[Command]) {
        for &command in commands {
            assert_eq!(m.process(command), Ok(Flow::Continue));
        }
    }

    fn ticks(m: &mut Machine, n: usize) {
        for _ in 0..n {
            run(m, &[Command::Tick]);
        }
    }

    #[test]
    fn starts_idle_with_stored_brightness() {
        let m = machine();
        assert_eq!(m.state(), UiState::Idle);
        assert_eq!(m.display().log, [Shown::Brightness(1)]);
        assert_eq!(m.ticker().period, None);
    }

    #[test]
    fn browse_cycle() {
        let mut m = machine();
        let expected = [
            (UiState::DisplayRa, "0516"),
            (UiState::DisplayRaTarget, "0516"),
            (UiState::DisplayClock, "0000"),
            (UiState::DisplayCalibrationDate, " 3Ja"),
            (UiState::DisplayRa, "0516"),
        ];
        for (state, text) in expected {
            run(&mut m, &[Command::Display]);
            assert_eq!(m.state(), state);
            assert_eq!(m.display().last_text(), Some(text));
            assert_eq!(m.ticker().period, Some(TICK_PERIOD_MS));
            assert_eq!(m.countdown().remaining(), 8);
        }
    }

    #[test]
    fn display_ra_is_compensated() {
        // Ten days after calibration at 13:30.
        let mut m = machine_at(DateTime::new(2024, 1, 13, 6, 13, 30, 0).unwrap());
        run(&mut m, &[Command::Display]);
        // 05:16 + 13:30 + 2 + 36
        assert_eq!(m.display().last_text(), Some("1924"));
    }

    #[test]
    fn edit_and_commit_ra_target() {
        let mut m = machine();
        run(&mut m, &[Command::Display, Command::Display, Command::ProgramEnter]);
        assert_eq!(m.state(), UiState::ProgramRaTargetHour);
        assert_eq!(m.edit().unwrap().text().as_str(), "0516");
        assert!(!m.countdown().is_running());

        run(&mut m, &[Command::Up, Command::Up, Command::Up]);
        assert_eq!(m.edit().unwrap().text().as_str(), "0816");

        run(&mut m, &[Command::ProgramCommit]);
        assert_eq!(m.state(), UiState::DisplayRa);
        assert!(m.edit().is_none());
        assert_eq!(m.config().read_ra_target(), Ok(RaValue::new(8, 16).unwrap()));
        assert_eq!(m.display().last_text(), Some("0816"));
    }

    #[test]
    fn program_enter_switches_sub_field() {
        let mut m = machine();
        run(&mut m, &[Command::Display, Command::Display, Command::ProgramEnter]);
        run(&mut m, &[Command::ProgramEnter]);
        assert_eq!(m.state(), UiState::ProgramRaTargetMinute);
        run(&mut m, &[Command::Up]);
        assert_eq!(m.edit().unwrap().text().as_str(), "0517");
        run(&mut m, &[Command::ProgramEnter]);
        assert_eq!(m.state(), UiState::ProgramRaTargetHour);
    }

    #[test]
    fn display_cancels_edit_without_saving() {
        let mut m = machine();
        run(&mut m, &[Command::Display, Command::Display, Command::ProgramEnter, Command::Up]);
        run(&mut m, &[Command::Display]);
        assert_eq!(m.state(), UiState::DisplayRaTarget);
        assert_eq!(m.display().last_text(), Some("0516"));
        assert_eq!(m.config().read_ra_target(), Ok(RaValue::new(5, 16).unwrap()));
        assert!(m.countdown().is_running());
    }

    #[test]
    fn program_enter_ignored_outside_editable_views() {
        let mut m = machine();
        run(&mut m, &[Command::ProgramEnter]);
        assert_eq!(m.state(), UiState::Idle);
        run(&mut m, &[Command::Display, Command::ProgramEnter]);
        assert_eq!(m.state(), UiState::DisplayRa);
        assert!(m.edit().is_none());
    }

    #[test]
    fn commit_outside_edit_does_nothing() {
        let mut m = machine();
        run(&mut m, &[Command::Display, Command::ProgramCommit]);
        assert_eq!(m.state(), UiState::DisplayRa);
    }

    #[test]
    fn clock_edit_sets_time_with_zero_seconds() {
        let now = DateTime::new(2024, 6, 1, 6, 21, 59, 42).unwrap();
        let mut m = machine_at(now);
        run(&mut m, &[Command::Display, Command::Display, Command::Display]);
        run(&mut m, &[Command::ProgramEnter]);
        assert_eq!(m.state(), UiState::ProgramClock);
        // Clock has no sub-fields.
        run(&mut m, &[Command::ProgramEnter, Command::Up]);
        assert_eq!(m.state(), UiState::ProgramClock);
        run(&mut m, &[Command::ProgramCommit]);

        assert_eq!(m.state(), UiState::DisplayClock);
        assert_eq!(m.clock().sets, 1);
        assert_eq!(m.clock().now, now.with_time(22, 0, 0).unwrap());
        assert_eq!(m.display().last_text(), Some("2200"));
    }

    #[test]
    fn calibration_edit_clamps_and_commits() {
        let mut m = machine();
        run(&mut m, &[Command::Display, Command::Display, Command::Display, Command::Display]);
        run(&mut m, &[Command::ProgramEnter]);
        assert_eq!(m.state(), UiState::ProgramCalibrationDay);
        run(&mut m, &[Command::Down, Command::Down, Command::Down]);
        assert_eq!(m.edit().unwrap().text().as_str(), "31Ja");
        run(&mut m, &[Command::ProgramEnter, Command::Up]);
        assert_eq!(m.state(), UiState::ProgramCalibrationMonth);
        assert_eq!(m.edit().unwrap().text().as_str(), "28Fe");

        run(&mut m, &[Command::ProgramCommit]);
        assert_eq!(m.state(), UiState::DisplayCalibrationDate);
        assert_eq!(
            m.config().read_calibration_date(),
            Ok(CalibrationDate::new(28, 2).unwrap())
        );
        assert_eq!(m.display().last_text(), Some("28Fe"));
    }

    #[test]
    fn eight_ticks_return_to_idle() {
        let mut m = machine();
        run(&mut m, &[Command::Display]);
        ticks(&mut m, 7);
        assert_eq!(m.state(), UiState::DisplayRa);
        ticks(&mut m, 1);
        assert_eq!(m.state(), UiState::Idle);
        assert_eq!(m.display().log.last(), Some(&Shown::Clear(true, true)));
        assert_eq!(m.ticker().period, None);
    }

    #[test]
    fn up_defers_idle_and_brightens() {
        let mut m = machine();
        run(&mut m, &[Command::Display]);
        ticks(&mut m, 5);
        run(&mut m, &[Command::Up]);
        assert_eq!(m.countdown().remaining(), 8);
        assert_eq!(m.display().log.last(), Some(&Shown::Brightness(2)));
        assert_eq!(m.config().read_brightness().unwrap().level(), 2);

        ticks(&mut m, 7);
        assert_eq!(m.state(), UiState::DisplayRa);
        ticks(&mut m, 1);
        assert_eq!(m.state(), UiState::Idle);
    }

    #[test]
    fn brightness_clamped_at_minimum() {
        let mut m = machine();
        run(&mut m, &[Command::Display, Command::Down]);
        assert_eq!(m.config().read_brightness(), Ok(Brightness::MIN));
        // Only the start-up brightness was pushed.
        let pushes = m
            .display()
            .log
            .iter()
            .filter(|s| matches!(s, Shown::Brightness(_)))
            .count();
        assert_eq!(pushes, 1);
        assert_eq!(m.countdown().remaining(), 8);
    }

    #[test]
    fn idle_ignores_up_down_and_tick() {
        let mut m = machine();
        run(&mut m, &[Command::Up, Command::Down, Command::Tick]);
        assert_eq!(m.state(), UiState::Idle);
        assert_eq!(m.display().log.len(), 1);
    }

    #[test]
    fn edit_ticks_flash_without_idling() {
        let mut m = machine();
        run(&mut m, &[Command::Display, Command::Display, Command::ProgramEnter]);
        let before = m.display().log.len();
        ticks(&mut m, 20);
        assert_eq!(m.state(), UiState::ProgramRaTargetHour);

        let log = &m.display().log[before..];
        assert_eq!(log[0], Shown::Text("0516".to_string()));
        assert_eq!(log[1], Shown::Clear(true, false));
        assert_eq!(log[2], Shown::Text("0516".to_string()));
        assert_eq!(log[3], Shown::Text("0516".to_string()));
        assert_eq!(log[4], Shown::Clear(true, false));
    }

    #[test]
    fn kill_terminates_from_any_state() {
        let mut m = machine();
        assert_eq!(m.process(Command::Kill), Ok(Flow::Terminate));
        run(&mut m, &[Command::Display, Command::Display, Command::ProgramEnter]);
        assert_eq!(m.process(Command::Kill), Ok(Flow::Terminate));
    }

    #[test]
    fn store_failure_is_returned() {
        let fail = Rc::new(Cell::new(false));
        let store = FlakyStore {
            inner: MemoryStore::new(),
            fail: fail.clone(),
        };
        let mut m = StateMachine::new(
            RecordingDisplay::default(),
            FixedClock::at(calibration_midnight()),
            ConfigStore::new(store),
            RecordingTicker::default(),
        )
        .unwrap();

        m.process(Command::Display).unwrap();
        fail.set(true);
        assert_eq!(m.process(Command::Up), Err(Error::StoreWrite { offset: 0 }));
    }

    #[test]
    fn shutdown_detaches_producers() {
        let mailbox = CommandMailbox::new();
        let mut m = machine();
        run(&mut m, &[Command::Display]);
        mailbox.put(Command::Tick);

        m.shutdown(&mailbox).unwrap();
        assert_eq!(m.ticker().period, None);
        assert!(mailbox.is_closed());
        assert!(!mailbox.put(Command::Display));
        let texts: Vec<_> = m.display().log.iter().rev().take(2).cloned().collect();
        assert_eq!(
            texts,
            [Shown::Text("Done".to_string()), Shown::Text("Exit".to_string())]
        );
    }
}
