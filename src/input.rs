//! Button press classification.
//!
//! Four active-low buttons. On an edge the classifier debounces, then
//! times how long the button is held. `Program` and `Up` have a long-press
//! meaning; the others always produce their short-press command.
//!
//! [`PressClassifier`] is a pure timing state machine driven by
//! millisecond timestamps from a monotonic clock. The async button task
//! (`hw::buttons`) feeds it edges and level samples and sleeps for as
//! long as each [`Step::Wait`] asks, so no context ever busy-waits.
//!
//! ```text
//!   Armed --edge--> Debouncing --asserted--> Held --release/threshold--> emit
//!     ^                 |                                                 |
//!     +----bounce-------+                 Latched <---still held----------+
//!     +-----------------------------------released------------------------+
//! ```

use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_POLL_MS, LONG_PRESS_MS};
use crate::ui::Command;

/// A physical button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Display,
    Program,
    Down,
    Up,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Display, Button::Program, Button::Down, Button::Up];

    pub const fn short_press(self) -> Command {
        match self {
            Button::Display => Command::Display,
            Button::Program => Command::ProgramEnter,
            Button::Down => Command::Down,
            Button::Up => Command::Up,
        }
    }

    /// `None` for buttons without a long-press meaning.
    pub const fn long_press(self) -> Option<Command> {
        match self {
            Button::Program => Some(Command::ProgramCommit),
            Button::Up => Some(Command::Kill),
            Button::Display | Button::Down => None,
        }
    }

    /// Command for a press held `held_ms` against `threshold_ms`.
    pub const fn classify(self, held_ms: u64, threshold_ms: u64) -> Command {
        match self.long_press() {
            Some(long) if held_ms >= threshold_ms => long,
            _ => self.short_press(),
        }
    }
}

/// What the caller should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Sample the level again after this many milliseconds.
    Wait(u64),
    /// Queue this command, then keep sampling.
    Emit(Command),
    /// Classification finished; wait for the next edge.
    Rearmed,
    /// An edge arrived while a press was still being classified.
    Busy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Armed,
    Debouncing { edge_at: u64 },
    Held { pressed_at: u64 },
    /// Command already emitted; waiting for release.
    Latched,
}

/// Per-button debounce and short/long press timing.
pub struct PressClassifier {
    button: Button,
    debounce_ms: u64,
    long_press_ms: u64,
    poll_ms: u64,
    phase: Phase,
}

impl PressClassifier {
    pub const fn new(button: Button) -> Self {
        Self::with_timing(button, BUTTON_DEBOUNCE_MS, LONG_PRESS_MS, BUTTON_POLL_MS)
    }

    pub const fn with_timing(
        button: Button,
        debounce_ms: u64,
        long_press_ms: u64,
        poll_ms: u64,
    ) -> Self {
        Self {
            button,
            debounce_ms,
            long_press_ms,
            poll_ms,
            phase: Phase::Armed,
        }
    }

    pub const fn button(&self) -> Button {
        self.button
    }

    /// True when the next edge would start a new classification.
    pub fn is_armed(&self) -> bool {
        self.phase == Phase::Armed
    }

    /// An edge was seen at `now`.
    pub fn edge(&mut self, now: u64) -> Step {
        if self.phase != Phase::Armed {
            return Step::Busy;
        }
        self.phase = Phase::Debouncing { edge_at: now };
        Step::Wait(self.debounce_ms)
    }

    /// The input level at `now` (`asserted` = pressed).
    pub fn sample(&mut self, now: u64, asserted: bool) -> Step {
        match self.phase {
            Phase::Armed => Step::Rearmed,

            Phase::Debouncing { edge_at } => {
                let elapsed = now.saturating_sub(edge_at);
                if elapsed < self.debounce_ms {
                    return Step::Wait(self.debounce_ms - elapsed);
                }
                if !asserted {
                    trace!("Button {}: bounce", self.button);
                    self.phase = Phase::Armed;
                    return Step::Rearmed;
                }
                if self.button.long_press().is_none() {
                    self.phase = Phase::Latched;
                    return Step::Emit(self.button.short_press());
                }
                self.phase = Phase::Held { pressed_at: edge_at };
                self.hold(now, edge_at)
            }

            Phase::Held { pressed_at } => {
                if asserted {
                    return self.hold(now, pressed_at);
                }
                self.phase = Phase::Armed;
                let held = now.saturating_sub(pressed_at);
                let command = self.button.classify(held, self.long_press_ms);
                debug!("Button {}: released after {} ms", self.button, held);
                Step::Emit(command)
            }

            Phase::Latched => {
                if asserted {
                    Step::Wait(self.poll_ms)
                } else {
                    self.phase = Phase::Armed;
                    Step::Rearmed
                }
            }
        }
    }

    /// Still held: emit the long press once the threshold is reached,
    /// otherwise schedule the next re-check no later than the threshold.
    fn hold(&mut self, now: u64, pressed_at: u64) -> Step {
        let held = now.saturating_sub(pressed_at);
        if held >= self.long_press_ms {
            self.phase = Phase::Latched;
            debug!("Button {}: long press", self.button);
            return Step::Emit(self.button.classify(held, self.long_press_ms));
        }
        Step::Wait(self.poll_ms.min(self.long_press_ms - held))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(button: Button) -> PressClassifier {
        PressClassifier::with_timing(button, 50, 2_000, 50)
    }

    /// Drive a press held from `0` until `release_at`, sampling whenever
    /// asked, and collect emitted commands.
    fn press(c: &mut PressClassifier, release_at: u64) -> heapless::Vec<Command, 4> {
        let mut emitted = heapless::Vec::new();
        let mut now = 0;
        let mut step = c.edge(now);
        loop {
            match step {
                Step::Wait(ms) => now += ms,
                Step::Emit(command) => emitted.push(command).unwrap(),
                Step::Rearmed | Step::Busy => return emitted,
            }
            step = c.sample(now, now < release_at);
        }
    }

    #[test]
    fn button_mapping() {
        assert_eq!(Button::Display.short_press(), Command::Display);
        assert_eq!(Button::Program.short_press(), Command::ProgramEnter);
        assert_eq!(Button::Program.long_press(), Some(Command::ProgramCommit));
        assert_eq!(Button::Up.long_press(), Some(Command::Kill));
        assert_eq!(Button::Down.long_press(), None);
        assert_eq!(Button::Display.long_press(), None);
    }

    #[test]
    fn classify_threshold_is_inclusive() {
        assert_eq!(Button::Up.classify(1_999, 2_000), Command::Up);
        assert_eq!(Button::Up.classify(2_000, 2_000), Command::Kill);
        assert_eq!(Button::Down.classify(10_000, 2_000), Command::Down);
    }

    #[test]
    fn edge_starts_debounce() {
        let mut c = classifier(Button::Display);
        assert_eq!(c.edge(100), Step::Wait(50));
        assert!(!c.is_armed());
    }

    #[test]
    fn early_sample_waits_out_debounce() {
        let mut c = classifier(Button::Display);
        c.edge(100);
        assert_eq!(c.sample(120, true), Step::Wait(30));
    }

    #[test]
    fn bounce_is_discarded_and_rearms() {
        let mut c = classifier(Button::Program);
        c.edge(0);
        assert_eq!(c.sample(50, false), Step::Rearmed);
        assert!(c.is_armed());
    }

    #[test]
    fn edge_while_busy_is_ignored() {
        let mut c = classifier(Button::Up);
        c.edge(0);
        assert_eq!(c.edge(10), Step::Busy);
        c.sample(50, true);
        assert_eq!(c.edge(60), Step::Busy);
    }

    #[test]
    fn short_only_button_emits_after_debounce() {
        let mut c = classifier(Button::Down);
        c.edge(0);
        assert_eq!(c.sample(50, true), Step::Emit(Command::Down));
        // Held: no repeat until released.
        assert_eq!(c.sample(100, true), Step::Wait(50));
        assert_eq!(c.edge(120), Step::Busy);
        assert_eq!(c.sample(150, false), Step::Rearmed);
        assert!(c.is_armed());
    }

    #[test]
    fn short_press_on_long_capable_button() {
        let mut c = classifier(Button::Program);
        assert_eq!(&press(&mut c, 300)[..], &[Command::ProgramEnter]);
        assert!(c.is_armed());
    }

    #[test]
    fn long_press_emitted_while_still_held() {
        let mut c = classifier(Button::Program);
        c.edge(0);
        c.sample(50, true);
        assert_eq!(c.sample(1_990, true), Step::Wait(10));
        assert_eq!(c.sample(2_000, true), Step::Emit(Command::ProgramCommit));
        assert_eq!(c.sample(5_000, true), Step::Wait(50));
        assert_eq!(c.sample(5_050, false), Step::Rearmed);
    }

    #[test]
    fn long_press_emits_exactly_once() {
        let mut c = classifier(Button::Up);
        assert_eq!(&press(&mut c, 6_000)[..], &[Command::Kill]);
    }

    #[test]
    fn release_before_threshold_is_short() {
        let mut c = classifier(Button::Up);
        assert_eq!(&press(&mut c, 1_900)[..], &[Command::Up]);
    }

    #[test]
    fn release_at_threshold_is_long() {
        let mut c = classifier(Button::Up);
        c.edge(0);
        c.sample(50, true);
        assert_eq!(c.sample(2_000, false), Step::Emit(Command::Kill));
    }

    #[test]
    fn hold_rechecks_are_bounded() {
        let mut c = classifier(Button::Program);
        c.edge(0);
        let mut now = 50;
        let mut samples = 0;
        let mut step = c.sample(now, true);
        while let Step::Wait(ms) = step {
            now += ms;
            samples += 1;
            step = c.sample(now, true);
        }
        assert_eq!(step, Step::Emit(Command::ProgramCommit));
        assert!(samples <= (2_000 / 50) as usize);
    }
}
