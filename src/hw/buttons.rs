//! GPIO button input.
//!
//! Four buttons, active-low with internal pull-up. Each runs its own
//! loop: wait for a falling edge, then let the [`PressClassifier`] decide
//! when to sample and what to emit. Commands go to the mailbox with
//! `put`, which never blocks; a press arriving while a command is still
//! pending is dropped there.

use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Instant, Timer};

use crate::channel::CommandMailbox;
use crate::input::{Button, PressClassifier, Step};

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Run a single button loop.
pub async fn button_task(pin: AnyPin, button: Button, mailbox: &'static CommandMailbox) -> ! {
    let mut input = Input::new(pin, Pull::Up);
    let mut classifier = PressClassifier::new(button);

    loop {
        input.wait_for_falling_edge().await;

        let mut step = classifier.edge(now_ms());
        loop {
            match step {
                Step::Wait(ms) => {
                    Timer::after(Duration::from_millis(ms)).await;
                    step = classifier.sample(now_ms(), input.is_low());
                }
                Step::Emit(command) => {
                    info!("Button {}: {}", button, command);
                    mailbox.put(command);
                    step = classifier.sample(now_ms(), input.is_low());
                }
                Step::Rearmed | Step::Busy => break,
            }
        }
    }
}
