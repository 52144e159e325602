//! Control loop and application lifecycle.
//!
//! ```text
//!   startup spinner -> queue Display -> run (receive -> process)* -> shutdown
//! ```
//!
//! The loop is the mailbox's only consumer and the only code that touches
//! the state machine. It ends on a kill command or on the first error; an
//! error is never retried.

use core::future::Future;

use crate::channel::CommandMailbox;
use crate::config::{SPINNER_FRAME_MS, SPINNER_SETTLE_MS};
use crate::error::{Error, Result};
use crate::storage::NvStore;
use crate::ui::{text, Clock, Command, Flow, LedDisplay, StateMachine, Ticker};

/// Why the control loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shutdown {
    /// Kill command (long press of UP).
    Killed,
    /// Command processing failed; stopped rather than continue from an
    /// inconsistent state.
    Fault(Error),
}

/// Play the startup spinner. `delay` waits the given milliseconds.
pub async fn startup<D, F, W>(display: &mut D, mut delay: F) -> Result<()>
where
    D: LedDisplay,
    F: FnMut(u64) -> W,
    W: Future<Output = ()>,
{
    for frame in text::SPINNER {
        display.show(frame)?;
        delay(SPINNER_FRAME_MS).await;
    }
    display.show(text::BLANK)?;
    delay(SPINNER_SETTLE_MS).await;
    Ok(())
}

/// Receive and dispatch commands until the machine asks to stop or fails.
pub async fn run<D, C, S, T>(
    mailbox: &CommandMailbox,
    machine: &mut StateMachine<D, C, S, T>,
) -> Shutdown
where
    D: LedDisplay,
    C: Clock,
    S: NvStore,
    T: Ticker,
{
    loop {
        let command = mailbox.receive().await;
        match machine.process(command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Terminate) => {
                info!("App: terminating");
                return Shutdown::Killed;
            }
            Err(e) => {
                error!("App: {} failed: {}", command, e);
                return Shutdown::Fault(e);
            }
        }
    }
}

/// The whole lifecycle: spinner, initial compensated RA, control loop,
/// then the orderly shutdown sequence.
pub async fn execute<D, C, S, T, F, W>(
    mailbox: &CommandMailbox,
    machine: &mut StateMachine<D, C, S, T>,
    delay: F,
) -> Shutdown
where
    D: LedDisplay,
    C: Clock,
    S: NvStore,
    T: Ticker,
    F: FnMut(u64) -> W,
    W: Future<Output = ()>,
{
    let reason = match startup(machine.display_mut(), delay).await {
        Ok(()) => {
            mailbox.put(Command::Display);
            run(mailbox, machine).await
        }
        Err(e) => {
            error!("App: startup failed: {}", e);
            Shutdown::Fault(e)
        }
    };

    if let Err(e) = machine.shutdown(mailbox) {
        warn!("App: shutdown display failed: {}", e);
    }
    reason
}
