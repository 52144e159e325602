//! Periodic tick source.
//!
//! Idle until the state machine starts it through [`TickerControl`];
//! then puts [`Command::Tick`] every period until stopped. A new start
//! request restarts the period.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

use crate::channel::CommandMailbox;
use crate::ticker::TickerControl;
use crate::ui::Command;

pub async fn ticker_task(control: &'static TickerControl, mailbox: &'static CommandMailbox) -> ! {
    let mut period: Option<u64> = None;

    loop {
        period = match period {
            None => control.wait().await.period(),
            Some(ms) => {
                match select(control.wait(), Timer::after(Duration::from_millis(ms))).await {
                    Either::First(request) => request.period(),
                    Either::Second(()) => {
                        mailbox.put(Command::Tick);
                        Some(ms)
                    }
                }
            }
        };
    }
}
