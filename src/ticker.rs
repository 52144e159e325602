//! Start/stop control for the periodic tick source.
//!
//! The state machine holds a `&TickerControl` as its [`Ticker`]; the
//! timer task (`hw::ticker`) waits on the same control and, while
//! running, puts [`Command::Tick`](crate::ui::Command::Tick) into the
//! mailbox every period. Only the latest request matters.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::ui::Ticker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickerRequest {
    Start { period_ms: u64 },
    Stop,
}

impl TickerRequest {
    /// Tick period to run at, `None` when stopped.
    pub const fn period(self) -> Option<u64> {
        match self {
            TickerRequest::Start { period_ms } => Some(period_ms),
            TickerRequest::Stop => None,
        }
    }
}

pub struct TickerControl {
    request: Signal<CriticalSectionRawMutex, TickerRequest>,
}

impl TickerControl {
    pub const fn new() -> Self {
        Self {
            request: Signal::new(),
        }
    }

    /// Wait for the next start/stop request.
    pub async fn wait(&self) -> TickerRequest {
        self.request.wait().await
    }

    /// Take a pending request without waiting.
    pub fn try_take(&self) -> Option<TickerRequest> {
        self.request.try_take()
    }

    fn request(&self, request: TickerRequest) {
        trace!("Ticker: {}", request);
        self.request.signal(request);
    }
}

impl Default for TickerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for &TickerControl {
    fn start(&mut self, period_ms: u64) {
        self.request(TickerRequest::Start { period_ms });
    }

    fn stop(&mut self) {
        self.request(TickerRequest::Stop);
    }
}
