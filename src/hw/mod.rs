//! Embassy tasks bridging GPIO and timers into the command mailbox.
//!
//! Only built with the `embedded` feature. The bodies are plain async
//! functions; `main.rs` wraps them in `#[embassy_executor::task]`s.

pub mod buttons;
pub mod ticker;
