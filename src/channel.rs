//! Single-slot command mailbox between producers and the control loop.
//!
//! Button tasks and the ticker `put` commands; the control loop is the
//! only consumer. The mailbox holds at most one command. A `put` into a
//! full slot is dropped: under normal use the loop drains far faster than
//! a human can press buttons, so losing a redundant command is acceptable.
//!
//! The slot lives behind a critical-section mutex, so `put` is safe from
//! any task or interrupt priority. A [`Signal`] wakes the consumer.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::ui::Command;

#[derive(Clone, Copy)]
struct Slot {
    command: Option<Command>,
    closed: bool,
}

/// Coalescing, depth-1 command channel.
pub struct CommandMailbox {
    slot: Mutex<CriticalSectionRawMutex, Cell<Slot>>,
    doorbell: Signal<CriticalSectionRawMutex, ()>,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot {
                command: None,
                closed: false,
            })),
            doorbell: Signal::new(),
        }
    }

    /// Store `command` if the slot is empty and the mailbox is open.
    ///
    /// Returns `false` when the command was dropped.
    pub fn put(&self, command: Command) -> bool {
        let stored = self.slot.lock(|cell| {
            let mut slot = cell.get();
            if slot.closed || slot.command.is_some() {
                return false;
            }
            slot.command = Some(command);
            cell.set(slot);
            true
        });

        if stored {
            self.doorbell.signal(());
        } else {
            trace!("Mailbox: dropped {}", command);
        }
        stored
    }

    /// Take the pending command, if any.
    pub fn get(&self) -> Option<Command> {
        self.slot.lock(|cell| {
            let mut slot = cell.get();
            let command = slot.command.take();
            cell.set(slot);
            command
        })
    }

    /// Wait until a command is available and take it.
    pub async fn receive(&self) -> Command {
        loop {
            if let Some(command) = self.get() {
                return command;
            }
            self.doorbell.wait().await;
        }
    }

    /// Discard any pending command.
    pub fn clear(&self) {
        self.get();
        self.doorbell.reset();
    }

    /// Detach every producer: the pending command is discarded and all
    /// later `put`s are dropped.
    pub fn close(&self) {
        self.slot.lock(|cell| {
            cell.set(Slot {
                command: None,
                closed: true,
            })
        });
        self.doorbell.reset();
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock(|cell| cell.get().closed)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock(|cell| cell.get().command.is_none())
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}
