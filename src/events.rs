//! Callback-to-loop command transport.
//!
//! Commands are produced by:
//! - the BLE GATT write callback (Bluedroid task)
//! - the speech-recognizer event callback (recognizer task)
//!
//! Commands are consumed by the main loop, which dispatches them one at a
//! time in FIFO order. Producers never touch motion/animation state; this
//! queue is the only path from callback context into the domain.
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ BLE write cb     │────▶│               │     │              │
//! │                  │     │ Command Queue │────▶│  Main Loop   │
//! │ Recognizer cb    │────▶│  (lock-free)  │     │  (consumer)  │
//! └──────────────────┘     └───────────────┘     └──────────────┘
//! ```
//!
//! Two producer tasks exist, so the head index is claimed by
//! compare-exchange and each slot carries its own occupancy marker: a slot
//! holds `0` until its producer publishes the command value, and the
//! consumer treats a claimed-but-unpublished slot as "not ready yet" rather
//! than consuming a stale byte.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::commands::Command;

/// Maximum number of pending commands.
/// Power of 2 for efficient ring buffer modulo.
const QUEUE_CAP: usize = 32;

/// Slot value meaning "no command published here".
/// `Command` discriminants start at 1, so 0 is never a valid payload.
const SLOT_EMPTY: u8 = 0;

static QUEUE_HEAD: AtomicU8 = AtomicU8::new(0);
static QUEUE_TAIL: AtomicU8 = AtomicU8::new(0);
static SLOTS: [AtomicU8; QUEUE_CAP] = [const { AtomicU8::new(SLOT_EMPTY) }; QUEUE_CAP];

/// Push a command into the queue.
/// Safe to call from any producer task (lock-free, non-blocking).
/// Returns `false` if the queue is full (command dropped).
pub fn push_command(command: Command) -> bool {
    loop {
        let head = QUEUE_HEAD.load(Ordering::Relaxed);
        let tail = QUEUE_TAIL.load(Ordering::Acquire);
        let next_head = (head + 1) % QUEUE_CAP as u8;

        if next_head == tail {
            return false; // Queue full — drop command.
        }

        // Claim the slot at `head`. A concurrent producer that won the race
        // makes the compare-exchange fail and we retry on the new head.
        if QUEUE_HEAD
            .compare_exchange_weak(head, next_head, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            SLOTS[head as usize].store(command as u8, Ordering::Release);
            return true;
        }
    }
}

/// Pop the next command from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty or the head slot is claimed but not
/// yet published (it will be picked up on the next drain).
pub fn pop_command() -> Option<Command> {
    let tail = QUEUE_TAIL.load(Ordering::Relaxed);
    let head = QUEUE_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = SLOTS[tail as usize].swap(SLOT_EMPTY, Ordering::Acquire);
    if raw == SLOT_EMPTY {
        return None; // Claimed, not yet published.
    }

    QUEUE_TAIL.store((tail + 1) % QUEUE_CAP as u8, Ordering::Release);
    Command::from_u8(raw)
}

/// Drain all pending commands into a callback, in FIFO order.
pub fn drain_commands(mut handler: impl FnMut(Command)) {
    while let Some(command) = pop_command() {
        handler(command);
    }
}

/// Check if the command queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = QUEUE_TAIL.load(Ordering::Relaxed);
    let head = QUEUE_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending commands.
pub fn queue_len() -> usize {
    let head = QUEUE_HEAD.load(Ordering::Relaxed) as usize;
    let tail = QUEUE_TAIL.load(Ordering::Relaxed) as usize;
    (head + QUEUE_CAP - tail) % QUEUE_CAP
}
