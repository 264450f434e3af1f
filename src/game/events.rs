// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Inputs to the sync machine and the queue that serialises them.
//!
//! Button edges and received radio messages are posted here and handled one at a time from the
//! control loop, so no handler ever runs while another is in progress.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use thiserror::Error;

use crate::protocol::Envelope;

/// Pending events a node holds before it starts dropping input.
pub const EVENT_QUEUE_LEN: usize = 8;

/// Pending events, drained by the control loop. Only ever touched from thread mode.
pub type EventQueue = Channel<NoopRawMutex, Event, EVENT_QUEUE_LEN>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Sensor offsets are done and the node can start playing.
    StartupFinished,
    SubmitPressed,
    /// Leader only.
    LoadNextRoundPressed,
    /// Leader only.
    ConfirmCalibrationPressed,
    Received(Envelope),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("event queue is full, dropping {0:?}")]
pub struct QueueFull(pub Event);

/// Enqueue without waiting, handing the event back if the queue is full.
pub fn try_post(queue: &EventQueue, event: Event) -> Result<(), QueueFull> {
    queue.try_send(event).map_err(|err| match err {
        TrySendError::Full(event) => QueueFull(event),
    })
}
