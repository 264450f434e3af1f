// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Game Core
//!
//! Round bookkeeping and the leader/follower synchronisation protocol. Nothing in here touches
//! hardware; every side effect goes out through the traits in [`io`](crate::io).
//!
//! ## Modules
//!
//! - [`orientation`] - Orientation samples and the per-axis tolerance match.
//! - [`rounds`] - Round targets, completion flags and the current-round cursor.
//! - [`submissions`] - Who has matched the current round.
//! - [`gate`] - One-shot guard for the calibration-complete action.
//! - [`events`] - Input events and the queue that serialises them.
//! - [`sync`] - The state machine tying it all together.

pub mod events;
pub mod gate;
pub mod orientation;
pub mod rounds;
pub mod submissions;
pub mod sync;

pub use events::{Event, EventQueue, QueueFull, EVENT_QUEUE_LEN};
pub use gate::CalibrationGate;
pub use orientation::{matches, Orientation, RoundTarget};
pub use rounds::{RoundEngine, RoundError};
pub use submissions::SubmissionTracker;
pub use sync::{IgnoreReason, Outcome, SyncMachine, SyncState};

/// Identifies one node in the game (also its radio address).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub u8);
