// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Collaborator Interfaces
//!
//! The game core talks to the outside world only through these traits. Sensor, panel and radio
//! drivers in [`drivers`](crate::drivers) implement them on the board; tests implement them with
//! in-memory fakes.
//!
//! All outbound calls are fire-and-forget. The core never observes a result from a render, a cue
//! or a send.

use crate::game::{Orientation, ParticipantId};
use crate::protocol::{Envelope, Message};

/// Produces the node's current orientation.
///
/// Must not block, and must always return something (the last good reading if the sensor
/// hiccups).
pub trait OrientationSource {
    fn sample(&mut self) -> Orientation;
}

/// Screen, buzzer and indicator LEDs.
pub trait PeripheralSink {
    /// Whether the screen can be drawn to. Checked once at startup.
    fn ready(&mut self) -> bool {
        true
    }

    fn render(&mut self, screen: Screen);
    fn play_cue(&mut self, cue: Cue);
    fn set_indicator(&mut self, indicator: Indicator, on: bool);
}

/// Unreliable point-to-point message link.
///
/// `send` gives no delivery guarantee. `receive` yields at most one pending message addressed
/// to this node, in whatever order the link delivered them.
pub trait Transport {
    fn send(&mut self, to: ParticipantId, message: &Message);
    fn receive(&mut self) -> Option<Envelope>;
}

/// Screens the core asks the panel to show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Sensor offsets are being computed; do not move the node.
    CalibrationSetup,
    /// Leader is ready to start round `round` (zero-based).
    RoundStaged { round: u8 },
    /// One countdown step before round `round` goes live.
    Countdown { round: u8, remaining: u8 },
    Blank,
    /// Live reading while a round is running.
    Orientation(Orientation),
    WaitingForFollowers,
    WaitingForLeader,
    /// Every round is done; waiting for the confirm button.
    CalibrationStaged,
    CalibrationComplete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    Success,
    Triumph,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// Lit once the round at this index is complete.
    Round(u8),
    Calibrated,
}
