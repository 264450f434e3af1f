// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Guards the one-shot "calibration complete" action.

use crate::game::rounds::RoundEngine;

/// Fires at most once, and only when every round is complete.
#[derive(Debug, Default)]
pub struct CalibrationGate {
    fired: bool,
}

impl CalibrationGate {
    pub const fn new() -> Self {
        Self { fired: false }
    }

    /// Returns true exactly once: the first time it is called with every round complete.
    ///
    /// The caller performs the terminal actions when this returns true.
    pub fn maybe_complete<const R: usize>(&mut self, rounds: &RoundEngine<R>) -> bool {
        if self.fired || !rounds.all_rounds_complete() {
            return false;
        }
        self.fired = true;
        true
    }

    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
