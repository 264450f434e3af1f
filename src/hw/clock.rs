// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond clock from the DWT cycle counter.
//!
//! The 32-bit cycle counter wraps every ~19.9 s at 216 MHz, so [`Millis::now_ms`] must be called
//! more often than that. The control loop does.

use cortex_m::peripheral::{DCB, DWT};

pub struct Millis {
    cycles_per_ms: u32,
    last_cycles: u32,
    /// Cycles not yet folded into `ms`.
    spare: u32,
    ms: u32,
}

impl Millis {
    /// Enable the cycle counter and start counting from zero.
    pub fn new(dcb: &mut DCB, dwt: &mut DWT, sysclk_hz: u32) -> Self {
        dcb.enable_trace();
        dwt.enable_cycle_counter();
        Self {
            cycles_per_ms: sysclk_hz / 1_000,
            last_cycles: DWT::cycle_count(),
            spare: 0,
            ms: 0,
        }
    }

    /// Milliseconds since [`Millis::new`], wrapping at `u32::MAX`.
    pub fn now_ms(&mut self) -> u32 {
        let now = DWT::cycle_count();
        let elapsed = u64::from(now.wrapping_sub(self.last_cycles)) + u64::from(self.spare);
        self.last_cycles = now;

        let per_ms = u64::from(self.cycles_per_ms);
        self.ms = self.ms.wrapping_add((elapsed / per_ms) as u32);
        self.spare = (elapsed % per_ms) as u32;
        self.ms
    }
}
