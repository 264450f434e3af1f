// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Busy-wait delay counted in core clock cycles.
//!
//! Stateless and `Copy`, so the buzzer, the sensor calibration and the round countdown can each
//! hold their own.

use embedded_hal::delay::DelayNs;

#[derive(Copy, Clone, Debug)]
pub struct CycleDelay {
    sysclk_hz: u32,
}

impl CycleDelay {
    pub const fn new(sysclk_hz: u32) -> Self {
        Self { sysclk_hz }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(self.sysclk_hz) / 1_000_000_000;
        cortex_m::asm::delay(cycles as u32);
    }

    fn delay_us(&mut self, us: u32) {
        let per_us = self.sysclk_hz / 1_000_000;
        // Chunked so the cycle count never overflows.
        let mut left = us;
        while left > 0 {
            let chunk = left.min(1_000);
            cortex_m::asm::delay(chunk * per_us);
            left -= chunk;
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}
