// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debounced push button.
//!
//! Poll from the control loop. A level change only counts once it has been seen on
//! `debounce_polls` consecutive polls; [`Button::poll`] reports the press edge exactly once.

use embedded_hal::digital::InputPin;

use crate::hw::led::ActiveLevel;

pub const DEFAULT_DEBOUNCE_POLLS: u8 = 5;

pub struct Button<PIN> {
    pin: PIN,
    active: ActiveLevel,
    debounce_polls: u8,
    pressed: bool,
    candidate: bool,
    streak: u8,
}

impl<PIN: InputPin> Button<PIN> {
    pub fn new(pin: PIN, active: ActiveLevel, debounce_polls: u8) -> Self {
        Self {
            pin,
            active,
            debounce_polls: debounce_polls.max(1),
            pressed: false,
            candidate: false,
            streak: 0,
        }
    }

    /// Button to ground with the MCU pull-up enabled.
    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low, DEFAULT_DEBOUNCE_POLLS)
    }

    /// Sample the pin. Returns true on the poll where a press is confirmed.
    pub fn poll(&mut self) -> bool {
        let raw = match self.active {
            ActiveLevel::High => self.pin.is_high(),
            ActiveLevel::Low => self.pin.is_low(),
        }
        .unwrap_or(false);

        if raw != self.candidate {
            self.candidate = raw;
            self.streak = 0;
        }
        self.streak = self.streak.saturating_add(1);

        if self.streak >= self.debounce_polls && self.candidate != self.pressed {
            self.pressed = self.candidate;
            return self.pressed;
        }
        false
    }

    /// Debounced state.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
