// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Front panel: display, buzzer and indicator LEDs behind one [`PeripheralSink`].
//!
//! The panel is ready once its display has come up; a display that does not answer keeps the
//! node from starting.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::drivers::buzzer::Buzzer;
use crate::drivers::console::{Console, Terminal};
use crate::hw::Led;
use crate::io::{Cue, Indicator, PeripheralSink, Screen};

/// `R` round LEDs plus one calibrated LED, all on the same pin type.
pub struct Panel<T, BP, BD, L: OutputPin, const R: usize> {
    console: Console<T>,
    buzzer: Buzzer<BP, BD>,
    round_leds: [Led<L>; R],
    calibrated_led: Led<L>,
}

impl<T, BP, BD, L, const R: usize> Panel<T, BP, BD, L, R>
where
    T: Terminal,
    BP: OutputPin,
    BD: DelayNs,
    L: OutputPin,
{
    pub fn new(
        console: Console<T>,
        buzzer: Buzzer<BP, BD>,
        round_leds: [Led<L>; R],
        calibrated_led: Led<L>,
    ) -> Self {
        Self {
            console,
            buzzer,
            round_leds,
            calibrated_led,
        }
    }

    /// Every LED on, used to flag a fatal startup error.
    pub fn all_on(&mut self) {
        for led in self.round_leds.iter_mut() {
            led.set(true);
        }
        self.calibrated_led.set(true);
    }

    pub fn led(&self, indicator: Indicator) -> Option<&Led<L>> {
        match indicator {
            Indicator::Round(i) => self.round_leds.get(usize::from(i)),
            Indicator::Calibrated => Some(&self.calibrated_led),
        }
    }
}

impl<T, BP, BD, L, const R: usize> PeripheralSink for Panel<T, BP, BD, L, R>
where
    T: Terminal,
    BP: OutputPin,
    BD: DelayNs,
    L: OutputPin,
{
    fn ready(&mut self) -> bool {
        self.console.open().is_ok()
    }

    fn render(&mut self, screen: Screen) {
        if self.console.draw(screen).is_err() {
            warn!("failed to draw {:?}", screen);
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        self.buzzer.play_cue(cue);
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        match indicator {
            Indicator::Round(i) => match self.round_leds.get_mut(usize::from(i)) {
                Some(led) => led.set(on),
                None => warn!("no LED for round {}", i),
            },
            Indicator::Calibrated => self.calibrated_led.set(on),
        }
    }
}
