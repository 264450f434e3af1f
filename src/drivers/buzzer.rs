// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Passive piezo buzzer driven by bit-banging a GPIO.
//!
//! Tones are square waves generated with a blocking delay, so playing a melody stalls the caller
//! for its full length (about 0.8 s for [`SUCCESS`], 2.6 s for [`TRIUMPH`]).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::io::Cue;

/// One tone followed by a silent gap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub freq_hz: u16,
    pub duration_ms: u16,
    pub gap_ms: u16,
}

impl Note {
    pub const fn new(freq_hz: u16, duration_ms: u16, gap_ms: u16) -> Self {
        Self {
            freq_hz,
            duration_ms,
            gap_ms,
        }
    }
}

/// Rising three-note chime for a completed round.
pub const SUCCESS: [Note; 3] = [
    Note::new(1000, 200, 50),
    Note::new(1500, 200, 50),
    Note::new(2000, 300, 0),
];

/// Two rising phrases for a completed calibration.
pub const TRIUMPH: [Note; 8] = [
    Note::new(1000, 200, 50),
    Note::new(1200, 200, 50),
    Note::new(1500, 300, 50),
    Note::new(2000, 400, 50),
    Note::new(1000, 200, 50),
    Note::new(1200, 200, 50),
    Note::new(1500, 300, 50),
    Note::new(2000, 400, 50),
];

pub fn melody(cue: Cue) -> &'static [Note] {
    match cue {
        Cue::Success => &SUCCESS,
        Cue::Triumph => &TRIUMPH,
    }
}

pub struct Buzzer<PIN, D> {
    pin: PIN,
    delay: D,
}

impl<PIN: OutputPin, D: DelayNs> Buzzer<PIN, D> {
    pub fn new(mut pin: PIN, delay: D) -> Self {
        pin.set_low().ok();
        Self { pin, delay }
    }

    /// Square wave at `freq_hz` for `duration_ms`. A zero frequency is a rest.
    pub fn tone(&mut self, freq_hz: u16, duration_ms: u16) {
        if freq_hz == 0 {
            self.delay.delay_ms(u32::from(duration_ms));
            return;
        }

        let half_period_us = 500_000 / u32::from(freq_hz);
        let cycles = u32::from(duration_ms) * u32::from(freq_hz) / 1000;
        for _ in 0..cycles {
            self.pin.set_high().ok();
            self.delay.delay_us(half_period_us);
            self.pin.set_low().ok();
            self.delay.delay_us(half_period_us);
        }
    }

    pub fn play(&mut self, notes: &[Note]) {
        for note in notes {
            self.tone(note.freq_hz, note.duration_ms);
            if note.gap_ms > 0 {
                self.delay.delay_ms(u32::from(note.gap_ms));
            }
        }
    }

    pub fn play_cue(&mut self, cue: Cue) {
        self.play(melody(cue));
    }

    pub fn free(self) -> (PIN, D) {
        (self.pin, self.delay)
    }
}
