// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Text screens drawn onto a character [`Terminal`].
//!
//! Each [`Screen`] clears the terminal and draws a few centred lines, 21 columns wide to match
//! the 128 px OLED panel ([`Ssd1306`](crate::drivers::Ssd1306)). [`Ansi`] puts the same screens
//! on a serial terminal instead.
//!
//! Note: lines end in CRLF so they render correctly in `screen`/`minicom`.

use core::fmt::{self, Write};

use crate::io::Screen;

/// Characters per line.
pub const WIDTH: usize = 21;

const CLEAR: &str = "\x1b[2J\x1b[H";

/// Character device the console draws on.
pub trait Terminal: Write {
    /// Bring the device up. Fails if it does not answer.
    fn open(&mut self) -> fmt::Result {
        Ok(())
    }

    /// Blank the screen and home the cursor.
    fn clear(&mut self) -> fmt::Result;

    /// Push everything written since the last clear out to the device.
    fn flush(&mut self) -> fmt::Result {
        Ok(())
    }
}

/// Serial terminal understanding ANSI `ESC[2J ESC[H`.
pub struct Ansi<W>(pub W);

impl<W: Write> Write for Ansi<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s)
    }
}

impl<W: Write> Terminal for Ansi<W> {
    fn clear(&mut self) -> fmt::Result {
        self.0.write_str(CLEAR)
    }
}

pub struct Console<T> {
    out: T,
}

impl<T: Terminal> Console<T> {
    pub fn new(out: T) -> Self {
        Self { out }
    }

    /// Bring the terminal up and leave it blank.
    pub fn open(&mut self) -> fmt::Result {
        self.out.open()?;
        self.out.clear()?;
        self.out.flush()
    }

    pub fn draw(&mut self, screen: Screen) -> fmt::Result {
        self.out.clear()?;
        self.lines(screen)?;
        self.out.flush()
    }

    fn lines(&mut self, screen: Screen) -> fmt::Result {
        match screen {
            Screen::CalibrationSetup => {
                self.centred(format_args!("< Tuning Offsets >"))?;
                self.centred(format_args!("WAIT..."))
            }
            Screen::RoundStaged { round } => {
                self.centred(format_args!("Round {}", u16::from(round) + 1))?;
                self.centred(format_args!("Start Round"))
            }
            Screen::Countdown { round, remaining } => {
                self.centred(format_args!("Round {}", u16::from(round) + 1))?;
                self.centred(format_args!("{}", remaining))
            }
            Screen::Blank => Ok(()),
            Screen::Orientation(o) => {
                writeln!(self.out, "Roll: {}\r", o.roll)?;
                writeln!(self.out, "Pitch: {}\r", o.pitch)?;
                writeln!(self.out, "Yaw: {}\r", o.yaw)
            }
            Screen::WaitingForFollowers => self.centred(format_args!("Waiting for Followers")),
            Screen::WaitingForLeader => self.centred(format_args!("Waiting for Leader")),
            Screen::CalibrationStaged => {
                self.centred(format_args!("Completed"))?;
                self.centred(format_args!("Submit Calibration"))
            }
            Screen::CalibrationComplete => self.centred(format_args!("Calibration Complete")),
        }
    }

    /// Write one line, padded on the left so it sits in the middle of [`WIDTH`] columns.
    fn centred(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let mut counter = Counter(0);
        counter.write_fmt(args)?;
        let pad = WIDTH.saturating_sub(counter.0) / 2;
        for _ in 0..pad {
            self.out.write_char(' ')?;
        }
        self.out.write_fmt(args)?;
        self.out.write_str("\r\n")
    }

    pub fn free(self) -> T {
        self.out
    }
}

/// Measures formatted output without storing it.
struct Counter(usize);

impl Write for Counter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.chars().count();
        Ok(())
    }
}
