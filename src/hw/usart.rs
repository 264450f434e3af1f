// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! Two ports use this wrapper: USART1 is the debug terminal for log output, USART2 talks to the
//! serial radio module. Only the transmit side lives here; the radio's receive side is handed to
//! [`radio_rx`](super::radio_rx) and read from its interrupt.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

use crate::drivers::ByteWriter;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    /// Transmit-only port; the receiver is dropped.
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        Self::with_rx(serial).0
    }

    /// Split off the receiver for interrupt-driven reads.
    pub fn with_rx<PINS: Pins<U>>(serial: Serial<U, PINS>) -> (Self, Rx<U>) {
        let (tx, rx) = serial.split();
        (Self { tx }, rx)
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> ByteWriter for Usart<U> {
    fn write_byte(&mut self, byte: u8) {
        Usart::write_byte(self, byte);
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}
