// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-driven receive side of the USART2 radio port.
//!
//! The RXNE interrupt moves every received byte into [`RX_BUFFER`]; the control loop reads it
//! back through a [`BufferedPort`](crate::drivers::BufferedPort). Bytes the hardware overran, or
//! that found the buffer full, are counted there and reported on the next read.

use core::cell::RefCell;

use cortex_m::interrupt::{self, Mutex};
use stm32f7xx_hal::{pac::USART2, prelude::*, serial::Rx};

use crate::drivers::RxBuffer;

/// Nineteen full-size frames.
pub const RX_BUFFER_LEN: usize = 256;

pub static RX_BUFFER: RxBuffer<RX_BUFFER_LEN> = RxBuffer::new();

static RX: Mutex<RefCell<Option<Rx<USART2>>>> = Mutex::new(RefCell::new(None));

/// Hand the receiver to the interrupt handler. Call before unmasking USART2.
pub fn install(rx: Rx<USART2>) {
    interrupt::free(|cs| {
        RX.borrow(cs).replace(Some(rx));
    });
}

/// Body of the USART2 interrupt: drain the data register into [`RX_BUFFER`].
pub fn on_interrupt() {
    interrupt::free(|cs| {
        let mut rx = RX.borrow(cs).borrow_mut();
        let Some(rx) = rx.as_mut() else {
            return;
        };
        loop {
            match rx.read() {
                Ok(byte) => RX_BUFFER.push(byte),
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => RX_BUFFER.note_overrun(),
            }
        }
    });
}
