// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend writing to the USART1 debug terminal.
//!
//! The port lives in a critical-section mutex so records logged from an interrupt handler do not
//! interleave with the control loop's.

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record};
use stm32f7xx_hal::pac::USART1;

use crate::hw::Usart;

static PORT: Mutex<RefCell<Option<Usart<USART1>>>> = Mutex::new(RefCell::new(None));

struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(port, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                port.flush();
            }
        });
    }
}

/// Hand the debug port to the logger and install it. Calling twice keeps the first logger.
pub fn init(port: Usart<USART1>, level: LevelFilter) {
    interrupt::free(|cs| {
        PORT.borrow(cs).replace(Some(port));
    });
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
