// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers.
//!
//! [`led`] and the [`i2c`] bus adapter are plain `embedded-hal` and always available. Everything
//! else wraps the STM32F7 HAL and only builds with the `board` feature.

pub mod i2c;
pub mod led;

#[cfg(feature = "board")]
pub mod clock;
#[cfg(feature = "board")]
pub mod delay;
#[cfg(feature = "board")]
pub mod logger;
#[cfg(feature = "board")]
pub mod pins;
#[cfg(feature = "board")]
pub mod radio_rx;
#[cfg(feature = "board")]
pub mod usart;

pub use i2c::{BlockingI2cOps, I2cBus, I2cError};
pub use led::{ActiveLevel, Led};

#[cfg(feature = "board")]
pub use clock::Millis;
#[cfg(feature = "board")]
pub use delay::CycleDelay;
#[cfg(feature = "board")]
pub use i2c::{I2c1, I2c2};
#[cfg(feature = "board")]
pub use pins::{BoardPins, InputLine, OutputLine};
#[cfg(feature = "board")]
pub use usart::Usart;
