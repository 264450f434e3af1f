// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! game core. They are written against `embedded-hal` 1.0 traits and a couple of crate-local
//! traits, so they build and test on the host.
//!
//! ## Existing drivers
//!
//! - [`mpu6050`] – InvenSense MPU-6050 IMU, the node's orientation source
//! - [`buzzer`] – Bit-banged piezo buzzer and the success/triumph melodies
//! - [`button`] – Debounced push button
//! - [`radio`] – Addressed frames over a transparent serial radio module
//! - [`console`] – Text screens on a character terminal
//! - [`ssd1306`] – SSD1306 128x64 OLED as a character terminal
//! - [`panel`] – Console + buzzer + LEDs as one peripheral sink

pub mod button;
pub mod buzzer;
pub mod console;
pub mod mpu6050;
pub mod panel;
pub mod radio;
pub mod ssd1306;

pub use button::Button;
pub use buzzer::Buzzer;
pub use console::{Ansi, Console, Terminal};
pub use mpu6050::Mpu6050;
pub use panel::Panel;
pub use radio::{BufferedPort, ByteWriter, RadioLink, RxBuffer, SerialPort};
pub use ssd1306::Ssd1306;
