// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Orientation Sync Firmware
//!
//! Firmware for the orientation calibration game: a leader node and one or more follower nodes
//! each read a live roll/pitch/yaw, the operators try to match a target orientation per round,
//! and the nodes agree over a lossy radio link before the group moves to the next round.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Round targets, tolerance, roster and role |
//! | [`game`] | Round engine, submissions and the sync state machine |
//! | [`io`] | Traits the core uses to reach sensor, panel and radio |
//! | [`protocol`] | Radio frames and the byte-wise parser |
//! | [`drivers`] | Device-level drivers (MPU-6050, SSD1306 OLED, buzzer, buttons, radio link, console) |
//! | [`hw`] | MCU-level wrappers (LEDs; USART, pins, delay, clock and logging with `board`) |
//! | [`startup`] | Power-on sequence and its fatal errors |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash a leader board (add `--features board,follower` for a follower):
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod drivers;
pub mod game;
pub mod hw;
pub mod io;
pub mod protocol;
pub mod startup;

pub use startup::StartupError;
