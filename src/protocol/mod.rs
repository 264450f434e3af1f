// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod messages;
pub mod parser;

pub use messages::{Envelope, Message, MAX_FRAME_LEN};
pub use parser::Parser;
