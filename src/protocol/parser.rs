// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame parser for the radio protocol.
//!
//! Bytes arrive one at a time from the serial radio. The parser hunts for [`START_BYTE`], reads
//! the header and a payload sized by the message id, and checks the trailing checksum. Any
//! unknown id or checksum mismatch drops the frame and resumes hunting.

use log::debug;

use crate::game::ParticipantId;
use crate::protocol::messages::*;

#[derive(Clone, Copy)]
enum State {
    WaitStart,
    WaitTo,
    WaitFrom { to: u8 },
    WaitId { to: u8, from: u8 },
    Payload { to: u8, from: u8, id: u8, len: usize },
    WaitChecksum { to: u8, from: u8, id: u8, len: usize },
}

pub struct Parser {
    state: State,
    checksum: u8,
    payload: [u8; MAX_PAYLOAD_LEN],
    filled: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::WaitStart,
            checksum: 0,
            payload: [0; MAX_PAYLOAD_LEN],
            filled: 0,
        }
    }

    /// Process a single incoming byte. Returns `Some(Envelope)` when a complete, valid frame is
    /// received.
    pub fn push(&mut self, byte: u8) -> Option<Envelope> {
        match self.state {
            State::WaitStart => {
                if byte == START_BYTE {
                    self.state = State::WaitTo;
                    self.checksum = 0;
                    self.filled = 0;
                }
            }
            State::WaitTo => {
                self.checksum = self.checksum.wrapping_add(byte);
                self.state = State::WaitFrom { to: byte };
            }
            State::WaitFrom { to } => {
                self.checksum = self.checksum.wrapping_add(byte);
                self.state = State::WaitId { to, from: byte };
            }
            State::WaitId { to, from } => {
                self.checksum = self.checksum.wrapping_add(byte);

                self.state = match payload_len(byte) {
                    Some(0) => State::WaitChecksum {
                        to,
                        from,
                        id: byte,
                        len: 0,
                    },
                    Some(len) => State::Payload {
                        to,
                        from,
                        id: byte,
                        len,
                    },
                    None => {
                        debug!("dropping frame with unknown id {:#04x}", byte);
                        State::WaitStart
                    }
                };
            }
            State::Payload { to, from, id, len } => {
                self.checksum = self.checksum.wrapping_add(byte);
                self.payload[self.filled] = byte;
                self.filled += 1;
                if self.filled == len {
                    self.state = State::WaitChecksum { to, from, id, len };
                }
            }
            State::WaitChecksum { to, from, id, len } => {
                let valid = byte == self.checksum;
                self.state = State::WaitStart; // Reset for next frame

                if !valid {
                    debug!("dropping frame {:#04x}: bad checksum", id);
                    return None;
                }

                return Message::from_payload(id, &self.payload[..len]).map(|message| Envelope {
                    to: ParticipantId(to),
                    from: ParticipantId(from),
                    message,
                });
            }
        }
        None
    }
}
