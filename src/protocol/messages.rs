// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Radio message set exchanged between leader, followers and the hub.
//!
//! Frame layout:
//!
//! ```text
//! START | to | from | id | payload ... | checksum
//! ```
//!
//! The checksum is the wrapping sum of every byte after `START`. Payload length is fixed per id.

use crate::game::{Orientation, ParticipantId};

/// Sync byte for the protocol.
pub const START_BYTE: u8 = 0xA5;

// Message IDs
pub const MSG_ROUND_PROGRESS: u8 = 0x10;
pub const MSG_SUBMISSION: u8 = 0x11;
pub const MSG_GROUP_CALIBRATED: u8 = 0x12;
pub const MSG_MODULE_CONNECTED: u8 = 0x13;

/// to + from + id
pub const HEADER_LEN: usize = 3;

/// Largest payload of any message (`Submission`).
pub const MAX_PAYLOAD_LEN: usize = 8;

/// Largest encoded frame, start and checksum bytes included.
pub const MAX_FRAME_LEN: usize = 1 + HEADER_LEN + MAX_PAYLOAD_LEN + 1;

/// Payload length for a message id, or `None` for an unknown id.
pub fn payload_len(id: u8) -> Option<usize> {
    match id {
        MSG_ROUND_PROGRESS => Some(1),
        MSG_SUBMISSION => Some(8),
        MSG_GROUP_CALIBRATED => Some(1),
        MSG_MODULE_CONNECTED => Some(0),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Leader -> follower: round `round` is now live.
    RoundProgress { round: u8 },
    /// Follower -> leader: `participant` matched round `round` with `orientation`.
    Submission {
        participant: ParticipantId,
        round: u8,
        orientation: Orientation,
    },
    /// Leader -> hub: terminal calibration status.
    GroupCalibrated { calibrated: bool },
    /// Leader -> hub: this module is up.
    ModuleConnected,
}

impl Message {
    pub fn id(&self) -> u8 {
        match self {
            Message::RoundProgress { .. } => MSG_ROUND_PROGRESS,
            Message::Submission { .. } => MSG_SUBMISSION,
            Message::GroupCalibrated { .. } => MSG_GROUP_CALIBRATED,
            Message::ModuleConnected => MSG_MODULE_CONNECTED,
        }
    }

    /// Write the payload into `out`, returning the number of bytes used.
    fn write_payload(&self, out: &mut [u8; MAX_PAYLOAD_LEN]) -> usize {
        match *self {
            Message::RoundProgress { round } => {
                out[0] = round;
                1
            }
            Message::Submission {
                participant,
                round,
                orientation,
            } => {
                out[0] = participant.0;
                out[1] = round;
                out[2..4].copy_from_slice(&orientation.roll.to_le_bytes());
                out[4..6].copy_from_slice(&orientation.pitch.to_le_bytes());
                out[6..8].copy_from_slice(&orientation.yaw.to_le_bytes());
                8
            }
            Message::GroupCalibrated { calibrated } => {
                out[0] = calibrated as u8;
                1
            }
            Message::ModuleConnected => 0,
        }
    }

    /// Rebuild a message from its id and payload. `payload` must be `payload_len(id)` long.
    pub(crate) fn from_payload(id: u8, payload: &[u8]) -> Option<Self> {
        if payload_len(id) != Some(payload.len()) {
            return None;
        }
        match id {
            MSG_ROUND_PROGRESS => Some(Message::RoundProgress { round: payload[0] }),
            MSG_SUBMISSION => Some(Message::Submission {
                participant: ParticipantId(payload[0]),
                round: payload[1],
                orientation: Orientation::new(
                    i16::from_le_bytes([payload[2], payload[3]]),
                    i16::from_le_bytes([payload[4], payload[5]]),
                    i16::from_le_bytes([payload[6], payload[7]]),
                ),
            }),
            MSG_GROUP_CALIBRATED => Some(Message::GroupCalibrated {
                calibrated: payload[0] != 0,
            }),
            MSG_MODULE_CONNECTED => Some(Message::ModuleConnected),
            _ => None,
        }
    }
}

/// A message together with its addressing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub to: ParticipantId,
    pub from: ParticipantId,
    pub message: Message,
}

impl Envelope {
    /// Encode a full frame into `out`, returning the frame length.
    pub fn encode(&self, out: &mut [u8; MAX_FRAME_LEN]) -> usize {
        let mut payload = [0u8; MAX_PAYLOAD_LEN];
        let n = self.message.write_payload(&mut payload);

        out[0] = START_BYTE;
        out[1] = self.to.0;
        out[2] = self.from.0;
        out[3] = self.message.id();
        out[4..4 + n].copy_from_slice(&payload[..n]);

        let end = 1 + HEADER_LEN + n;
        out[end] = checksum(&out[1..end]);
        end + 1
    }
}

/// Wrapping byte sum.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_progress_frame_layout() {
        let env = Envelope {
            to: ParticipantId(112),
            from: ParticipantId(102),
            message: Message::RoundProgress { round: 2 },
        };
        let mut buf = [0u8; MAX_FRAME_LEN];
        let n = env.encode(&mut buf);
        let sum = 112u8.wrapping_add(102).wrapping_add(MSG_ROUND_PROGRESS).wrapping_add(2);
        assert_eq!(&buf[..n], &[START_BYTE, 112, 102, MSG_ROUND_PROGRESS, 2, sum]);
    }

    #[test]
    fn submission_payload_is_little_endian() {
        let env = Envelope {
            to: ParticipantId(102),
            from: ParticipantId(112),
            message: Message::Submission {
                participant: ParticipantId(112),
                round: 1,
                orientation: Orientation::new(-1, 2, 300),
            },
        };
        let mut buf = [0u8; MAX_FRAME_LEN];
        let n = env.encode(&mut buf);
        assert_eq!(n, MAX_FRAME_LEN);
        assert_eq!(&buf[4..12], &[112, 1, 0xFF, 0xFF, 2, 0, 0x2C, 0x01]);
    }

    #[test]
    fn unknown_ids_have_no_payload_length() {
        assert_eq!(payload_len(0x00), None);
        assert_eq!(payload_len(0xFF), None);
        assert_eq!(Message::from_payload(0x55, &[]), None);
    }

    #[test]
    fn wrong_payload_length_is_rejected() {
        assert_eq!(Message::from_payload(MSG_ROUND_PROGRESS, &[1, 2]), None);
        assert_eq!(
            Message::from_payload(MSG_GROUP_CALIBRATED, &[1]),
            Some(Message::GroupCalibrated { calibrated: true })
        );
    }
}
