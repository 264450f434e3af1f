// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Point-to-point link over a transparent serial radio module.
//!
//! The module on the other end of the UART broadcasts whatever bytes it is given and hands back
//! whatever it hears, with no retries. Every node sees every frame; frames addressed to someone
//! else are dropped here. Lost or corrupted frames are simply never delivered.
//!
//! Received bytes arrive from the UART interrupt into an [`RxBuffer`] and are read back out by
//! the control loop through a [`BufferedPort`], so nothing is lost while the loop is busy with a
//! countdown or a melody.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, warn};

use crate::game::ParticipantId;
use crate::io::Transport;
use crate::protocol::{Envelope, Message, Parser, MAX_FRAME_LEN};

/// Bytes read per [`RadioLink::receive`] before giving the control loop back.
pub const MAX_READ_PER_POLL: usize = 64;

/// Byte-level serial port under the link.
pub trait SerialPort {
    /// Queue one byte for transmission.
    fn write_byte(&mut self, byte: u8);
    /// Next received byte, or `None` if nothing is waiting. Must not block.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Transmit half of a UART.
pub trait ByteWriter {
    fn write_byte(&mut self, byte: u8);
}

/// Received bytes shared between the UART interrupt and the control loop.
pub struct RxBuffer<const CAP: usize> {
    bytes: Channel<CriticalSectionRawMutex, u8, CAP>,
    overruns: AtomicU32,
}

impl<const CAP: usize> Default for RxBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> RxBuffer<CAP> {
    pub const fn new() -> Self {
        Self {
            bytes: Channel::new(),
            overruns: AtomicU32::new(0),
        }
    }

    /// Store a received byte. Interrupt side; a full buffer drops the byte and counts it.
    pub fn push(&self, byte: u8) {
        if self.bytes.try_send(byte).is_err() {
            self.note_overrun();
        }
    }

    /// Count a byte the hardware lost before it could be stored.
    pub fn note_overrun(&self) {
        self.overruns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pop(&self) -> Option<u8> {
        self.bytes.try_receive().ok()
    }

    /// Bytes lost since the last call.
    pub fn take_overruns(&self) -> u32 {
        self.overruns.swap(0, Ordering::Relaxed)
    }
}

/// [`SerialPort`] over a UART transmitter and an interrupt-fed [`RxBuffer`].
pub struct BufferedPort<'a, W, const CAP: usize> {
    tx: W,
    rx: &'a RxBuffer<CAP>,
}

impl<'a, W: ByteWriter, const CAP: usize> BufferedPort<'a, W, CAP> {
    pub fn new(tx: W, rx: &'a RxBuffer<CAP>) -> Self {
        Self { tx, rx }
    }
}

impl<W: ByteWriter, const CAP: usize> SerialPort for BufferedPort<'_, W, CAP> {
    fn write_byte(&mut self, byte: u8) {
        self.tx.write_byte(byte);
    }

    fn read_byte(&mut self) -> Option<u8> {
        let lost = self.rx.take_overruns();
        if lost > 0 {
            warn!("radio receive overrun, {} bytes lost", lost);
        }
        self.rx.pop()
    }
}

pub struct RadioLink<PORT> {
    port: PORT,
    local: ParticipantId,
    parser: Parser,
}

impl<PORT: SerialPort> RadioLink<PORT> {
    pub fn new(port: PORT, local: ParticipantId) -> Self {
        Self {
            port,
            local,
            parser: Parser::new(),
        }
    }

    pub fn port_mut(&mut self) -> &mut PORT {
        &mut self.port
    }

    pub fn free(self) -> PORT {
        self.port
    }
}

impl<PORT: SerialPort> Transport for RadioLink<PORT> {
    fn send(&mut self, to: ParticipantId, message: &Message) {
        let envelope = Envelope {
            to,
            from: self.local,
            message: *message,
        };
        let mut frame = [0u8; MAX_FRAME_LEN];
        let len = envelope.encode(&mut frame);
        for &b in &frame[..len] {
            self.port.write_byte(b);
        }
    }

    fn receive(&mut self) -> Option<Envelope> {
        for _ in 0..MAX_READ_PER_POLL {
            let byte = self.port.read_byte()?;
            if let Some(envelope) = self.parser.push(byte) {
                if envelope.to == self.local {
                    return Some(envelope);
                }
                debug!(
                    "frame for {} from {} not addressed to us",
                    envelope.to.0, envelope.from.0
                );
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Loopback {
        tx: Vec<u8>,
        rx: VecDeque<u8>,
    }

    impl SerialPort for Loopback {
        fn write_byte(&mut self, byte: u8) {
            self.tx.push(byte);
        }

        fn read_byte(&mut self) -> Option<u8> {
            self.rx.pop_front()
        }
    }

    const LEADER: ParticipantId = ParticipantId(102);
    const FOLLOWER: ParticipantId = ParticipantId(112);

    #[test]
    fn frames_cross_between_two_links() {
        let mut leader = RadioLink::new(Loopback::default(), LEADER);
        let mut follower = RadioLink::new(Loopback::default(), FOLLOWER);

        leader.send(FOLLOWER, &Message::RoundProgress { round: 1 });
        let bytes = core::mem::take(&mut leader.port_mut().tx);
        follower.port_mut().rx.extend(bytes);

        assert_eq!(
            follower.receive(),
            Some(Envelope {
                to: FOLLOWER,
                from: LEADER,
                message: Message::RoundProgress { round: 1 },
            })
        );
        assert_eq!(follower.receive(), None);
    }

    #[test]
    fn frames_for_other_nodes_are_dropped() {
        let mut sender = RadioLink::new(Loopback::default(), LEADER);
        sender.send(ParticipantId(1), &Message::ModuleConnected);
        sender.send(FOLLOWER, &Message::RoundProgress { round: 0 });
        let bytes = core::mem::take(&mut sender.port_mut().tx);

        let mut follower = RadioLink::new(Loopback::default(), FOLLOWER);
        follower.port_mut().rx.extend(bytes);

        let got = follower.receive().unwrap();
        assert_eq!(got.message, Message::RoundProgress { round: 0 });
        assert_eq!(follower.receive(), None);
    }

    #[test]
    fn receive_returns_one_frame_at_a_time() {
        let mut sender = RadioLink::new(Loopback::default(), LEADER);
        sender.send(FOLLOWER, &Message::RoundProgress { round: 0 });
        sender.send(FOLLOWER, &Message::RoundProgress { round: 1 });
        let bytes = core::mem::take(&mut sender.port_mut().tx);

        let mut follower = RadioLink::new(Loopback::default(), FOLLOWER);
        follower.port_mut().rx.extend(bytes);

        assert_eq!(
            follower.receive().map(|e| e.message),
            Some(Message::RoundProgress { round: 0 })
        );
        assert_eq!(
            follower.receive().map(|e| e.message),
            Some(Message::RoundProgress { round: 1 })
        );
    }

    struct Wire(Vec<u8>);

    impl ByteWriter for Wire {
        fn write_byte(&mut self, byte: u8) {
            self.0.push(byte);
        }
    }

    #[test]
    fn buffered_port_keeps_frames_that_arrive_between_polls() {
        let mut sender = RadioLink::new(Loopback::default(), LEADER);
        for round in 0..10 {
            sender.send(FOLLOWER, &Message::RoundProgress { round });
        }
        let bytes = core::mem::take(&mut sender.port_mut().tx);

        let buffer: RxBuffer<256> = RxBuffer::new();
        let mut follower = RadioLink::new(BufferedPort::new(Wire(Vec::new()), &buffer), FOLLOWER);

        // Two frames land per control-loop pass, one is read back.
        let mut delivered = Vec::new();
        for chunk in bytes.chunks(2 * 6) {
            for &b in chunk {
                buffer.push(b);
            }
            if let Some(envelope) = follower.receive() {
                delivered.push(envelope.message);
            }
        }
        while let Some(envelope) = follower.receive() {
            delivered.push(envelope.message);
        }

        let expected: Vec<_> = (0..10).map(|round| Message::RoundProgress { round }).collect();
        assert_eq!(delivered, expected);
        assert_eq!(buffer.take_overruns(), 0);
    }

    #[test]
    fn full_rx_buffer_counts_lost_bytes() {
        let buffer: RxBuffer<4> = RxBuffer::new();
        for b in 0..6 {
            buffer.push(b);
        }
        buffer.note_overrun();

        let mut port = BufferedPort::new(Wire(Vec::new()), &buffer);
        assert_eq!(port.read_byte(), Some(0));
        assert_eq!(buffer.take_overruns(), 0);
        let rest: Vec<_> = (1..4).map(|_| port.read_byte()).collect();
        assert_eq!(rest, [Some(1), Some(2), Some(3)]);
        assert_eq!(port.read_byte(), None);
    }

    #[test]
    fn buffered_port_writes_through() {
        let buffer: RxBuffer<4> = RxBuffer::new();
        let mut link = RadioLink::new(BufferedPort::new(Wire(Vec::new()), &buffer), LEADER);
        link.send(FOLLOWER, &Message::RoundProgress { round: 2 });
        assert_eq!(link.port_mut().tx.0[0], 0xA5);
    }

    #[test]
    fn empty_port_does_not_block() {
        let mut link = RadioLink::new(Loopback::default(), FOLLOWER);
        assert_eq!(link.receive(), None);
    }
}
