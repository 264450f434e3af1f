// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Blocking I²C buses exposed through the `embedded-hal` 1.0 `I2c` trait.
//!
//! I²C1 carries the orientation sensor, I²C2 the display. The HAL only offers whole write, read
//! and write-then-read transfers, so [`I2cBus`] accepts the transaction shapes that map onto one
//! of those and rejects the rest instead of splitting them into separate transfers with a stop
//! in between.

use core::fmt::Debug;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

/// The three transfers a blocking HAL driver performs, each with a single start and stop.
pub trait BlockingI2cOps {
    type Error: Debug;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Write, repeated start, read.
    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum I2cError<E> {
    Bus(E),
    /// The transaction needs more than one repeated start.
    UnsupportedTransaction,
}

impl<E: Debug> embedded_hal::i2c::Error for I2cError<E> {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct I2cBus<B> {
    bus: B,
}

impl<B: BlockingI2cOps> I2cBus<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn free(self) -> B {
        self.bus
    }
}

impl<B: BlockingI2cOps> ErrorType for I2cBus<B> {
    type Error = I2cError<B::Error>;
}

impl<B: BlockingI2cOps> I2c for I2cBus<B> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match operations {
            [] => Ok(()),
            [Operation::Write(bytes)] => self.bus.write(address, bytes),
            [Operation::Read(buffer)] => self.bus.read(address, buffer),
            [Operation::Write(bytes), Operation::Read(buffer)] => {
                self.bus.write_read(address, bytes, buffer)
            }
            _ => return Err(I2cError::UnsupportedTransaction),
        }
        .map_err(I2cError::Bus)
    }
}

#[cfg(feature = "board")]
pub use board::{I2c1, I2c2};

#[cfg(feature = "board")]
mod board {
    use stm32f7xx_hal::{
        gpio::{gpiob, Alternate, OpenDrain},
        hal::blocking::i2c::{Read, Write, WriteRead},
        i2c::{self, BlockingI2c},
        pac,
    };

    pub type I2c1 = BlockingI2c<
        pac::I2C1,
        gpiob::PB8<Alternate<4, OpenDrain>>,
        gpiob::PB9<Alternate<4, OpenDrain>>,
    >;

    pub type I2c2 = BlockingI2c<
        pac::I2C2,
        gpiob::PB10<Alternate<4, OpenDrain>>,
        gpiob::PB11<Alternate<4, OpenDrain>>,
    >;

    macro_rules! blocking_ops {
        ($($bus:ty,)+) => {
            $(
                impl super::BlockingI2cOps for $bus {
                    type Error = i2c::Error;

                    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), i2c::Error> {
                        Write::write(self, address, bytes)
                    }

                    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), i2c::Error> {
                        Read::read(self, address, buffer)
                    }

                    fn write_read(
                        &mut self,
                        address: u8,
                        bytes: &[u8],
                        buffer: &mut [u8],
                    ) -> Result<(), i2c::Error> {
                        WriteRead::write_read(self, address, bytes, buffer)
                    }
                }
            )+
        };
    }

    blocking_ops! {
        I2c1,
        I2c2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Transfer {
        Write(u8, Vec<u8>),
        Read(u8, usize),
        WriteRead(u8, Vec<u8>, usize),
    }

    #[derive(Default)]
    struct Recorder {
        transfers: Vec<Transfer>,
        nack: bool,
    }

    impl BlockingI2cOps for Recorder {
        type Error = ();

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
            self.transfers.push(Transfer::Write(address, bytes.to_vec()));
            if self.nack { Err(()) } else { Ok(()) }
        }

        fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), ()> {
            self.transfers.push(Transfer::Read(address, buffer.len()));
            buffer.fill(0xAB);
            Ok(())
        }

        fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), ()> {
            self.transfers
                .push(Transfer::WriteRead(address, bytes.to_vec(), buffer.len()));
            buffer.fill(0xCD);
            Ok(())
        }
    }

    #[test]
    fn register_read_uses_one_repeated_start() {
        let mut bus = I2cBus::new(Recorder::default());
        let mut out = [0u8; 2];
        bus.write_read(0x68, &[0x3B], &mut out).unwrap();

        assert_eq!(out, [0xCD, 0xCD]);
        assert_eq!(
            bus.free().transfers,
            vec![Transfer::WriteRead(0x68, vec![0x3B], 2)]
        );
    }

    #[test]
    fn single_transfers_pass_straight_through() {
        let mut bus = I2cBus::new(Recorder::default());
        bus.write(0x3C, &[0x00, 0xAF]).unwrap();
        let mut out = [0u8; 1];
        bus.read(0x3C, &mut out).unwrap();

        assert_eq!(
            bus.free().transfers,
            vec![Transfer::Write(0x3C, vec![0x00, 0xAF]), Transfer::Read(0x3C, 1)]
        );
    }

    #[test]
    fn longer_transactions_are_rejected_untouched() {
        let mut bus = I2cBus::new(Recorder::default());
        let result = bus.transaction(
            0x68,
            &mut [Operation::Write(&[0x6B]), Operation::Write(&[0x00])],
        );

        assert_eq!(result, Err(I2cError::UnsupportedTransaction));
        assert!(bus.free().transfers.is_empty());
    }

    #[test]
    fn bus_errors_are_wrapped() {
        let mut bus = I2cBus::new(Recorder {
            nack: true,
            ..Default::default()
        });
        assert_eq!(bus.write(0x3C, &[0x00]), Err(I2cError::Bus(())));
    }
}
