// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 calibration node.
//!
//! Both roles use the same wiring; the `follower` feature only changes which config the firmware
//! boots with.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stm32f7xx_hal::{
    gpio::{
        gpioa, gpiob, gpiod, Alternate, ErasedPin, Input, OpenDrain, Output, PullUp, PushPull,
    },
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub buttons: ButtonPins,
    pub buzzer: OutputLine,
    pub usart1: Usart1Pins,
    pub usart2: Usart2Pins,
    pub i2c1: I2c1Pins,
    pub i2c2: I2c2Pins,
}

/// One LED per round plus the calibrated LED.
pub struct LedPins {
    pub rounds: [OutputLine; 3],
    pub calibrated: OutputLine,
}

/// Momentary switches to ground, internal pull-ups.
pub struct ButtonPins {
    pub submit: InputLine,
    pub load_next: InputLine,
    pub confirm: InputLine,
}

/// Debug terminal
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Radio module
pub struct Usart2Pins {
    pub tx: gpiod::PD5<Alternate<7>>,
    pub rx: gpiod::PD6<Alternate<7>>,
}

/// MPU-6050
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// SSD1306 OLED
pub struct I2c2Pins {
    pub scl: gpiob::PB10<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB11<Alternate<4, OpenDrain>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                rounds: [
                    OutputLine(gpiod.pd8.into_push_pull_output().erase()),
                    OutputLine(gpiod.pd9.into_push_pull_output().erase()),
                    OutputLine(gpiod.pd10.into_push_pull_output().erase()),
                ],
                calibrated: OutputLine(gpiod.pd11.into_push_pull_output().erase()),
            },

            buttons: ButtonPins {
                submit: InputLine(gpioe.pe2.into_pull_up_input().erase()),
                load_next: InputLine(gpioe.pe3.into_pull_up_input().erase()),
                confirm: InputLine(gpioe.pe5.into_pull_up_input().erase()),
            },

            buzzer: OutputLine(gpioe.pe6.into_push_pull_output().erase()),

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            usart2: Usart2Pins {
                tx: gpiod.pd5.into_alternate::<7>(),
                rx: gpiod.pd6.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            i2c2: I2c2Pins {
                scl: gpiob.pb10.into_alternate_open_drain::<4>(),
                sda: gpiob.pb11.into_alternate_open_drain::<4>(),
            },
        }
    }
}

/// Push-pull output behind the `embedded-hal` 1.0 `OutputPin` trait.
pub struct OutputLine(ErasedPin<Output<PushPull>>);

impl ErrorType for OutputLine {
    type Error = Infallible;
}

impl OutputPin for OutputLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set_high();
        Ok(())
    }
}

/// Pulled-up input behind the `embedded-hal` 1.0 `InputPin` trait.
pub struct InputLine(ErasedPin<Input<PullUp>>);

impl ErrorType for InputLine {
    type Error = Infallible;
}

impl InputPin for InputLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.is_low())
    }
}
