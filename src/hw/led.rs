// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Indicator LED on any `embedded-hal` output pin.

use embedded_hal::digital::OutputPin;

/// Whether a pin is asserted high or low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED that remembers its wiring polarity and last commanded state.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Wrap a pin, starting OFF.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut led = Self {
            pin,
            active,
            is_on: true,
        };
        led.set(false);
        led
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        let drive_high = on == (self.active == ActiveLevel::High);
        if drive_high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.is_on = on;
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct Level(Option<bool>);

    impl ErrorType for Level {
        type Error = Infallible;
    }

    impl OutputPin for Level {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0 = Some(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0 = Some(true);
            Ok(())
        }
    }

    #[test]
    fn starts_off_for_either_polarity() {
        let high = Led::new(Level::default(), ActiveLevel::High);
        assert!(!high.is_on());
        assert_eq!(high.pin.0, Some(false));

        let low = Led::new(Level::default(), ActiveLevel::Low);
        assert_eq!(low.pin.0, Some(true));
    }

    #[test]
    fn active_low_inverts_drive() {
        let mut led = Led::new(Level::default(), ActiveLevel::Low);
        led.set(true);
        assert!(led.is_on());
        assert_eq!(led.pin.0, Some(false));
    }
}
