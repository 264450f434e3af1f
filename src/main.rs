// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board firmware for one calibration node.
//!
//! Builds the leader by default; `--features follower` builds the follower.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use cortex_m::peripheral::NVIC;
use embedded_hal::delay::DelayNs;
use hal::{
    i2c::{BlockingI2c, Mode},
    pac::{self, interrupt},
    prelude::*,
    serial::{self, Config, Serial},
};
use log::{error, info, LevelFilter};
use stm32f7xx_hal as hal;

use orientation_sync::{
    config::GameConfig,
    drivers::{
        mpu6050, ssd1306, BufferedPort, Button, Buzzer, Console, Mpu6050, Panel, RadioLink,
        Ssd1306,
    },
    game::Event,
    hw::{logger, radio_rx, BoardPins, CycleDelay, I2cBus, Led, Millis, Usart},
    startup::{self, StartupError},
};

const SYSCLK_HZ: u32 = 216_000_000;

/// Control loop period.
const TICK_MS: u32 = 2;

/// Gyro/accel samples averaged for the startup offsets.
const CALIBRATION_SAMPLES: u16 = 500;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(SYSCLK_HZ.Hz()).freeze();
    let mut apb1 = rcc.apb1;

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
    let mut delay = CycleDelay::new(SYSCLK_HZ);
    let mut clock = Millis::new(&mut cp.DCB, &mut cp.DWT, SYSCLK_HZ);

    // USART1 (DBG)
    let debug = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        serial_config(),
    );
    logger::init(Usart::new(debug), LevelFilter::Info);

    // USART2 (radio), received bytes arrive through the RXNE interrupt
    let mut radio = Serial::new(
        dp.USART2,
        (pins.usart2.tx, pins.usart2.rx),
        &clocks,
        serial_config(),
    );
    radio.listen(serial::Event::Rxne);
    let (radio_tx, radio_rx) = Usart::with_rx(radio);
    radio_rx::install(radio_rx);
    unsafe { NVIC::unmask(pac::Interrupt::USART2) };

    // I2C1 (IMU)
    let i2c1 = BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::standard(100.kHz()),
        &clocks,
        &mut apb1,
        10_000,
    );

    // I2C2 (OLED)
    let i2c2 = BlockingI2c::i2c2(
        dp.I2C2,
        (pins.i2c2.scl, pins.i2c2.sda),
        Mode::fast(400.kHz()),
        &clocks,
        &mut apb1,
        10_000,
    );

    #[cfg(not(feature = "follower"))]
    let config = GameConfig::default_leader();
    #[cfg(feature = "follower")]
    let config = GameConfig::default_follower();

    info!("{} rounds, tolerance {} deg", config.rounds(), config.tolerance);

    let [r0, r1, r2] = pins.leds.rounds;
    let panel = Panel::new(
        Console::new(Ssd1306::new(I2cBus::new(i2c2), ssd1306::DEFAULT_ADDRESS)),
        Buzzer::new(pins.buzzer, delay),
        [Led::active_high(r0), Led::active_high(r1), Led::active_high(r2)],
        Led::active_high(pins.leds.calibrated),
    );
    let imu = Mpu6050::new(I2cBus::new(i2c1), mpu6050::DEFAULT_ADDRESS);
    let port = BufferedPort::new(radio_tx, &radio_rx::RX_BUFFER);
    let link = RadioLink::new(port, config.local_id);

    let mut machine = match startup::assemble(config, imu, panel, link, delay) {
        Ok(machine) => machine,
        Err(e) => fatal(e),
    };

    let started = startup::start(&mut machine, |imu| {
        imu.init()?;
        imu.calibrate(&mut delay, CALIBRATION_SAMPLES)
    });
    if let Err(e) = started {
        machine.panel_mut().all_on();
        fatal(e);
    }

    let mut submit = Button::active_low(pins.buttons.submit);
    let mut load_next = Button::active_low(pins.buttons.load_next);
    let mut confirm = Button::active_low(pins.buttons.confirm);

    let mut last_ms = clock.now_ms();
    loop {
        let now_ms = clock.now_ms();
        let dt = now_ms.wrapping_sub(last_ms) as f32 / 1_000.0;
        last_ms = now_ms;

        for (button, event) in [
            (&mut submit, Event::SubmitPressed),
            (&mut load_next, Event::LoadNextRoundPressed),
            (&mut confirm, Event::ConfirmCalibrationPressed),
        ] {
            if button.poll() && machine.post(event).is_err() {
                error!("event queue full, dropped button press");
            }
        }

        mpu6050::update_or_warn(machine.sensor_mut(), dt);
        machine.poll(now_ms);

        delay.delay_ms(TICK_MS);
    }
}

fn serial_config() -> Config {
    Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    }
}

#[interrupt]
fn USART2() {
    radio_rx::on_interrupt();
}

fn fatal(e: StartupError) -> ! {
    error!("startup failed: {}", e);
    halt()
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
