// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! InvenSense MPU-6050 6-axis IMU over I²C, used as the node's orientation source.
//!
//! Roll and pitch come from a complementary filter (gyro integration corrected by the
//! accelerometer's gravity vector); yaw is pure gyro integration and drifts slowly.
//!
//! Wiring:
//! - SCL/SDA to the board's I²C1 pins
//! - AD0 low (address 0x68)
//!
//! Call [`Mpu6050::init`] and [`Mpu6050::calibrate`] once at startup while the node is held
//! still, then [`Mpu6050::update`] from the control loop.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;
use micromath::F32Ext;
use thiserror::Error;

use crate::game::Orientation;
use crate::io::OrientationSource;

/// I²C address with AD0 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x68;

// Registers
const REG_SMPLRT_DIV: u8 = 0x19;
const REG_CONFIG: u8 = 0x1A;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

const WHO_AM_I_VALUE: u8 = 0x68;

/// ±500 °/s full scale.
const GYRO_CONFIG_500DPS: u8 = 0x08;
const GYRO_LSB_PER_DPS: f32 = 65.5;

/// ±2 g full scale.
const ACCEL_CONFIG_2G: u8 = 0x00;
const ACCEL_LSB_PER_G: f32 = 16_384.0;

/// Weight given to the integrated gyro angle in the complementary filter.
pub const GYRO_WEIGHT: f32 = 0.98;

const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

#[derive(Debug, Error)]
pub enum Mpu6050Error<E> {
    #[error("i2c transfer failed: {0:?}")]
    Bus(E),
    #[error("unexpected WHO_AM_I value {0:#04x}")]
    WrongDevice(u8),
}

/// One raw sample, scaled to g and °/s.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Reading {
    pub accel: [f32; 3],
    pub gyro: [f32; 3],
}

impl Reading {
    fn from_registers(buf: &[u8; 14]) -> Self {
        let word = |i: usize| i16::from_be_bytes([buf[i], buf[i + 1]]) as f32;
        Self {
            accel: [
                word(0) / ACCEL_LSB_PER_G,
                word(2) / ACCEL_LSB_PER_G,
                word(4) / ACCEL_LSB_PER_G,
            ],
            // buf[6..8] is the die temperature.
            gyro: [
                word(8) / GYRO_LSB_PER_DPS,
                word(10) / GYRO_LSB_PER_DPS,
                word(12) / GYRO_LSB_PER_DPS,
            ],
        }
    }
}

/// Fuses accelerometer and gyro readings into angles in degrees.
#[derive(Copy, Clone, Debug, Default)]
pub struct ComplementaryFilter {
    angle: [f32; 3],
}

impl ComplementaryFilter {
    pub const fn new() -> Self {
        Self { angle: [0.0; 3] }
    }

    pub fn reset(&mut self) {
        self.angle = [0.0; 3];
    }

    /// Fold in one reading taken `dt` seconds after the previous one.
    pub fn update(&mut self, reading: &Reading, dt: f32) {
        let [ax, ay, az] = reading.accel;
        let [gx, gy, gz] = reading.gyro;

        let sign_z = if az < 0.0 { -1.0 } else { 1.0 };
        let acc_x = ay.atan2(sign_z * (az * az + ax * ax).sqrt()) * RAD_TO_DEG;
        let acc_y = -ax.atan2((az * az + ay * ay).sqrt()) * RAD_TO_DEG;

        self.angle[0] = GYRO_WEIGHT * (self.angle[0] + gx * dt) + (1.0 - GYRO_WEIGHT) * acc_x;
        self.angle[1] =
            GYRO_WEIGHT * (self.angle[1] + sign_z * gy * dt) + (1.0 - GYRO_WEIGHT) * acc_y;
        self.angle[2] += gz * dt;
    }

    /// Angles about x, y and z in degrees.
    #[inline]
    pub fn angles(&self) -> [f32; 3] {
        self.angle
    }

    /// Whole-degree orientation in the board's convention (roll and yaw negated).
    pub fn orientation(&self) -> Orientation {
        Orientation::new(
            -whole_degrees(self.angle[0]),
            whole_degrees(self.angle[1]),
            -whole_degrees(self.angle[2]),
        )
    }
}

/// Truncate toward zero and saturate into `i16`.
fn whole_degrees(deg: f32) -> i16 {
    deg.clamp(i16::MIN as f32 + 1.0, i16::MAX as f32) as i16
}

pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
    accel_offset: [f32; 3],
    gyro_offset: [f32; 3],
    filter: ComplementaryFilter,
    latest: Orientation,
}

impl<I2C: I2c> Mpu6050<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            accel_offset: [0.0; 3],
            gyro_offset: [0.0; 3],
            filter: ComplementaryFilter::new(),
            latest: Orientation::default(),
        }
    }

    /// Check the device identity and configure ranges.
    pub fn init(&mut self) -> Result<(), Mpu6050Error<I2C::Error>> {
        let mut who = [0u8];
        self.i2c
            .write_read(self.address, &[REG_WHO_AM_I], &mut who)
            .map_err(Mpu6050Error::Bus)?;
        if who[0] != WHO_AM_I_VALUE {
            return Err(Mpu6050Error::WrongDevice(who[0]));
        }

        // Wake up, clock from the x gyro PLL.
        self.write_reg(REG_PWR_MGMT_1, 0x01)?;
        self.write_reg(REG_SMPLRT_DIV, 0x00)?;
        self.write_reg(REG_CONFIG, 0x00)?;
        self.write_reg(REG_GYRO_CONFIG, GYRO_CONFIG_500DPS)?;
        self.write_reg(REG_ACCEL_CONFIG, ACCEL_CONFIG_2G)?;
        Ok(())
    }

    /// Average `samples` readings taken while the node sits level and still, and use them as
    /// zero offsets. The accelerometer z axis is expected to read +1 g.
    pub fn calibrate<D: DelayNs>(
        &mut self,
        delay: &mut D,
        samples: u16,
    ) -> Result<(), Mpu6050Error<I2C::Error>> {
        let mut accel = [0.0f32; 3];
        let mut gyro = [0.0f32; 3];

        for _ in 0..samples {
            let r = self.read_raw()?;
            for axis in 0..3 {
                accel[axis] += r.accel[axis];
                gyro[axis] += r.gyro[axis];
            }
            delay.delay_ms(1);
        }

        let n = f32::from(samples.max(1));
        for axis in 0..3 {
            self.accel_offset[axis] = accel[axis] / n;
            self.gyro_offset[axis] = gyro[axis] / n;
        }
        self.accel_offset[2] -= 1.0;

        self.filter.reset();
        self.latest = Orientation::default();
        Ok(())
    }

    /// Read the sensor and advance the filter by `dt` seconds.
    ///
    /// On a bus error the previous orientation is kept.
    pub fn update(&mut self, dt: f32) -> Result<(), Mpu6050Error<I2C::Error>> {
        let mut r = self.read_raw()?;
        for axis in 0..3 {
            r.accel[axis] -= self.accel_offset[axis];
            r.gyro[axis] -= self.gyro_offset[axis];
        }
        self.filter.update(&r, dt);
        self.latest = self.filter.orientation();
        Ok(())
    }

    fn read_raw(&mut self) -> Result<Reading, Mpu6050Error<I2C::Error>> {
        let mut buf = [0u8; 14];
        self.i2c
            .write_read(self.address, &[REG_ACCEL_XOUT_H], &mut buf)
            .map_err(Mpu6050Error::Bus)?;
        Ok(Reading::from_registers(&buf))
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Mpu6050Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(Mpu6050Error::Bus)
    }

    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> OrientationSource for Mpu6050<I2C> {
    fn sample(&mut self) -> Orientation {
        self.latest
    }
}

/// Convenience for the control loop: update and log, never fail.
pub fn update_or_warn<I2C: I2c>(imu: &mut Mpu6050<I2C>, dt: f32) {
    if let Err(e) = imu.update(dt) {
        warn!("imu update failed: {:?}", e);
    }
}
