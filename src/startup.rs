// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Startup sequence.
//!
//! The node cannot play with a bad configuration, without its display or without its orientation
//! sensor. Any of these stops the sequence with a [`StartupError`] and the caller halts the
//! board; nothing runs degraded.

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use log::{error, info};
use thiserror::Error;

use crate::config::{ConfigError, GameConfig};
use crate::game::{Event, SyncMachine};
use crate::io::{OrientationSource, PeripheralSink, Transport};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StartupError {
    #[error("orientation sensor unavailable")]
    SensorUnavailable,
    #[error("display unavailable")]
    DisplayUnavailable,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Check `config` and build the node's machine around its peripherals.
pub fn assemble<S, P, T, D, const R: usize, const N: usize>(
    config: GameConfig<R, N>,
    sensor: S,
    panel: P,
    radio: T,
    delay: D,
) -> Result<SyncMachine<S, P, T, D, R, N>, StartupError>
where
    S: OrientationSource,
    P: PeripheralSink,
    T: Transport,
    D: DelayNs,
{
    SyncMachine::new(config, sensor, panel, radio, delay).map_err(|e| {
        error!("invalid configuration: {}", e);
        StartupError::from(e)
    })
}

/// Bring a node from power-on to its first staged state.
///
/// `prepare_sensor` runs while the setup screen is showing; it should check that the sensor
/// answers and compute its offsets.
pub fn start<S, P, T, D, F, E, const R: usize, const N: usize>(
    machine: &mut SyncMachine<S, P, T, D, R, N>,
    prepare_sensor: F,
) -> Result<(), StartupError>
where
    S: OrientationSource,
    P: PeripheralSink,
    T: Transport,
    D: DelayNs,
    F: FnOnce(&mut S) -> Result<(), E>,
    E: Debug,
{
    if !machine.panel_mut().ready() {
        error!("display did not respond");
        return Err(StartupError::DisplayUnavailable);
    }
    machine.begin();

    info!("initializing orientation sensor, keep the node still");
    if let Err(e) = prepare_sensor(machine.sensor_mut()) {
        error!("orientation sensor failed: {:?}", e);
        return Err(StartupError::SensorUnavailable);
    }
    info!("orientation sensor ready");

    machine.handle(Event::StartupFinished);
    Ok(())
}
