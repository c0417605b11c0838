// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Peripheral Abstractions
//!
//! Device-level wrappers that sit above the register drivers in `drivers` and expose exactly what
//! the main loop consumes.
//!
//! ## Modules
//!
//! - [`climate`] - climate sensor (BME280) owning its latest sample.
//! - [`motion`] - motion sensor (ICM-20948) owning its latest sample.
//! - [`display`] - OLED renderer for the three screens.
//!
//! Sensors keep their last good sample. A failed `get_data` returns the error and leaves the sample
//! as it was, so the renderer keeps showing stale but valid values.

use crate::error::{DisplayError, SensorError};

pub mod climate;
pub mod display;
pub mod motion;

pub use climate::{Climate, ClimateSample};
pub use display::Oled;
pub use motion::{Motion, MotionSample};

pub trait ClimateSensor {
    /// Bring the sensor up and take a first sample.
    fn init(&mut self) -> Result<(), SensorError>;

    /// Refresh the stored sample. On error the previous sample is kept.
    fn get_data(&mut self) -> Result<(), SensorError>;

    fn sample(&self) -> &ClimateSample;
}

pub trait MotionSensor {
    fn init(&mut self) -> Result<(), SensorError>;

    /// Refresh the stored sample. On error the previous sample is kept.
    fn get_data(&mut self) -> Result<(), SensorError>;

    fn sample(&self) -> &MotionSample;
}

/// Screen renderer. Every call redraws the full panel from the given fields.
pub trait Display {
    fn init(&mut self) -> Result<(), DisplayError>;

    fn splash(&mut self) -> Result<(), DisplayError>;

    /// `temperature` in 0.01 °C, `humidity` in 1/1024 %RH, `pressure` in 0.01 Pa.
    fn climate(&mut self, temperature: i32, humidity: u32, pressure: u32)
        -> Result<(), DisplayError>;

    fn telemetry(&mut self, x: i16, y: i16, z: i16) -> Result<(), DisplayError>;
}
