// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Climate sensor: a BME280 in forced mode behind one register interface.

use crate::devices::ClimateSensor;
use crate::drivers::bme280::{Bme280, Bme280Settings, Measurement};
use crate::drivers::RegisterInterface;
use crate::error::SensorError;

/// Latest compensated reading in the sensor's native scales.
///
/// - `temperature`: 0.01 °C
/// - `pressure`: 0.01 Pa
/// - `humidity`: 1/1024 %RH
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClimateSample {
    pub temperature: i32,
    pub pressure: u32,
    pub humidity: u32,
}

impl From<Measurement> for ClimateSample {
    fn from(m: Measurement) -> Self {
        Self {
            temperature: m.temperature,
            pressure: m.pressure,
            humidity: m.humidity,
        }
    }
}

pub struct Climate<I> {
    driver: Bme280,
    io: I,
    sample: ClimateSample,
}

impl<I: RegisterInterface> Climate<I> {
    pub fn new(io: I, settings: Bme280Settings) -> Self {
        Self {
            driver: Bme280::new(settings),
            io,
            sample: ClimateSample::default(),
        }
    }

    pub fn driver(&self) -> &Bme280 {
        &self.driver
    }

    pub fn free(self) -> I {
        self.io
    }
}

impl<I: RegisterInterface> ClimateSensor for Climate<I> {
    fn init(&mut self) -> Result<(), SensorError> {
        self.driver.init(&mut self.io)?;
        self.get_data()
    }

    fn get_data(&mut self) -> Result<(), SensorError> {
        let m = self.driver.measure(&mut self.io)?;
        self.sample = m.into();
        Ok(())
    }

    #[inline]
    fn sample(&self) -> &ClimateSample {
        &self.sample
    }
}
