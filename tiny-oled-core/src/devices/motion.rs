// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motion sensor: an ICM-20948 sampled on one channel (accelerometer by default).

use crate::devices::MotionSensor;
use crate::drivers::icm20948::{Icm20948, Icm20948Settings, MotionChannel};
use crate::drivers::RegisterInterface;
use crate::error::SensorError;

/// Latest raw 3-axis reading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl From<[i16; 3]> for MotionSample {
    fn from([x, y, z]: [i16; 3]) -> Self {
        Self { x, y, z }
    }
}

pub struct Motion<I> {
    driver: Icm20948,
    io: I,
    channel: MotionChannel,
    sample: MotionSample,
}

impl<I: RegisterInterface> Motion<I> {
    pub fn new(io: I, settings: Icm20948Settings, channel: MotionChannel) -> Self {
        Self {
            driver: Icm20948::new(settings),
            io,
            channel,
            sample: MotionSample::default(),
        }
    }

    #[inline]
    pub fn channel(&self) -> MotionChannel {
        self.channel
    }

    pub fn set_channel(&mut self, channel: MotionChannel) {
        self.channel = channel;
    }

    pub fn free(self) -> I {
        self.io
    }
}

impl<I: RegisterInterface> MotionSensor for Motion<I> {
    fn init(&mut self) -> Result<(), SensorError> {
        self.driver.init(&mut self.io)?;
        self.get_data()
    }

    fn get_data(&mut self) -> Result<(), SensorError> {
        let axes = self.driver.read_axes(&mut self.io, self.channel)?;
        self.sample = axes.into();
        Ok(())
    }

    #[inline]
    fn sample(&self) -> &MotionSample {
        &self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::Peripheral;
    use crate::testing::{NoopDelay, Sim};

    #[test]
    fn samples_selected_channel() {
        let sim = Sim::with_parts();
        let bus = sim.bus();
        let mut motion = Motion::new(
            bus.device(Peripheral::Motion, NoopDelay),
            Icm20948Settings::default(),
            MotionChannel::default(),
        );

        motion.init().unwrap();
        assert_eq!(
            *motion.sample(),
            MotionSample {
                x: 1000,
                y: -2000,
                z: 16384,
            }
        );

        motion.set_channel(MotionChannel::Gyro);
        motion.get_data().unwrap();
        assert_eq!(*motion.sample(), MotionSample { x: -1, y: 2, z: 300 });
    }

    #[test]
    fn failed_read_keeps_previous_sample() {
        let sim = Sim::with_parts();
        let bus = sim.bus();
        let mut motion = Motion::new(
            bus.device(Peripheral::Motion, NoopDelay),
            Icm20948Settings::default(),
            MotionChannel::Accel,
        );
        motion.init().unwrap();

        sim.state().fail_spi = true;
        assert!(motion.get_data().is_err());
        assert_eq!(motion.sample().x, 1000);
    }
}
