// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Status LED driven from the main loop as a liveness heartbeat.

use embedded_hal::digital::OutputPin;

use crate::tick::{Interval, Tick, WrapPolicy};

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED that remembers its active level and last state, and blinks on a fixed interval.
pub struct StatusLed<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
    blink: Interval,
}

impl<PIN: OutputPin> StatusLed<PIN> {
    /// Create the LED wrapper, initially OFF, toggling every `period` ticks once polled.
    pub fn new(
        pin: PIN,
        active: ActiveLevel,
        now: Tick,
        period: Tick,
        policy: WrapPolicy,
    ) -> Result<Self, PIN::Error> {
        let mut led = Self {
            pin,
            active,
            is_on: false,
            blink: Interval::new(now, period, policy),
        };
        led.set(false)?;
        Ok(led)
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) -> Result<(), PIN::Error> {
        match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high()?,
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low()?,
        }
        self.is_on = on;
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<(), PIN::Error> {
        self.set(!self.is_on)
    }

    /// Toggle if the blink interval has run out. Returns whether the LED changed.
    pub fn poll(&mut self, now: Tick) -> Result<bool, PIN::Error> {
        if self.blink.poll(now) {
            self.toggle()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LevelPin;

    #[test]
    fn active_low_led_starts_off_and_blinks() {
        let pin = LevelPin::default();
        let mut led = StatusLed::new(pin.clone(), ActiveLevel::Low, 0, 500, WrapPolicy::Modular)
            .unwrap();
        assert!(!led.is_on());
        assert!(pin.is_high());

        assert!(!led.poll(400).unwrap());
        assert!(led.poll(502).unwrap());
        assert!(led.is_on());
        assert!(!pin.is_high());

        assert!(led.poll(1_004).unwrap());
        assert!(!led.is_on());
        assert!(pin.is_high());
    }
}
