// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Main-loop pass.
//!
//! The scheduler owns the device state, the three peripherals and the Output Sink. Each call to
//! [`Scheduler::run_pass`] is one iteration of the firmware's `loop {}`:
//!
//! 1. apply transition rules,
//! 2. refresh the sample the current screen shows (and emit telemetry when due),
//! 3. redraw if the refresh throttle allows.
//!
//! Nothing here blocks except the peripherals' own busy-waits. Failures are logged and the pass
//! goes on with the previous sample.

use core::fmt::Write;

use crate::config::Timing;
use crate::control::state_machine::{Device, Screen, Transition};
use crate::devices::{ClimateSensor, Display, MotionSensor};
use crate::error::{DisplayError, SensorError};
use crate::events::ButtonFlags;
use crate::protocol;
use crate::tick::Tick;

/// Outcome of [`Scheduler::boot`]. Failures are not fatal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BootReport {
    pub climate: Result<(), SensorError>,
    pub motion: Result<(), SensorError>,
    pub display: Result<(), DisplayError>,
}

/// What one pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    pub transition: Option<Transition>,
    /// A screen was rendered and flushed.
    pub redrawn: bool,
    pub telemetry_sent: bool,
    /// `None` when the climate sensor was not sampled this pass.
    pub climate_ok: Option<bool>,
    /// `None` when the motion sensor was not sampled this pass.
    pub motion_ok: Option<bool>,
}

pub struct Scheduler<C, M, D, W> {
    device: Device,
    climate: C,
    motion: M,
    display: D,
    sink: W,
}

impl<C, M, D, W> Scheduler<C, M, D, W>
where
    C: ClimateSensor,
    M: MotionSensor,
    D: Display,
    W: Write,
{
    pub fn new(now: Tick, climate: C, motion: M, display: D, sink: W, timing: Timing) -> Self {
        Self {
            device: Device::new(now, timing),
            climate,
            motion,
            display,
            sink,
        }
    }

    /// Banner, peripheral bring-up, splash screen.
    pub fn boot(&mut self) -> BootReport {
        if protocol::write_banner(&mut self.sink, env!("CARGO_PKG_VERSION")).is_err() {
            log::warn!("banner not written");
        }

        let climate = self.climate.init();
        match &climate {
            Ok(()) => log::info!("climate sensor ready"),
            Err(e) => log::warn!("climate sensor init failed: {}", e),
        }

        let motion = self.motion.init();
        match &motion {
            Ok(()) => log::info!("motion sensor ready"),
            Err(e) => log::warn!("motion sensor init failed: {}", e),
        }

        let display = self.display.init().and_then(|()| self.display.splash());
        match &display {
            Ok(()) => log::info!("display ready"),
            Err(e) => log::warn!("display init failed: {}", e),
        }

        BootReport {
            climate,
            motion,
            display,
        }
    }

    /// One evaluation of the state machine and its side effects.
    pub fn run_pass(&mut self, now: Tick, buttons: &ButtonFlags) -> PassReport {
        let mut report = PassReport {
            transition: self.device.advance(now, buttons),
            ..PassReport::default()
        };
        if let Some(t) = report.transition {
            log::info!("{:?} -> {:?} ({:?})", t.from, t.to, t.cause);
        }

        match self.device.state() {
            Screen::Splash => {}
            Screen::Climate => {
                report.climate_ok = Some(match self.climate.get_data() {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("climate read failed: {}", e);
                        false
                    }
                });
            }
            Screen::Telemetry => {
                report.motion_ok = Some(match self.motion.get_data() {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("motion read failed: {}", e);
                        false
                    }
                });
                if self.device.telemetry_due(now) {
                    let sent = protocol::write_telemetry_line(&mut self.sink, self.motion.sample());
                    report.telemetry_sent = sent.is_ok();
                }
            }
        }

        if self.device.display_due(now) {
            match self.render() {
                Ok(()) => report.redrawn = true,
                Err(e) => log::warn!("render failed: {}", e),
            }
        }

        report
    }

    fn render(&mut self) -> Result<(), DisplayError> {
        match self.device.state() {
            Screen::Splash => self.display.splash(),
            Screen::Climate => {
                let s = *self.climate.sample();
                self.display.climate(s.temperature, s.humidity, s.pressure)
            }
            Screen::Telemetry => {
                let s = *self.motion.sample();
                self.display.telemetry(s.x, s.y, s.z)
            }
        }
    }

    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    #[inline]
    pub fn climate(&self) -> &C {
        &self.climate
    }

    #[inline]
    pub fn motion(&self) -> &M {
        &self.motion
    }

    #[inline]
    pub fn display(&self) -> &D {
        &self.display
    }

    #[inline]
    pub fn sink(&self) -> &W {
        &self.sink
    }
}
