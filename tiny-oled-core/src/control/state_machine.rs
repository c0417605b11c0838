// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Screen state machine.
//!
//! Evaluated once per main-loop pass, highest priority first:
//!
//! | From    | Condition                               | To              |
//! |---------|-----------------------------------------|-----------------|
//! | any     | BTN1 pending                            | Climate         |
//! | any     | BTN2 pending                            | Telemetry       |
//! | Splash  | more than `splash` ms in Splash         | `splash_next`   |
//!
//! Every transition resets `state_ref_time`. At most one button is consumed per pass, so a BTN2
//! pressed together with BTN1 is applied on the following pass. BTN3 and BTN4 have no binding and
//! are drained every pass.
//!
//! Display refresh and telemetry emission are throttled independently of transitions, each against
//! its own reference tick.

use crate::config::Timing;
use crate::events::{Button, ButtonFlags};
use crate::tick::{elapsed, Interval, Tick};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Climate,
    Telemetry,
}

/// What triggered a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cause {
    Button(Button),
    SplashTimeout,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Screen,
    pub to: Screen,
    pub cause: Cause,
}

/// Process-wide device state, owned by the main loop.
#[derive(Clone, Debug)]
pub struct Device {
    state: Screen,
    state_ref_time: Tick,
    display: Interval,
    telemetry: Interval,
    timing: Timing,
}

impl Device {
    /// Boot state: `Splash`, every reference captured at `now`.
    pub fn new(now: Tick, timing: Timing) -> Self {
        Self {
            state: Screen::Splash,
            state_ref_time: now,
            display: Interval::new(now, timing.display_update, timing.wrap),
            telemetry: Interval::new(now, timing.telemetry, timing.wrap),
            timing,
        }
    }

    #[inline]
    pub fn state(&self) -> Screen {
        self.state
    }

    #[inline]
    pub fn state_ref_time(&self) -> Tick {
        self.state_ref_time
    }

    #[inline]
    pub fn display_ref_time(&self) -> Tick {
        self.display.reference()
    }

    #[inline]
    pub fn telemetry_ref_time(&self) -> Tick {
        self.telemetry.reference()
    }

    #[inline]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Apply the transition rules for this pass.
    pub fn advance(&mut self, now: Tick, buttons: &ButtonFlags) -> Option<Transition> {
        let next = if buttons.take(Button::One) {
            Some((Screen::Climate, Cause::Button(Button::One)))
        } else if buttons.take(Button::Two) {
            Some((Screen::Telemetry, Cause::Button(Button::Two)))
        } else if self.state == Screen::Splash
            && elapsed(now, self.state_ref_time, self.timing.wrap) > self.timing.splash
        {
            Some((self.timing.splash_next, Cause::SplashTimeout))
        } else {
            None
        };

        for unbound in [Button::Three, Button::Four] {
            if buttons.take(unbound) {
                log::debug!("{:?} has no binding, dropped", unbound);
            }
        }

        next.map(|(to, cause)| self.enter(now, to, cause))
    }

    fn enter(&mut self, now: Tick, to: Screen, cause: Cause) -> Transition {
        let from = self.state;
        self.state = to;
        self.state_ref_time = now;
        Transition { from, to, cause }
    }

    /// `true` (and re-armed) once more than `display_update` ms passed since the last redraw.
    #[inline]
    pub fn display_due(&mut self, now: Tick) -> bool {
        self.display.poll(now)
    }

    /// `true` (and re-armed) once more than `telemetry` ms passed since the last line.
    #[inline]
    pub fn telemetry_due(&mut self, now: Tick) -> bool {
        self.telemetry.poll(now)
    }
}
