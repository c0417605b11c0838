// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration for scheduling and timekeeping.
//!
//! All durations are in milliseconds, the unit of [`Tick`].

use crate::control::Screen;
use crate::tick::{Tick, WrapPolicy};

// ---------------------------------------------------------------------------
// Timekeeping
// ---------------------------------------------------------------------------

/// Increment applied by the timer ISR on every overflow.
pub const TICK_PERIOD_MS: Tick = 2;

/// Overflow behaviour of the tick counter and of `elapsed_since`.
pub const TICK_WRAP: WrapPolicy = WrapPolicy::Modular;

// ---------------------------------------------------------------------------
// Screen scheduling
// ---------------------------------------------------------------------------

/// How long the splash screen stays up after boot.
pub const SPLASH_DISP_TIME: Tick = 1500;

/// Minimum spacing between two display redraws.
pub const DISP_UPDATE_RATE: Tick = 30;

/// Minimum spacing between two telemetry lines on the serial link.
pub const TELEM_DATA_TIME: Tick = 30;

/// Screen entered once the splash time runs out.
#[cfg(not(feature = "splash-to-telemetry"))]
pub const SPLASH_NEXT: Screen = Screen::Climate;
#[cfg(feature = "splash-to-telemetry")]
pub const SPLASH_NEXT: Screen = Screen::Telemetry;

// ---------------------------------------------------------------------------
// Inputs / indicators
// ---------------------------------------------------------------------------

/// Busy-wait executed inside a button ISR after latching its flag.
pub const DEBOUNCE_TIME_MS: u32 = 20;

/// Status LED toggle interval.
pub const HEARTBEAT_TIME: Tick = 500;

/// Scheduling parameters consumed by the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    pub splash: Tick,
    pub display_update: Tick,
    pub telemetry: Tick,
    pub splash_next: Screen,
    pub wrap: WrapPolicy,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            splash: SPLASH_DISP_TIME,
            display_update: DISP_UPDATE_RATE,
            telemetry: TELEM_DATA_TIME,
            splash_next: SPLASH_NEXT,
            wrap: TICK_WRAP,
        }
    }
}
