// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Free-running millisecond tick shared between the timer ISR and the main loop.
//!
//! The counter is 32 bits wide, so on targets with a narrower native word a plain load could tear
//! against the ISR's increment. Reads and increments both run inside a critical section.
//!
//! Durations are obtained by subtracting a captured reference from the current value. The result
//! is only meaningful while the real elapsed time stays below half of the counter's range.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

/// Milliseconds since boot (modulo the counter width).
pub type Tick = u32;

/// Largest difference still interpreted as "time has passed" under [`WrapPolicy::Modular`].
pub const HALF_RANGE: Tick = Tick::MAX / 2;

/// How the counter and `elapsed_since` behave around the top of the range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WrapPolicy {
    /// True modular arithmetic. A reference more than half the range "ahead" of now is treated as
    /// not yet reached and yields 0.
    Modular,
    /// The counter snaps to zero when it comes within one period of `Tick::MAX`, and any reference
    /// numerically greater than now yields 0.
    SnapToZero,
}

/// Wrap-aware `now - reference` under the given policy.
#[inline]
pub fn elapsed(now: Tick, reference: Tick, policy: WrapPolicy) -> Tick {
    match policy {
        WrapPolicy::Modular => {
            let diff = now.wrapping_sub(reference);
            if diff > HALF_RANGE {
                0
            } else {
                diff
            }
        }
        WrapPolicy::SnapToZero => {
            if reference > now {
                0
            } else {
                now - reference
            }
        }
    }
}

/// Read-only view of a tick source.
pub trait TickSource {
    fn now(&self) -> Tick;

    fn elapsed_since(&self, reference: Tick) -> Tick;
}

/// The counter itself. Place one in a `static` and drive it from the timer ISR.
pub struct TickCounter {
    value: Mutex<Cell<Tick>>,
    started: AtomicBool,
    period: Tick,
    policy: WrapPolicy,
}

impl TickCounter {
    pub const fn new(period: Tick, policy: WrapPolicy) -> Self {
        Self {
            value: Mutex::new(Cell::new(0)),
            started: AtomicBool::new(false),
            period,
            policy,
        }
    }

    /// Claim the one-time hardware bring-up. Returns `true` only for the first caller.
    pub fn begin(&self) -> bool {
        critical_section::with(|_| {
            if self.started.load(Ordering::Relaxed) {
                false
            } else {
                self.started.store(true, Ordering::Relaxed);
                true
            }
        })
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    /// Advance by one period. Call from the timer overflow ISR only.
    pub fn on_period(&self) {
        critical_section::with(|cs| {
            let cell = self.value.borrow(cs);
            cell.set(next_tick(cell.get(), self.period, self.policy));
        });
    }

    /// Force the counter to a value. Used by bring-up code and tests.
    pub fn set(&self, value: Tick) {
        critical_section::with(|cs| self.value.borrow(cs).set(value));
    }
}

impl TickSource for TickCounter {
    fn now(&self) -> Tick {
        critical_section::with(|cs| self.value.borrow(cs).get())
    }

    fn elapsed_since(&self, reference: Tick) -> Tick {
        elapsed(self.now(), reference, self.policy)
    }
}

#[inline]
fn next_tick(current: Tick, period: Tick, policy: WrapPolicy) -> Tick {
    match policy {
        WrapPolicy::Modular => current.wrapping_add(period),
        WrapPolicy::SnapToZero => {
            let base = if current >= Tick::MAX - period { 0 } else { current };
            base + period
        }
    }
}

/// Repeating deadline measured against a tick source.
#[derive(Copy, Clone, Debug)]
pub struct Interval {
    reference: Tick,
    period: Tick,
    policy: WrapPolicy,
}

impl Interval {
    pub fn new(now: Tick, period: Tick, policy: WrapPolicy) -> Self {
        Self {
            reference: now,
            period,
            policy,
        }
    }

    /// Returns `true` and re-arms once more than `period` has elapsed since the last firing.
    pub fn poll(&mut self, now: Tick) -> bool {
        if elapsed(now, self.reference, self.policy) > self.period {
            self.reference = now;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn reference(&self) -> Tick {
        self.reference
    }
}

/// Prescaler register value (divisor minus one) that brings a 16-bit hardware timer from
/// `timer_clk_hz` down to `counter_hz`, or `None` when no 16-bit divisor fits.
pub fn timer_prescaler(timer_clk_hz: u32, counter_hz: u32) -> Option<u16> {
    if counter_hz == 0 {
        return None;
    }
    let div = timer_clk_hz / counter_hz;
    if div == 0 {
        return None;
    }
    u16::try_from(div - 1).ok()
}
