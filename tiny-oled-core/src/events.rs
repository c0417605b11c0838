// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Button event flags shared between the EXTI handlers and the main loop.
//!
//! Each button owns one `AtomicBool`. Its interrupt handler is the only writer of `true`; the main
//! loop is the only writer of `false`. A press is therefore consumed exactly once.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use crate::config::DEBOUNCE_TIME_MS;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    One,
    Two,
    Three,
    Four,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::One, Button::Two, Button::Three, Button::Four];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Four pending-press flags. Place one in a `static`.
pub struct ButtonFlags {
    pending: [AtomicBool; 4],
}

impl ButtonFlags {
    pub const fn new() -> Self {
        Self {
            pending: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    /// Latch a press.
    #[inline]
    pub fn raise(&self, button: Button) {
        self.pending[button.index()].store(true, Ordering::Release);
    }

    /// Consume a pending press. Returns whether one was pending.
    #[inline]
    pub fn take(&self, button: Button) -> bool {
        self.pending[button.index()].swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_pending(&self, button: Button) -> bool {
        self.pending[button.index()].load(Ordering::Acquire)
    }

    /// Interrupt-side hook: latch the press, busy-wait out contact bounce, then `acknowledge`.
    ///
    /// `acknowledge` clears the interrupt's pending bit. Bounce edges inside the window only
    /// re-set that bit, so clearing it last discards them. Runs inside the handler, so other
    /// interrupts wait for the debounce window.
    pub fn on_edge<D, A>(&self, button: Button, delay: &mut D, acknowledge: A)
    where
        D: DelayNs,
        A: FnOnce(),
    {
        self.raise(button);
        delay.delay_ms(DEBOUNCE_TIME_MS);
        acknowledge();
    }
}

impl Default for ButtonFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::testing::CountingDelay;

    /// Delay that publishes its running total so an acknowledge closure can read it.
    struct SharedDelay<'a>(&'a Cell<u64>);

    impl DelayNs for SharedDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.0.set(self.0.get() + ns as u64);
        }
    }

    #[test]
    fn press_is_consumed_exactly_once() {
        let flags = ButtonFlags::new();
        flags.raise(Button::Two);

        assert!(flags.is_pending(Button::Two));
        assert!(!flags.take(Button::One));
        assert!(flags.take(Button::Two));
        assert!(!flags.take(Button::Two));
    }

    #[test]
    fn repeated_edges_collapse_into_one_press() {
        let flags = ButtonFlags::new();
        let mut delay = CountingDelay::default();
        flags.on_edge(Button::Three, &mut delay, || {});
        flags.on_edge(Button::Three, &mut delay, || {});

        assert_eq!(delay.total_us(), 2 * DEBOUNCE_TIME_MS as u64 * 1_000);
        assert!(flags.take(Button::Three));
        assert!(!flags.take(Button::Three));
    }

    #[test]
    fn flags_are_independent() {
        let flags = ButtonFlags::new();
        for b in Button::ALL {
            flags.raise(b);
        }
        assert!(flags.take(Button::Four));
        assert!(flags.is_pending(Button::One));
        assert!(flags.is_pending(Button::Two));
        assert!(flags.is_pending(Button::Three));
    }

    #[test]
    fn acknowledge_runs_after_the_debounce_window() {
        let flags = ButtonFlags::new();
        let waited_ns = Cell::new(0);
        let acked_at = Cell::new(None);

        flags.on_edge(Button::One, &mut SharedDelay(&waited_ns), || {
            acked_at.set(Some(waited_ns.get()));
        });

        assert_eq!(acked_at.get(), Some(DEBOUNCE_TIME_MS as u64 * 1_000_000));
        assert!(flags.is_pending(Button::One));
    }
}
