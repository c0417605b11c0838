// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cycle-counting busy-wait delay.
//!
//! Usable from both thread mode and interrupt handlers, and independent of the tick and of SysTick.

use cortex_m::asm;
use embedded_hal::delay::DelayNs;

#[derive(Copy, Clone, Debug)]
pub struct AsmDelay {
    cycles_per_us: u32,
}

impl AsmDelay {
    pub const fn new(sysclk_hz: u32) -> Self {
        Self {
            cycles_per_us: sysclk_hz / 1_000_000,
        }
    }
}

impl DelayNs for AsmDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (ns as u64 * self.cycles_per_us as u64).div_ceil(1_000);
        asm::delay(cycles.min(u32::MAX as u64) as u32);
    }

    fn delay_us(&mut self, us: u32) {
        asm::delay(us.saturating_mul(self.cycles_per_us));
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}
