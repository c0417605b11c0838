// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TIM6 as the millisecond tick source.
//!
//! TIM6 is a basic timer on APB1. It is programmed directly through the PAC registers, as the HAL
//! offers no update-interrupt driver for it. The counter runs at 10 kHz whatever the APB1 timer
//! clock, which keeps both 16-bit registers in range up to 216 MHz.

use cortex_m::peripheral::NVIC;
use stm32f7xx_hal::pac::{self, interrupt};

use tiny_oled_core::config::{TICK_PERIOD_MS, TICK_WRAP};
use tiny_oled_core::tick::{timer_prescaler, TickCounter};

/// Counter clock after the prescaler.
const COUNTER_HZ: u32 = 10_000;

/// Counts per tick period.
const COUNTS_PER_TICK: u32 = TICK_PERIOD_MS * (COUNTER_HZ / 1_000);

/// Shared tick; written only from `TIM6_DAC`.
pub static TICK: TickCounter = TickCounter::new(TICK_PERIOD_MS, TICK_WRAP);

/// Start TIM6 with one update interrupt every `TICK_PERIOD_MS`.
///
/// `timer_clk_hz` is the APB1 timer clock (`clocks.timclk1()`). Returns false without touching the
/// timer if the tick is already running or the clock is out of range.
pub fn start(tim: pac::TIM6, timer_clk_hz: u32) -> bool {
    let Some(psc) = timer_prescaler(timer_clk_hz, COUNTER_HZ) else {
        log::error!("tick: timer clock {} Hz out of range", timer_clk_hz);
        return false;
    };
    if !TICK.begin() {
        return false;
    }

    // SAFETY: the RCC block was moved into the HAL's `Rcc`, which never touches APB1ENR.TIM6EN.
    let rcc = unsafe { &*pac::RCC::ptr() };
    rcc.apb1enr.modify(|_, w| w.tim6en().set_bit());

    tim.cr1.modify(|_, w| w.cen().clear_bit());
    tim.psc.write(|w| unsafe { w.bits(psc as u32) });
    tim.arr.write(|w| unsafe { w.bits(COUNTS_PER_TICK - 1) });

    // Load PSC/ARR now, then drop the update flag that this raises.
    tim.egr.write(|w| w.ug().set_bit());
    tim.sr.modify(|_, w| w.uif().clear_bit());

    tim.dier.modify(|_, w| w.uie().set_bit());
    tim.cr1.modify(|_, w| w.cen().set_bit());

    // SAFETY: `TIM6_DAC` only touches TIM6.SR and the atomic tick.
    unsafe { NVIC::unmask(pac::Interrupt::TIM6_DAC) };
    log::info!("tick: TIM6 every {} ms", TICK_PERIOD_MS);
    true
}

#[interrupt]
fn TIM6_DAC() {
    // SAFETY: read-modify-write of SR only; no other context writes TIM6 after `start`.
    let tim = unsafe { &*pac::TIM6::ptr() };
    tim.sr.modify(|_, w| w.uif().clear_bit());
    TICK.on_period();
}
