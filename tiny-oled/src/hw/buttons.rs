// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Push-button interrupts on EXTI lines 0-3.
//!
//! Each handler latches the press into [`BUTTONS`], busy-waits out the contact bounce and only
//! then clears its pending bit, so edges inside the window never re-enter the handler.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::NVIC;
use stm32f7xx_hal::{
    gpio::{Edge, ExtiPin},
    pac::{self, interrupt},
    rcc::APB2,
};

use tiny_oled_core::events::{Button, ButtonFlags};

use crate::hw::delay::AsmDelay;
use crate::hw::pins::ButtonPins;

/// Pending presses; raised here, consumed by the main loop.
pub static BUTTONS: ButtonFlags = ButtonFlags::new();

/// Core clock used to time the debounce wait; set once by [`enable`].
static DEBOUNCE_CLK_HZ: AtomicU32 = AtomicU32::new(0);

/// Route PC0..PC3 to EXTI0..EXTI3 on the falling edge and unmask their interrupts.
pub fn enable(
    pins: ButtonPins,
    sysclk_hz: u32,
    syscfg: &mut pac::SYSCFG,
    exti: &mut pac::EXTI,
    apb2: &mut APB2,
) {
    DEBOUNCE_CLK_HZ.store(sysclk_hz, Ordering::Relaxed);

    let ButtonPins {
        mut btn1,
        mut btn2,
        mut btn3,
        mut btn4,
    } = pins;

    btn1.make_interrupt_source(syscfg, apb2);
    btn1.trigger_on_edge(exti, Edge::Falling);
    btn1.enable_interrupt(exti);

    btn2.make_interrupt_source(syscfg, apb2);
    btn2.trigger_on_edge(exti, Edge::Falling);
    btn2.enable_interrupt(exti);

    btn3.make_interrupt_source(syscfg, apb2);
    btn3.trigger_on_edge(exti, Edge::Falling);
    btn3.enable_interrupt(exti);

    btn4.make_interrupt_source(syscfg, apb2);
    btn4.trigger_on_edge(exti, Edge::Falling);
    btn4.enable_interrupt(exti);

    // SAFETY: the handlers below only touch EXTI.PR and the atomic flags.
    unsafe {
        NVIC::unmask(pac::Interrupt::EXTI0);
        NVIC::unmask(pac::Interrupt::EXTI1);
        NVIC::unmask(pac::Interrupt::EXTI2);
        NVIC::unmask(pac::Interrupt::EXTI3);
    }
}

fn on_line(line: u8, button: Button) {
    let mut delay = AsmDelay::new(DEBOUNCE_CLK_HZ.load(Ordering::Relaxed));
    BUTTONS.on_edge(button, &mut delay, || {
        // SAFETY: PR is write-1-to-clear, so writing one bit cannot disturb another line.
        let exti = unsafe { &*pac::EXTI::ptr() };
        exti.pr.write(|w| unsafe { w.bits(1 << line) });
    });
}

#[interrupt]
fn EXTI0() {
    on_line(0, Button::One);
}

#[interrupt]
fn EXTI1() {
    on_line(1, Button::Two);
}

#[interrupt]
fn EXTI2() {
    on_line(2, Button::Three);
}

#[interrupt]
fn EXTI3() {
    on_line(3, Button::Four);
}
