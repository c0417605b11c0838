// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;
use rtt_target::rtt_init_log;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};
use stm32f7xx_hal as hal;

use tiny_oled_core::{
    config::{self, Timing},
    control::Scheduler,
    devices::{Climate, Motion, Oled},
    drivers::{
        bme280::Bme280Settings,
        icm20948::{Icm20948Settings, MotionChannel},
        ssd1306::Ssd1306,
    },
    hw::{ActiveLevel, CsBank, Peripheral, SharedBus, StatusLed},
    tick::TickSource,
};

mod hw;
use hw::{buttons::BUTTONS, tick::TICK, AsmDelay, BoardPin, BoardPins, HalSpi, Usart};

#[entry]
fn main() -> ! {
    rtt_init_log!();

    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb2 = rcc.apb2;
    let mut syscfg = dp.SYSCFG;
    let mut exti = dp.EXTI;
    let delay = AsmDelay::new(clocks.sysclk().raw());

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOC, dp.GPIOD, dp.GPIOE);

    // USART1 (telemetry)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let usart = Usart::new(serial);

    // SPI4, shared by display, climate, motion and storage
    let spi_mode = Mode {
        polarity: Polarity::IdleLow,
        phase: Phase::CaptureOnFirstTransition,
    };
    let spi4_raw = Spi::new(dp.SPI4, (pins.spi4.sck, pins.spi4.miso, pins.spi4.mosi));
    let spi4_enabled = spi4_raw.enable::<u8>(spi_mode, 1.MHz(), &clocks, &mut apb2);

    let cs = match CsBank::new(
        BoardPin::new(pins.spi4.cs_display),
        BoardPin::new(pins.spi4.cs_climate),
        BoardPin::new(pins.spi4.cs_motion),
        BoardPin::new(pins.spi4.cs_storage),
    ) {
        Ok(cs) => cs,
        Err(e) => halt("chip selects", e),
    };
    let bus = SharedBus::new(HalSpi::new(spi4_enabled), cs);

    // Peripherals on the bus
    let climate = Climate::new(
        bus.device(Peripheral::Climate, delay),
        Bme280Settings::default(),
    );
    let motion = Motion::new(
        bus.device(Peripheral::Motion, delay),
        Icm20948Settings::default(),
        MotionChannel::default(),
    );
    let panel = Ssd1306::new(BoardPin::new(pins.display.dc), BoardPin::new(pins.display.res));
    let display = Oled::new(panel, bus.device(Peripheral::Display, delay), delay);

    // Time and inputs
    if !hw::tick::start(dp.TIM6, clocks.timclk1().raw()) {
        log::warn!("tick not started");
    }
    hw::buttons::enable(
        pins.buttons,
        clocks.sysclk().raw(),
        &mut syscfg,
        &mut exti,
        &mut apb2,
    );

    let mut led = match StatusLed::new(
        BoardPin::new(pins.led),
        ActiveLevel::Low,
        TICK.now(),
        config::HEARTBEAT_TIME,
        config::TICK_WRAP,
    ) {
        Ok(led) => led,
        Err(never) => match never {},
    };

    let mut sched = Scheduler::new(TICK.now(), climate, motion, display, usart, Timing::default());
    let boot = sched.boot();
    log::info!(
        "boot: climate {} motion {} display {}",
        boot.climate.is_ok(),
        boot.motion.is_ok(),
        boot.display.is_ok()
    );

    loop {
        let now = TICK.now();
        sched.run_pass(now, &BUTTONS);
        led.poll(now).ok();
    }
}

/// Log the failed bring-up step and park the core.
fn halt(what: &str, err: impl core::fmt::Display) -> ! {
    log::error!("{} failed: {}", what, err);
    loop {
        cortex_m::asm::wfi();
    }
}
