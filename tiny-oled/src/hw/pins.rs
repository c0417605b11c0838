// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the tiny-oled board (STM32F777).

use stm32f7xx_hal::{
    gpio::{gpioa, gpioc, gpiod, gpioe, Alternate, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOC, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub led: gpiod::PD9<Output<PushPull>>,
    pub usart1: Usart1Pins,
    pub spi4: Spi4Pins,
    pub display: DisplayPins,
    pub buttons: ButtonPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// SPI4 SCK/MISO/MOSI and one CS per peripheral
pub struct Spi4Pins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
    pub cs_display: gpioe::PE4<Output<PushPull>>,
    pub cs_climate: gpioe::PE11<Output<PushPull>>,
    pub cs_motion: gpioe::PE9<Output<PushPull>>,
    pub cs_storage: gpioe::PE10<Output<PushPull>>,
}

/// SSD1306 control lines
pub struct DisplayPins {
    pub dc: gpioe::PE15<Output<PushPull>>,
    pub res: gpioe::PE7<Output<PushPull>>,
}

/// Push buttons, active-low with internal pull-ups (EXTI0..EXTI3)
pub struct ButtonPins {
    pub btn1: gpioc::PC0<Input<PullUp>>,
    pub btn2: gpioc::PC1<Input<PullUp>>,
    pub btn3: gpioc::PC2<Input<PullUp>>,
    pub btn4: gpioc::PC3<Input<PullUp>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpioc: pac::GPIOC, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            led: gpiod.pd9.into_push_pull_output(),

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            spi4: Spi4Pins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
                cs_display: gpioe.pe4.into_push_pull_output(),
                cs_climate: gpioe.pe11.into_push_pull_output(),
                cs_motion: gpioe.pe9.into_push_pull_output(),
                cs_storage: gpioe.pe10.into_push_pull_output(),
            },

            display: DisplayPins {
                dc: gpioe.pe15.into_push_pull_output(),
                res: gpioe.pe7.into_push_pull_output(),
            },

            buttons: ButtonPins {
                btn1: gpioc.pc0.into_pull_up_input(),
                btn2: gpioc.pc1.into_pull_up_input(),
                btn3: gpioc.pc2.into_pull_up_input(),
                btn4: gpioc.pc3.into_pull_up_input(),
            },
        }
    }
}
