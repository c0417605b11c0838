// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Board Support
//!
//! STM32F777-specific glue between the HAL and `tiny-oled-core`.
//!
//! - [`pins`] - named pin map.
//! - [`spi`] - `embedded-hal` 1.0 adapters for the HAL's SPI and GPIO outputs.
//! - [`usart`] - USART1 telemetry sink.
//! - [`tick`] - TIM6 update interrupt driving the shared tick.
//! - [`buttons`] - EXTI0..EXTI3 handlers latching button presses.
//! - [`delay`] - busy-wait delay for drivers and interrupt handlers.

pub mod buttons;
pub mod delay;
pub mod pins;
pub mod spi;
pub mod tick;
pub mod usart;

pub use delay::AsmDelay;
pub use pins::BoardPins;
pub use spi::{BoardPin, HalSpi};
pub use usart::Usart;
