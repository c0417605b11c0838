// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Abstraction Layer
//!
//! Board-independent wrappers over `embedded-hal` SPI and GPIO traits.
//!
//! - [`spi`] - byte-buffer SPI transport and active-low chip select.
//! - [`bus`] - shared bus with chip-select arbitration between peripherals.
//! - [`led`] - status LED with a heartbeat blink.

pub mod bus;
pub mod led;
pub mod spi;

pub use bus::{Bus, BusDevice, ChipSelects, CsBank, Peripheral, SharedBus};
pub use led::{ActiveLevel, StatusLed};
pub use spi::{ChipSelect, SpiTransport};
