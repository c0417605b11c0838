// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # tiny-oled Core
//!
//! Hardware-independent half of the tiny-oled handheld firmware: a climate sensor, a 9-axis motion
//! sensor and a 128x32 OLED sharing one SPI bus, driven by a single cooperative main loop.
//!
//! Everything here is written against `embedded-hal` 1.0 traits so it can be unit-tested on the
//! host. The `tiny-oled` crate binds it to the board.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`tick`] | Millisecond tick counter shared with the timer ISR |
//! | [`hw`] | SPI transport, chip-select arbitration, status LED |
//! | [`drivers`] | Register-level drivers (BME280, ICM-20948, SSD1306) |
//! | [`devices`] | Climate / motion / display peripherals consumed by the main loop |
//! | [`events`] | Button flags set from interrupt context |
//! | [`protocol`] | Telemetry line format for the serial link |
//! | [`control`] | Device state machine and main-loop scheduler |
//! | [`config`] | Compile-time timing and wrap configuration |
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p tiny-oled-core
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod devices;
pub mod drivers;
pub mod error;
pub mod events;
pub mod hw;
pub mod protocol;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{BusError, DisplayError, SensorError};
pub use tick::Tick;
