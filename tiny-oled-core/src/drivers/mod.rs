// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Register-level protocols that sit above the `hw` layer and below the peripherals in `devices`.
//!
//! ## Existing drivers
//!
//! - [`bme280`] – Bosch BME280 temperature / pressure / humidity sensor (SPI, forced mode)
//! - [`icm20948`] – TDK ICM-20948 9-axis motion sensor (SPI)
//! - [`ssd1306`] – Solomon SSD1306 128x32 OLED controller (4-wire SPI)
//!
//! The drivers never touch the bus directly. The sensors talk through a [`RegisterInterface`], the
//! read / write / delay capability a transport provides for one chip select; the display only
//! needs a [`StreamInterface`] because its command/data distinction lives on a separate DC line.

use crate::error::BusError;

pub mod bme280;
pub mod icm20948;
pub mod ssd1306;

pub use bme280::Bme280;
pub use icm20948::Icm20948;
pub use ssd1306::Ssd1306;

/// Register access for one device: address byte followed by a payload, framed by its CS line.
///
/// `reg` is sent on the wire as given; any read/write flag in the address byte is the driver's
/// responsibility.
pub trait RegisterInterface {
    /// Send `reg`, then clock `buf.len()` bytes in.
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError>;

    /// Send `reg`, then `data`.
    fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), BusError>;

    /// Busy-wait for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);
}

impl<T: RegisterInterface + ?Sized> RegisterInterface for &mut T {
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        (**self).read(reg, buf)
    }

    fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), BusError> {
        (**self).write(reg, data)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// Unaddressed byte stream framed by one CS assertion.
pub trait StreamInterface {
    fn send(&mut self, bytes: &[u8]) -> Result<(), BusError>;
}

impl<T: StreamInterface + ?Sized> StreamInterface for &mut T {
    fn send(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        (**self).send(bytes)
    }
}
