// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types shared across the bus, drivers and devices.

use embedded_hal::{digital, spi};
use thiserror_no_std::Error;

use crate::hw::Peripheral;

/// Failures of the shared SPI transport.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum BusError {
    /// Empty buffer handed to a read or write.
    #[error("invalid argument: empty transfer buffer")]
    InvalidArgument,
    /// A chip select was requested while another peripheral still owns the bus.
    #[error("{requested:?} chip select requested while {held:?} is asserted")]
    Contention {
        held: Peripheral,
        requested: Peripheral,
    },
    /// The bus is already borrowed by an enclosing transaction.
    #[error("bus already in use")]
    Busy,
    #[error("spi transfer failed: {0:?}")]
    Spi(spi::ErrorKind),
    #[error("chip-select pin failed: {0:?}")]
    Pin(digital::ErrorKind),
}

/// Failures of the climate and motion sensors.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum SensorError {
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
    /// Identification register did not hold the expected value.
    #[error("unexpected chip id {found:#04x} (expected {expected:#04x})")]
    ChipId { expected: u8, found: u8 },
    /// `get_data` was called before a successful `init`.
    #[error("sensor not initialized")]
    NotInitialized,
}

/// Failures of the display path.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
    /// DC or RES line could not be driven.
    #[error("display control pin failed: {0:?}")]
    Pin(digital::ErrorKind),
}

impl From<core::convert::Infallible> for DisplayError {
    fn from(never: core::convert::Infallible) -> Self {
        match never {}
    }
}
