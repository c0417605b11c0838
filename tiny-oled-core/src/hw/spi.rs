// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer.
//!
//! - `SpiTransport` wraps any `embedded-hal` SPI bus with 8-bit words.
//! - `ChipSelect` is an active-low GPIO output wrapper for manual CS control.
//!
//! Neither type touches the other: asserting CS around a transfer is the caller's job (see
//! [`crate::hw::bus`] for the arbitration layer that does it).

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::error::BusError;

/// Byte sent while clocking data in.
pub const FILLER_BYTE: u8 = 0x00;

/// Wrapper around an SPI bus (8-bit words) with blocking byte-buffer transfers.
pub struct SpiTransport<SPI> {
    spi: SPI,
}

impl<SPI> SpiTransport<SPI>
where
    SPI: SpiBus<u8>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Perform a blocking, full-duplex transfer of one byte.
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, BusError> {
        let mut tmp = [byte];
        self.spi.transfer_in_place(&mut tmp).map_err(spi_error)?;
        Ok(tmp[0])
    }

    /// Transmit every byte of `buf`, blocking until the last one has left the shifter.
    pub fn write(&mut self, buf: &[u8]) -> Result<(), BusError> {
        if buf.is_empty() {
            return Err(BusError::InvalidArgument);
        }
        self.spi.write(buf).map_err(spi_error)?;
        self.spi.flush().map_err(spi_error)
    }

    /// Fill `buf` from the bus, clocking out [`FILLER_BYTE`].
    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        if buf.is_empty() {
            return Err(BusError::InvalidArgument);
        }
        buf.fill(FILLER_BYTE);
        self.spi.transfer_in_place(buf).map_err(spi_error)
    }

    pub fn free(self) -> SPI {
        self.spi
    }
}

fn spi_error<E: spi::Error>(e: E) -> BusError {
    BusError::Spi(e.kind())
}

/// Manual chip-select line, active-low, generic over any output pin.
pub struct ChipSelect<PIN> {
    pin: PIN,
    asserted: bool,
}

impl<PIN: OutputPin> ChipSelect<PIN> {
    /// Create an active-low chip select and drive it to the inactive state (i.e., high).
    pub fn active_low(mut pin: PIN) -> Result<Self, BusError> {
        pin.set_high().map_err(pin_error)?;
        Ok(Self {
            pin,
            asserted: false,
        })
    }

    /// Assert the chip select.
    #[inline]
    pub fn select(&mut self) -> Result<(), BusError> {
        self.pin.set_low().map_err(pin_error)?;
        self.asserted = true;
        Ok(())
    }

    /// Deassert the chip select.
    #[inline]
    pub fn deselect(&mut self) -> Result<(), BusError> {
        self.pin.set_high().map_err(pin_error)?;
        self.asserted = false;
        Ok(())
    }

    #[inline]
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

pub(crate) fn pin_error<E: digital::Error>(e: E) -> BusError {
    BusError::Pin(e.kind())
}
