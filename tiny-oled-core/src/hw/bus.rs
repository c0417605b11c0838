// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared SPI bus with per-peripheral chip-select arbitration.
//!
//! Display, climate sensor, motion sensor and storage all hang off one SPI bus. At most one of
//! their CS lines may be low at any instant. [`Bus`] tracks the current owner and refuses a second
//! assertion; [`SharedBus`] wraps it in a `RefCell` so a whole transaction (assert, address byte,
//! payload, deassert) runs under one exclusive borrow and cannot interleave with another.

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::drivers::{RegisterInterface, StreamInterface};
use crate::error::BusError;
use crate::hw::spi::{ChipSelect, SpiTransport};

/// Devices sharing the SPI bus, one chip-select line each.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Peripheral {
    Display,
    Climate,
    Motion,
    Storage,
}

impl Peripheral {
    pub const ALL: [Peripheral; 4] = [
        Peripheral::Display,
        Peripheral::Climate,
        Peripheral::Motion,
        Peripheral::Storage,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A set of chip-select lines addressed by [`Peripheral`].
pub trait ChipSelects {
    /// Drive `peripheral`'s line active (`true`) or inactive (`false`).
    fn set(&mut self, peripheral: Peripheral, active: bool) -> Result<(), BusError>;
}

/// The board's four active-low CS lines. Each may be a different pin type.
pub struct CsBank<D, C, M, S> {
    display: ChipSelect<D>,
    climate: ChipSelect<C>,
    motion: ChipSelect<M>,
    storage: ChipSelect<S>,
}

impl<D, C, M, S> CsBank<D, C, M, S>
where
    D: OutputPin,
    C: OutputPin,
    M: OutputPin,
    S: OutputPin,
{
    /// Take ownership of the pins and drive all four lines inactive.
    pub fn new(display: D, climate: C, motion: M, storage: S) -> Result<Self, BusError> {
        Ok(Self {
            display: ChipSelect::active_low(display)?,
            climate: ChipSelect::active_low(climate)?,
            motion: ChipSelect::active_low(motion)?,
            storage: ChipSelect::active_low(storage)?,
        })
    }

    pub fn free(self) -> (D, C, M, S) {
        (
            self.display.free(),
            self.climate.free(),
            self.motion.free(),
            self.storage.free(),
        )
    }
}

impl<D, C, M, S> ChipSelects for CsBank<D, C, M, S>
where
    D: OutputPin,
    C: OutputPin,
    M: OutputPin,
    S: OutputPin,
{
    fn set(&mut self, peripheral: Peripheral, active: bool) -> Result<(), BusError> {
        match (peripheral, active) {
            (Peripheral::Display, true) => self.display.select(),
            (Peripheral::Display, false) => self.display.deselect(),
            (Peripheral::Climate, true) => self.climate.select(),
            (Peripheral::Climate, false) => self.climate.deselect(),
            (Peripheral::Motion, true) => self.motion.select(),
            (Peripheral::Motion, false) => self.motion.deselect(),
            (Peripheral::Storage, true) => self.storage.select(),
            (Peripheral::Storage, false) => self.storage.deselect(),
        }
    }
}

/// SPI transport plus the chip-select lines and the identity of the current owner.
pub struct Bus<SPI, CS> {
    transport: SpiTransport<SPI>,
    cs: CS,
    active: Option<Peripheral>,
}

impl<SPI, CS> Bus<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: ChipSelects,
{
    /// `cs` must already have every line inactive (as [`CsBank::new`] leaves them).
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self {
            transport: SpiTransport::new(spi),
            cs,
            active: None,
        }
    }

    /// Transmit `buf` to whichever peripheral is currently selected.
    #[inline]
    pub fn write(&mut self, buf: &[u8]) -> Result<(), BusError> {
        self.transport.write(buf)
    }

    /// Receive into `buf` from whichever peripheral is currently selected.
    #[inline]
    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        self.transport.read(buf)
    }

    /// Assert (`active = true`) or release `peripheral`'s chip select.
    ///
    /// Asserting while a different peripheral holds the bus fails with
    /// [`BusError::Contention`] and leaves every line untouched. Re-asserting the current owner is a
    /// no-op.
    pub fn assert_cs(&mut self, peripheral: Peripheral, active: bool) -> Result<(), BusError> {
        if active {
            match self.active {
                Some(held) if held != peripheral => Err(BusError::Contention {
                    held,
                    requested: peripheral,
                }),
                Some(_) => Ok(()),
                None => {
                    self.cs.set(peripheral, true)?;
                    self.active = Some(peripheral);
                    Ok(())
                }
            }
        } else {
            self.cs.set(peripheral, false)?;
            if self.active == Some(peripheral) {
                self.active = None;
            }
            Ok(())
        }
    }

    #[inline]
    pub fn active(&self) -> Option<Peripheral> {
        self.active
    }

    pub fn free(self) -> (SPI, CS) {
        (self.transport.free(), self.cs)
    }
}

/// Single-owner handle to the bus, shared by reference between device handles.
pub struct SharedBus<SPI, CS> {
    bus: RefCell<Bus<SPI, CS>>,
}

impl<SPI, CS> SharedBus<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: ChipSelects,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self {
            bus: RefCell::new(Bus::new(spi, cs)),
        }
    }

    /// Run `f` with `peripheral` selected, releasing the line afterwards even when `f` fails.
    pub fn transaction<R, F>(&self, peripheral: Peripheral, f: F) -> Result<R, BusError>
    where
        F: FnOnce(&mut Bus<SPI, CS>) -> Result<R, BusError>,
    {
        let mut bus = self.bus.try_borrow_mut().map_err(|_| BusError::Busy)?;
        bus.assert_cs(peripheral, true)?;
        let result = f(&mut *bus);
        let released = bus.assert_cs(peripheral, false);
        let value = result?;
        released?;
        Ok(value)
    }

    /// Handle for one peripheral, carrying its own delay provider.
    pub fn device<D: DelayNs>(&self, peripheral: Peripheral, delay: D) -> BusDevice<'_, SPI, CS, D> {
        BusDevice {
            bus: self,
            peripheral,
            delay,
        }
    }

    /// Current owner, or `None` when idle (or when queried mid-transaction).
    pub fn active(&self) -> Option<Peripheral> {
        self.bus.try_borrow().ok().and_then(|bus| bus.active())
    }

    pub fn into_inner(self) -> Bus<SPI, CS> {
        self.bus.into_inner()
    }
}

/// One peripheral's view of the shared bus: register reads/writes framed by its CS line.
pub struct BusDevice<'a, SPI, CS, D> {
    bus: &'a SharedBus<SPI, CS>,
    peripheral: Peripheral,
    delay: D,
}

impl<'a, SPI, CS, D> BusDevice<'a, SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: ChipSelects,
    D: DelayNs,
{
    #[inline]
    pub fn peripheral(&self) -> Peripheral {
        self.peripheral
    }

    /// Open a transaction on this device's chip select.
    #[inline]
    pub fn transaction<R, F>(&mut self, f: F) -> Result<R, BusError>
    where
        F: FnOnce(&mut Bus<SPI, CS>) -> Result<R, BusError>,
    {
        self.bus.transaction(self.peripheral, f)
    }

    #[inline]
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

impl<'a, SPI, CS, D> RegisterInterface for BusDevice<'a, SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: ChipSelects,
    D: DelayNs,
{
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if buf.is_empty() {
            return Err(BusError::InvalidArgument);
        }
        self.transaction(|bus| {
            bus.write(&[reg])?;
            bus.read(buf)
        })
    }

    fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), BusError> {
        if data.is_empty() {
            return Err(BusError::InvalidArgument);
        }
        self.transaction(|bus| {
            bus.write(&[reg])?;
            bus.write(data)
        })
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

impl<'a, SPI, CS, D> StreamInterface for BusDevice<'a, SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: ChipSelects,
    D: DelayNs,
{
    fn send(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        if bytes.is_empty() {
            return Err(BusError::InvalidArgument);
        }
        self.transaction(|bus| bus.write(bytes))
    }
}

#[cfg(test)]
mod tests;
