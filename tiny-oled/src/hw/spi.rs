// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Adapters from the STM32F7 HAL to the `embedded-hal` 1.0 traits the core is written against.
//!
//! - `HalSpi` wraps an enabled HAL SPI instance (8-bit words) as a blocking `SpiBus`.
//! - `BoardPin` wraps a push-pull GPIO output as an infallible `OutputPin`.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::{digital, spi as eh_spi};
use stm32f7xx_hal::{
    gpio::{self, Output, PushPull},
    prelude::*,
    spi::{self, Enabled, Spi},
};

/// Filler clocked out while reading.
const FILLER: u8 = 0x00;

/// HAL SPI error carried through the `embedded-hal` error interface.
pub struct SpiFault(pub spi::Error);

impl fmt::Debug for SpiFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SpiFault")
    }
}

impl eh_spi::Error for SpiFault {
    fn kind(&self) -> eh_spi::ErrorKind {
        eh_spi::ErrorKind::Other
    }
}

/// Wrapper around an enabled HAL SPI instance (8-bit words).
pub struct HalSpi<I, P> {
    spi: Spi<I, P, Enabled<u8>>,
}

impl<I, P> HalSpi<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    pub fn new(spi: Spi<I, P, Enabled<u8>>) -> Self {
        Self { spi }
    }

    /// Perform a blocking, full-duplex transfer of one byte.
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiFault> {
        let mut tmp = [byte];
        self.spi.transfer(&mut tmp).map_err(SpiFault)?;
        Ok(tmp[0])
    }

    pub fn free(self) -> Spi<I, P, Enabled<u8>> {
        self.spi
    }
}

impl<I, P> eh_spi::ErrorType for HalSpi<I, P> {
    type Error = SpiFault;
}

impl<I, P> eh_spi::SpiBus<u8> for HalSpi<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for w in words.iter_mut() {
            *w = self.transfer_byte(FILLER)?;
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for &w in words {
            self.transfer_byte(w)?;
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        for i in 0..read.len().max(write.len()) {
            let miso = self.transfer_byte(write.get(i).copied().unwrap_or(FILLER))?;
            if let Some(r) = read.get_mut(i) {
                *r = miso;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for w in words.iter_mut() {
            *w = self.transfer_byte(*w)?;
        }
        Ok(())
    }

    /// Every byte already waited for its echo, so nothing is in flight.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Push-pull output pin as an `embedded-hal` 1.0 `OutputPin`.
pub struct BoardPin<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> BoardPin<P, N> {
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        Self {
            pin: pin.into_push_pull_output(),
        }
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> digital::ErrorType for BoardPin<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> digital::OutputPin for BoardPin<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }
}
