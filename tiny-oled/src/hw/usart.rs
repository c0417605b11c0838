// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART telemetry sink.
//!
//! Only the transmit half is kept; the link is output-only. Lines are terminated by the caller
//! (`\r` for telemetry refreshes, `\r\n` for the banner).
//!
//! To watch the stream on the host machine, connect to the debug USB port and use
//! ```
//! $ screen /dev/tty.usbmodem* 115200
//! ```
//!
//! To close the terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    /// Blocking single-byte write.
    #[inline]
    pub fn write_byte(&mut self, b: u8) -> Result<(), fmt::Error> {
        block!(self.tx.write(b)).map_err(|_| fmt::Error)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), fmt::Error> {
        bytes.iter().try_for_each(|&b| self.write_byte(b))
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes())
    }
}
