// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Solomon SSD1306 OLED controller, 128x32 panel, 4-wire SPI.
//!
//! The driver keeps a full framebuffer in RAM and pushes it in one burst on [`Ssd1306::flush`].
//! Pixels are stored page-major like the controller's GDDRAM: byte `x + (y / 8) * 128`, bit
//! `y % 8`. Drawing goes through `embedded-graphics`.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};

use crate::drivers::StreamInterface;
use crate::error::DisplayError;

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 32;
pub const PAGES: usize = (HEIGHT / 8) as usize;
pub const BUFFER_SIZE: usize = WIDTH as usize * PAGES;

// Fundamental / addressing / hardware-configuration commands
pub mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_RAM: u8 = 0xA4;
    pub const NORMAL: u8 = 0xA6;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const START_LINE: u8 = 0x40;
    pub const SEG_REMAP: u8 = 0xA1;
    pub const MULTIPLEX: u8 = 0xA8;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const DISPLAY_OFFSET: u8 = 0xD3;
    pub const COM_PINS: u8 = 0xDA;
    pub const CLOCK_DIV: u8 = 0xD5;
    pub const PRECHARGE: u8 = 0xD9;
    pub const VCOM_DETECT: u8 = 0xDB;
    pub const CHARGE_PUMP: u8 = 0x8D;
}

/// Power-up configuration for a 128x32 panel with the internal charge pump.
#[rustfmt::skip]
const INIT_SEQUENCE: [u8; 26] = [
    cmd::DISPLAY_OFF,
    cmd::CLOCK_DIV, 0x80,
    cmd::MULTIPLEX, (HEIGHT - 1) as u8,
    cmd::DISPLAY_OFFSET, 0x00,
    cmd::START_LINE,
    cmd::CHARGE_PUMP, 0x14,
    cmd::MEMORY_MODE, 0x00, // horizontal addressing
    cmd::SEG_REMAP,
    cmd::COM_SCAN_DEC,
    cmd::COM_PINS, 0x02,
    cmd::SET_CONTRAST, 0x8F,
    cmd::PRECHARGE, 0xF1,
    cmd::VCOM_DETECT, 0x40,
    cmd::DISPLAY_RAM,
    cmd::NORMAL,
    cmd::DEACTIVATE_SCROLL,
    cmd::DISPLAY_ON,
];

/// Column and page window covering the whole panel.
#[rustfmt::skip]
const FULL_WINDOW: [u8; 6] = [
    cmd::COLUMN_ADDR, 0x00, (WIDTH - 1) as u8,
    cmd::PAGE_ADDR, 0x00, (PAGES - 1) as u8,
];

const RESET_PRE_MS: u32 = 1;
const RESET_PULSE_MS: u32 = 10;
const RESET_POST_MS: u32 = 10;

/// SSD1306 with its DC (data/command) and RES lines and an in-memory framebuffer.
pub struct Ssd1306<DC, RES> {
    dc: DC,
    res: RES,
    buffer: [u8; BUFFER_SIZE],
}

impl<DC, RES> Ssd1306<DC, RES>
where
    DC: OutputPin,
    RES: OutputPin,
{
    pub fn new(dc: DC, res: RES) -> Self {
        Self {
            dc,
            res,
            buffer: [0; BUFFER_SIZE],
        }
    }

    /// Pulse RES low.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.res.set_high().map_err(|e| DisplayError::Pin(e.kind()))?;
        delay.delay_ms(RESET_PRE_MS);
        self.res.set_low().map_err(|e| DisplayError::Pin(e.kind()))?;
        delay.delay_ms(RESET_PULSE_MS);
        self.res.set_high().map_err(|e| DisplayError::Pin(e.kind()))?;
        delay.delay_ms(RESET_POST_MS);
        Ok(())
    }

    /// Reset, configure and blank the panel.
    pub fn init<I, D>(&mut self, io: &mut I, delay: &mut D) -> Result<(), DisplayError>
    where
        I: StreamInterface,
        D: DelayNs,
    {
        self.reset(delay)?;
        self.command(io, &INIT_SEQUENCE)?;
        self.clear_buffer();
        self.flush(io)
    }

    /// Send controller commands (DC low).
    pub fn command<I: StreamInterface>(
        &mut self,
        io: &mut I,
        cmds: &[u8],
    ) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|e| DisplayError::Pin(e.kind()))?;
        io.send(cmds)?;
        Ok(())
    }

    /// Push the whole framebuffer to GDDRAM.
    pub fn flush<I: StreamInterface>(&mut self, io: &mut I) -> Result<(), DisplayError> {
        self.command(io, &FULL_WINDOW)?;
        self.dc.set_high().map_err(|e| DisplayError::Pin(e.kind()))?;
        io.send(&self.buffer)?;
        Ok(())
    }

    #[inline]
    pub fn clear_buffer(&mut self) {
        self.buffer.fill(0);
    }

    /// Set or clear one pixel. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let idx = x as usize + (y as usize / 8) * WIDTH as usize;
        let mask = 1u8 << (y % 8);
        if on {
            self.buffer[idx] |= mask;
        } else {
            self.buffer[idx] &= !mask;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.buffer[x as usize + (y as usize / 8) * WIDTH as usize] & (1 << (y % 8)) != 0
    }

    #[inline]
    pub fn buffer(&self) -> &[u8; BUFFER_SIZE] {
        &self.buffer
    }

    pub fn free(self) -> (DC, RES) {
        (self.dc, self.res)
    }
}

impl<DC, RES> OriginDimensions for Ssd1306<DC, RES> {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl<DC, RES> DrawTarget for Ssd1306<DC, RES>
where
    DC: OutputPin,
    RES: OutputPin,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buffer.fill(if color.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}
