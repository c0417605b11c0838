// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! OLED renderer: formats sample fields into text lines and draws them on the SSD1306.
//!
//! The panel fits three lines of the 6x10 font, 11 px apart. Values are formatted with `itoa`
//! into fixed-capacity `heapless` strings.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::String;

use crate::devices::Display;
use crate::drivers::ssd1306::Ssd1306;
use crate::drivers::StreamInterface;
use crate::error::DisplayError;

pub const TITLE: &str = "tiny-OLED";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LINE_PITCH: i32 = 11;
const LINE_CAPACITY: usize = 24;

/// One rendered text line.
pub type Line = String<LINE_CAPACITY>;

// Every caller formats well under `LINE_CAPACITY` characters; overflow truncates in release.
fn push(line: &mut Line, s: &str) {
    let fits = line.push_str(s).is_ok();
    debug_assert!(fits, "display line overflow: {:?} + {:?}", line.as_str(), s);
}

fn push_fixed(line: &mut Line, negative: bool, whole: u32, hundredths: u32) {
    let mut digits = itoa::Buffer::new();
    if negative {
        push(line, "-");
    }
    push(line, digits.format(whole));
    push(line, ".");
    if hundredths < 10 {
        push(line, "0");
    }
    push(line, digits.format(hundredths));
}

/// `2508` (0.01 °C) -> `"25.08 C"`
pub fn temperature_line(centi_celsius: i32) -> Line {
    let mut line = Line::new();
    let abs = centi_celsius.unsigned_abs();
    push_fixed(&mut line, centi_celsius < 0, abs / 100, abs % 100);
    push(&mut line, " C");
    line
}

/// `56317` (1/1024 %RH) -> `"54.99 %RH"`, truncated
pub fn humidity_line(q10_percent: u32) -> Line {
    let mut line = Line::new();
    let whole = q10_percent / 1024;
    let hundredths = (q10_percent % 1024) * 100 / 1024;
    push_fixed(&mut line, false, whole, hundredths);
    push(&mut line, " %RH");
    line
}

/// `10065328` (0.01 Pa) -> `"1006.53 hPa"`, truncated
pub fn pressure_line(centi_pascal: u32) -> Line {
    let mut line = Line::new();
    push_fixed(
        &mut line,
        false,
        centi_pascal / 10_000,
        (centi_pascal % 10_000) / 100,
    );
    push(&mut line, " hPa");
    line
}

/// `("x", -12)` -> `"x: -12"`
pub fn axis_line(label: &str, value: i16) -> Line {
    let mut line = Line::new();
    let mut digits = itoa::Buffer::new();
    push(&mut line, label);
    push(&mut line, ": ");
    push(&mut line, digits.format(value));
    line
}

/// SSD1306 panel plus the transport and delay it needs.
pub struct Oled<I, DC, RES, D> {
    panel: Ssd1306<DC, RES>,
    io: I,
    delay: D,
}

impl<I, DC, RES, D> Oled<I, DC, RES, D>
where
    I: StreamInterface,
    DC: OutputPin,
    RES: OutputPin,
    D: DelayNs,
{
    pub fn new(panel: Ssd1306<DC, RES>, io: I, delay: D) -> Self {
        Self { panel, io, delay }
    }

    #[inline]
    pub fn panel(&self) -> &Ssd1306<DC, RES> {
        &self.panel
    }

    /// Clear, draw up to three lines from the top, flush.
    pub fn draw_lines(&mut self, lines: &[&str]) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        self.panel.clear(BinaryColor::Off)?;
        for (row, text) in lines.iter().enumerate() {
            Text::with_baseline(
                text,
                Point::new(0, row as i32 * LINE_PITCH),
                style,
                Baseline::Top,
            )
            .draw(&mut self.panel)?;
        }
        self.panel.flush(&mut self.io)
    }

    pub fn free(self) -> (Ssd1306<DC, RES>, I, D) {
        (self.panel, self.io, self.delay)
    }
}

impl<I, DC, RES, D> Display for Oled<I, DC, RES, D>
where
    I: StreamInterface,
    DC: OutputPin,
    RES: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.init(&mut self.io, &mut self.delay)
    }

    /// Inverted title box with the firmware version underneath.
    fn splash(&mut self) -> Result<(), DisplayError> {
        self.panel.clear(BinaryColor::Off)?;

        Rectangle::new(Point::new(30, 0), Size::new(68, 14))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.panel)?;
        Text::with_baseline(
            TITLE,
            Point::new(37, 2),
            MonoTextStyle::new(&FONT_6X10, BinaryColor::Off),
            Baseline::Top,
        )
        .draw(&mut self.panel)?;

        let mut version = Line::new();
        push(&mut version, "v");
        push(&mut version, VERSION);
        Text::with_baseline(
            version.as_str(),
            Point::new(46, 2 * LINE_PITCH),
            MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
            Baseline::Top,
        )
        .draw(&mut self.panel)?;

        self.panel.flush(&mut self.io)
    }

    fn climate(
        &mut self,
        temperature: i32,
        humidity: u32,
        pressure: u32,
    ) -> Result<(), DisplayError> {
        let t = temperature_line(temperature);
        let h = humidity_line(humidity);
        let p = pressure_line(pressure);
        self.draw_lines(&[t.as_str(), h.as_str(), p.as_str()])
    }

    fn telemetry(&mut self, x: i16, y: i16, z: i16) -> Result<(), DisplayError> {
        let x = axis_line("x", x);
        let y = axis_line("y", y);
        let z = axis_line("z", z);
        self.draw_lines(&[x.as_str(), y.as_str(), z.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ssd1306::BUFFER_SIZE;
    use crate::hw::Peripheral;
    use crate::testing::{NoopDelay, PinRole, Sim};

    #[test]
    fn formats_fixed_point_fields() {
        assert_eq!(temperature_line(2_508).as_str(), "25.08 C");
        assert_eq!(temperature_line(-5).as_str(), "-0.05 C");
        assert_eq!(temperature_line(-1_230).as_str(), "-12.30 C");
        assert_eq!(humidity_line(56_317).as_str(), "54.99 %RH");
        assert_eq!(humidity_line(102_400).as_str(), "100.00 %RH");
        assert_eq!(pressure_line(10_065_328).as_str(), "1006.53 hPa");
        assert_eq!(pressure_line(3_000_000).as_str(), "300.00 hPa");
        assert_eq!(axis_line("z", i16::MIN).as_str(), "z: -32768");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "display line overflow")]
    fn over_long_label_is_caught() {
        axis_line("a label far too long for one row", 1);
    }

    #[test]
    fn every_screen_redraws_the_whole_panel() {
        let sim = Sim::new();
        let bus = sim.bus();
        let panel = Ssd1306::new(sim.pin(PinRole::DataCommand), sim.pin(PinRole::Reset));
        let mut oled = Oled::new(panel, bus.device(Peripheral::Display, NoopDelay), NoopDelay);
        oled.init().unwrap();
        sim.state().display.clear();

        oled.splash().unwrap();
        assert!(oled.panel().pixel(97, 13));
        oled.climate(2_508, 56_317, 10_065_328).unwrap();
        assert!(!oled.panel().pixel(97, 13));
        oled.telemetry(1, -2, 3).unwrap();

        let s = sim.state();
        assert_eq!(s.display_data().len(), 3 * BUFFER_SIZE);
        assert_eq!(s.violations, 0);
    }

    #[test]
    fn same_values_render_identical_frames() {
        let sim = Sim::new();
        let bus = sim.bus();
        let panel = Ssd1306::new(sim.pin(PinRole::DataCommand), sim.pin(PinRole::Reset));
        let mut oled = Oled::new(panel, bus.device(Peripheral::Display, NoopDelay), NoopDelay);

        oled.climate(2_508, 56_317, 10_065_328).unwrap();
        let first = *oled.panel().buffer();
        oled.telemetry(0, 0, 0).unwrap();
        oled.climate(2_508, 56_317, 10_065_328).unwrap();

        assert_eq!(*oled.panel().buffer(), first);
        assert!(first.iter().any(|b| *b != 0));
    }
}
