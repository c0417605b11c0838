// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry line format.
//!
//! ```text
//! ESC[2K accel x:<i16> y:<i16> z:<i16> CR
//! ```
//!
//! The erase-line prefix and the bare carriage return make a terminal redraw the same row on
//! every line.

use core::fmt::{self, Write};

use crate::devices::MotionSample;

/// VT100 "erase entire line".
pub const CLEAR_LINE: &str = "\x1b[2K";

pub fn write_telemetry_line<W: Write>(sink: &mut W, sample: &MotionSample) -> fmt::Result {
    let mut digits = itoa::Buffer::new();
    sink.write_str(CLEAR_LINE)?;
    sink.write_str("accel x:")?;
    sink.write_str(digits.format(sample.x))?;
    sink.write_str(" y:")?;
    sink.write_str(digits.format(sample.y))?;
    sink.write_str(" z:")?;
    sink.write_str(digits.format(sample.z))?;
    sink.write_str("\r")
}

/// Boot diagnostic, CRLF terminated.
pub fn write_banner<W: Write>(sink: &mut W, version: &str) -> fmt::Result {
    sink.write_str("tiny-oled ")?;
    sink.write_str(version)?;
    sink.write_str("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn telemetry_line_layout() {
        let mut out: String<64> = String::new();
        let sample = MotionSample {
            x: 1000,
            y: -2000,
            z: i16::MIN,
        };

        write_telemetry_line(&mut out, &sample).unwrap();

        assert_eq!(out.as_str(), "\x1b[2Kaccel x:1000 y:-2000 z:-32768\r");
    }

    #[test]
    fn banner_names_the_version() {
        let mut out: String<32> = String::new();
        write_banner(&mut out, "0.1.0").unwrap();
        assert_eq!(out.as_str(), "tiny-oled 0.1.0\r\n");
    }

    #[test]
    fn full_sink_reports_error() {
        let mut out: String<8> = String::new();
        assert!(write_telemetry_line(&mut out, &MotionSample::default()).is_err());
    }
}
