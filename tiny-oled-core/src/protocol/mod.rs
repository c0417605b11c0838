// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Text emitted on the serial Output Sink. Any `core::fmt::Write` can be the sink.

pub mod telemetry;

pub use telemetry::{write_banner, write_telemetry_line, CLEAR_LINE};
