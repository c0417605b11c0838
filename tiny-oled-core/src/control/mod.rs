// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device Control
//!
//! The screen state machine and the main-loop pass that drives the peripherals from it.
//!
//! ## Modules
//!
//! - [`state_machine`] - screen state, transition rules and the refresh / telemetry throttles.
//! - [`scheduler`] - one main-loop pass: advance, sample, emit, redraw.

pub mod scheduler;
pub mod state_machine;

pub use scheduler::{BootReport, PassReport, Scheduler};
pub use state_machine::{Cause, Device, Screen, Transition};
