// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # motorctl Firmware
//!
//! Fixed-rate closed-loop motor controller, written in Rust, targeting an STM32F767 MCU.
//!
//! A periodic timer interrupt marks a control cycle as pending. The main loop picks it up, samples
//! the sensors, runs a PID controller, drives the PWM output, checks the temperature cutoff and
//! every few cycles writes a telemetry line to the serial port.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Hardware access traits (PWM, ADC, serial, timer, indicators) and bounded polling |
//! | [`control`] | PID, sampler, actuator, scheduler, safety monitor and the control cycle |
//! | [`protocol`] | Serial telemetry line format, reporter and parser |
//! | [`config`] | Tunables and their defaults |
//! | `board` | STM32F7 register-level backend (feature `board`) |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --no-default-features --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod diag;

pub mod config;
pub mod control;
pub mod error;
pub mod hw;
pub mod protocol;

#[cfg(feature = "board")]
pub mod board;

pub use config::ControlConfig;
pub use error::Error;
