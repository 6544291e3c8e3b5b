// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Serial Telemetry
//!
//! - [`messages`] - Telemetry line and alert formats.
//! - [`reporter`] - Sends reports and alerts over a [`SerialTx`](crate::hw::SerialTx).
//! - [`parser`] - Parses the telemetry stream back into snapshots (host side).

pub mod messages;
pub mod parser;
pub mod reporter;

pub use messages::{Alert, Snapshot};
pub use parser::Parser;
pub use reporter::Reporter;
