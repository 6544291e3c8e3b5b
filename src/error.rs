// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error type for the control loop.
//!
//! None of these abort the loop. The cycle degrades (stale sample, skipped cycle, forced-safe
//! actuator, dropped telemetry line) and keeps running.

use thiserror::Error;

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// ADC conversion did not complete within its poll budget.
    #[error("sensor conversion timed out")]
    SensorTimeout,

    /// Timer fired while the previous cycle was still running.
    #[error("control cycle missed its deadline")]
    MissedDeadline,

    /// Temperature above the safety threshold; actuator forced safe.
    #[error("over-temperature, actuator forced safe")]
    SafetyFault,

    /// Serial transmitter did not become ready within its poll budget.
    #[error("serial transmit timed out")]
    TxTimeout,

    /// Telemetry line did not fit the line buffer.
    #[error("telemetry line overflow")]
    LineOverflow,

    /// Start-up configuration rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
