// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Building blocks of the fixed-rate motor control loop.
//!
//! ## Modules
//!
//! - [`pid`] - PID controller with integral clamp and output saturation.
//! - [`sampler`] - ADC temperature sampling plus speed feedback.
//! - [`actuator`] - Maps commands onto a PWM compare value.
//! - [`scheduler`] - Hands timer ticks from the interrupt to the main loop.
//! - [`safety`] - Over-temperature trip with hysteresis.
//! - [`cycle`] - Runs one control cycle end to end.

pub mod actuator;
pub mod cycle;
pub mod pid;
pub mod safety;
pub mod sampler;
pub mod scheduler;

pub use actuator::Actuator;
pub use cycle::{ControlLoop, CycleReport};
pub use pid::Pid;
pub use safety::{SafetyMonitor, SafetyState};
pub use sampler::{Sample, Sampler};
pub use scheduler::{CycleState, Scheduler};
