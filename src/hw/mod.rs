// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Access
//!
//! Typed peripheral operations the control core depends on. The `board` module implements them
//! against the STM32F7 registers; tests use the fakes in `mock`.
//!
//! Operations that wait on hardware (ADC end-of-conversion, UART transmit-ready) are non-blocking
//! and return [`nb::Error::WouldBlock`] until ready. Callers wait through [`poll::bounded`] so a
//! stuck peripheral turns into a timeout instead of a hang.

use core::convert::Infallible;

pub mod poll;

#[cfg(test)]
pub(crate) mod mock;

/// PWM channel driving the motor.
pub trait PwmOutput {
    /// Compare value corresponding to 100 % duty.
    fn max_duty(&self) -> u32;

    /// Apply a compare value in `0..=max_duty()` with a single register write.
    fn set_duty(&mut self, duty: u32);
}

/// Single-channel analog input.
pub trait AnalogInput {
    /// Start a software-triggered conversion.
    fn start_conversion(&mut self);

    /// Raw result once the conversion has completed.
    fn read_conversion(&mut self) -> nb::Result<u16, Infallible>;
}

/// Serial transmitter.
pub trait SerialTx {
    /// Queue one byte, or `WouldBlock` while the transmit register is full.
    fn send_byte(&mut self, byte: u8) -> nb::Result<(), Infallible>;
}

/// Timer producing the periodic control interrupt.
pub trait PeriodicTimer {
    /// Start the timer with its update interrupt enabled.
    fn enable_timer(&mut self, hz: u32);

    /// Acknowledge the update event. Returns `true` if one was pending.
    fn clear_update(&mut self) -> bool;
}

/// Status outputs (LEDs on the board).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// Toggled periodically while the loop runs.
    Heartbeat,
    /// Lit while the safety monitor holds the actuator safe.
    Fault,
    /// Measurement above the medium speed band.
    SpeedMedium,
    /// Measurement above the high speed band.
    SpeedHigh,
}

pub trait Indicators {
    fn set(&mut self, indicator: Indicator, on: bool);
}

/// Source of the controlled quantity (e.g. motor speed from an encoder).
pub trait Feedback {
    fn measure(&mut self) -> f32;
}

impl<F> Feedback for F
where
    F: FnMut() -> f32,
{
    #[inline]
    fn measure(&mut self) -> f32 {
        self()
    }
}
