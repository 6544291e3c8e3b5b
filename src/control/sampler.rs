// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sensor sampling.
//!
//! Each sample runs one ADC conversion for the temperature channel and reads the controlled
//! quantity from a pluggable [`Feedback`] source. The conversion wait is bounded; on timeout the
//! previous sample stays current and the caller is told it is stale.
//!
//! The feedback source is read on every call, timeout or not, so delta-based sources (encoder
//! counts since the last read) always cover exactly one period.

use crate::config::LinearTransfer;
use crate::hw::{
    poll::{self, PollError},
    AnalogInput, Feedback,
};
use crate::Error;

/// One set of readings, in engineering units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sample {
    /// Raw ADC code.
    pub raw: u16,
    /// Controlled quantity (command units, e.g. speed 0..1000).
    pub measurement: f32,
    /// Temperature derived from `raw` (°C).
    pub temperature_c: f32,
}

pub struct Sampler<A, F> {
    adc: A,
    feedback: F,
    transfer: LinearTransfer,
    timeout_polls: u32,

    last: Sample,
    conversions: u32,
    timeouts: u32,
}

impl<A, F> Sampler<A, F>
where
    A: AnalogInput,
    F: Feedback,
{
    /// `transfer` maps raw ADC codes to °C. `timeout_polls` bounds the end-of-conversion wait.
    pub fn new(adc: A, feedback: F, transfer: LinearTransfer, timeout_polls: u32) -> Self {
        Self {
            adc,
            feedback,
            transfer,
            timeout_polls,
            last: Sample::default(),
            conversions: 0,
            timeouts: 0,
        }
    }

    /// Take a fresh sample.
    ///
    /// Returns [`Error::SensorTimeout`] if the conversion does not complete in time; [`last`]
    /// still holds the previous good sample in that case.
    ///
    /// [`last`]: Self::last
    pub fn sample(&mut self) -> Result<Sample, Error> {
        self.adc.start_conversion();
        let measurement = self.feedback.measure();

        let adc = &mut self.adc;
        let raw = match poll::bounded(self.timeout_polls, || adc.read_conversion()) {
            Ok(raw) => raw,
            Err(PollError::Timeout) => {
                self.timeouts = self.timeouts.wrapping_add(1);
                return Err(Error::SensorTimeout);
            }
            Err(PollError::Other(never)) => match never {},
        };
        self.conversions = self.conversions.wrapping_add(1);

        self.last = Sample {
            raw,
            measurement,
            temperature_c: self.transfer.apply(raw),
        };
        Ok(self.last)
    }

    /// Most recent good sample.
    #[inline]
    pub fn last(&self) -> Sample {
        self.last
    }

    /// Completed conversions.
    #[inline]
    pub fn conversions(&self) -> u32 {
        self.conversions
    }

    /// Conversions abandoned on timeout.
    #[inline]
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    #[cfg(test)]
    pub(crate) fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }

    pub fn free(self) -> (A, F) {
        (self.adc, self.feedback)
    }
}
