// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Control-loop tunables.
//!
//! Everything here is plain data set once at start-up. [`ControlConfig::DEFAULT`] is the stock
//! tuning: 1 kHz control, 20 kHz PWM, a telemetry line every 100 cycles
//! and an 80 °C cutoff.

use crate::Error;

/// Length of a telemetry line in normal operation (7-digit cycle count, 3-digit speeds and
/// command, 4-digit ADC code, small counters), CRLF included.
const TELEMETRY_LINE_LEN: usize = 72;

/// PID gains and limits.
///
/// The gains are tuned for the control period in [`ControlConfig::control_hz`]; the controller
/// itself does not take a timestep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Symmetric clamp on the integral accumulator.
    pub integral_limit: f32,
    pub output_min: f32,
    pub output_max: f32,
}

/// Over-temperature cutoff with hysteresis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SafetyConfig {
    /// Trip when the temperature rises above this (°C).
    pub trip_c: f32,
    /// Re-arm once the temperature falls below this (°C).
    pub rearm_c: f32,
}

/// Measurement thresholds for the speed indicators.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedBands {
    pub medium: f32,
    pub high: f32,
}

/// `y = raw * scale + offset`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearTransfer {
    pub scale: f32,
    pub offset: f32,
}

impl LinearTransfer {
    pub const fn new(scale: f32, offset: f32) -> Self {
        Self { scale, offset }
    }

    /// ADC counts to °C for a linear analog temperature sensor.
    ///
    /// `vref` — ADC reference voltage
    /// `full_scale` — highest ADC code (4095 for 12-bit)
    /// `c_per_volt` — sensor slope (100 for an LM35, i.e. 10 mV/°C)
    pub fn temperature_sensor(vref: f32, full_scale: f32, c_per_volt: f32) -> Self {
        Self::new(vref / full_scale * c_per_volt, 0.0)
    }

    #[inline]
    pub fn apply(&self, raw: u16) -> f32 {
        (raw as f32) * self.scale + self.offset
    }
}

/// Full controller configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlConfig {
    pub pid: PidConfig,
    pub safety: SafetyConfig,
    pub speed_bands: SpeedBands,
    /// ADC counts to °C.
    pub temperature: LinearTransfer,

    /// Control-loop rate (timer interrupt frequency).
    pub control_hz: u32,
    /// PWM carrier frequency.
    pub pwm_hz: u32,

    /// Highest actuator command; commands are in `0..=command_max` (1000 = 100.0 %).
    pub command_max: u16,
    /// Setpoint loaded at start-up.
    pub initial_setpoint: f32,

    /// Emit a telemetry line every this many cycles. 0 disables telemetry.
    pub report_interval: u32,
    /// Telemetry serial rate (8N1). A line is sent within one cycle, so it has to fit in one
    /// control period.
    pub baud_rate: u32,
    /// Toggle the heartbeat indicator every this many cycles. 0 disables it.
    pub heartbeat_interval: u32,

    /// Poll budget for an ADC conversion.
    pub adc_timeout_polls: u32,
    /// Poll budget per transmitted byte.
    pub tx_timeout_polls: u32,
}

impl ControlConfig {
    pub const DEFAULT: Self = Self {
        pid: PidConfig {
            kp: 0.8,
            ki: 0.2,
            kd: 0.1,
            integral_limit: 1000.0,
            output_min: 0.0,
            output_max: 1000.0,
        },
        safety: SafetyConfig {
            trip_c: 80.0,
            rearm_c: 75.0,
        },
        speed_bands: SpeedBands {
            medium: 400.0,
            high: 800.0,
        },
        // 12-bit ADC, 3.3 V reference, 10 mV/°C sensor
        temperature: LinearTransfer::new(3.3 / 4095.0 * 100.0, 0.0),

        control_hz: 1_000,
        pwm_hz: 20_000,

        command_max: 1000,
        initial_setpoint: 500.0,

        report_interval: 100,
        baud_rate: 921_600,
        heartbeat_interval: 500,

        adc_timeout_polls: 10_000,
        tx_timeout_polls: 10_000,
    };

    /// Control period in microseconds.
    #[inline]
    pub fn period_us(&self) -> u32 {
        1_000_000 / self.control_hz.max(1)
    }

    /// Time on the wire for `bytes` bytes at [`baud_rate`](Self::baud_rate), in microseconds.
    pub fn line_time_us(&self, bytes: usize) -> u32 {
        // start + 8 data + stop
        let bits = bytes as u64 * 10;
        (bits * 1_000_000).div_ceil(self.baud_rate.max(1) as u64) as u32
    }

    /// Check cross-field constraints. Run once at start-up.
    pub fn validate(&self) -> Result<(), Error> {
        let pid = &self.pid;

        if !(pid.kp.is_finite() && pid.ki.is_finite() && pid.kd.is_finite()) {
            return Err(Error::InvalidConfig("PID gains must be finite"));
        }
        if !(pid.integral_limit >= 0.0) {
            return Err(Error::InvalidConfig("integral limit must be non-negative"));
        }
        if !(pid.output_min <= pid.output_max) {
            return Err(Error::InvalidConfig("output_min must not exceed output_max"));
        }
        if pid.output_min < 0.0 || pid.output_max > self.command_max as f32 {
            return Err(Error::InvalidConfig("output range must fit the actuator command range"));
        }
        if !(self.safety.rearm_c <= self.safety.trip_c) {
            return Err(Error::InvalidConfig("re-arm level must not exceed the trip level"));
        }
        if self.control_hz == 0 || self.pwm_hz == 0 {
            return Err(Error::InvalidConfig("timer frequencies must be non-zero"));
        }
        if self.command_max == 0 {
            return Err(Error::InvalidConfig("command range must be non-empty"));
        }
        if self.adc_timeout_polls == 0 || self.tx_timeout_polls == 0 {
            return Err(Error::InvalidConfig("poll budgets must be non-zero"));
        }
        if self.baud_rate == 0 {
            return Err(Error::InvalidConfig("baud rate must be non-zero"));
        }
        if self.report_interval != 0 && self.line_time_us(TELEMETRY_LINE_LEN) > self.period_us() {
            return Err(Error::InvalidConfig(
                "telemetry line does not fit in one control period",
            ));
        }

        Ok(())
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
