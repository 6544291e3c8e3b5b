// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Discrete PID controller for a fixed-rate control loop.
//!
//! Works in `no_std` and does not allocate memory.
//!
//! There is no timestep argument: the integral accumulates raw error and the derivative is the raw
//! error difference, so the gains only make sense for the period they were tuned at. Gains and
//! limits are taken as given; check them once with [`ControlConfig::validate`].
//!
//! [`ControlConfig::validate`]: crate::ControlConfig::validate

use crate::config::PidConfig;

/// PID controller with tunable gains, output clamping and integral anti-windup.
#[derive(Clone, Debug)]
pub struct Pid {
    /// Proportional gain
    kp: f32,
    /// Integral gain
    ki: f32,
    /// Derivative gain
    kd: f32,

    /// Sum of past errors, clamped to `±int_limit`
    integral: f32,
    /// Error from the previous update (for derivative term)
    prev_error: f32,

    /// Output clamp
    out_min: f32,
    out_max: f32,

    /// Integral anti-windup clamp
    int_limit: f32,
}

impl Pid {
    /// Create a new PID controller.
    ///
    /// `kp`, `ki`, `kd` are the gain constants. Output defaults to [-1, 1] and the integral clamp
    /// to ±1.
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            kp,
            ki,
            kd,

            integral: 0.0,
            prev_error: 0.0,

            out_min: -1.0,
            out_max: 1.0,

            int_limit: 1.0,
        }
    }

    /// Build a controller from configuration.
    pub fn from_config(cfg: &PidConfig) -> Self {
        Self::new(cfg.kp, cfg.ki, cfg.kd)
            .with_output_limits(cfg.output_min, cfg.output_max)
            .with_integral_limit(cfg.integral_limit)
    }

    /// Set output limits.
    pub fn with_output_limits(mut self, min: f32, max: f32) -> Self {
        self.out_min = min;
        self.out_max = max;
        self
    }

    /// Set the symmetric integral clamp for anti-windup.
    pub fn with_integral_limit(mut self, limit: f32) -> Self {
        self.int_limit = limit;
        self
    }

    /// Reset integrator + derivative history.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    #[inline]
    pub fn integral(&self) -> f32 {
        self.integral
    }

    #[inline]
    pub fn prev_error(&self) -> f32 {
        self.prev_error
    }

    #[inline]
    pub fn output_limits(&self) -> (f32, f32) {
        (self.out_min, self.out_max)
    }

    /// Update the controller.
    ///
    /// `setpoint` — desired value
    /// `measurement` — current value
    ///
    /// Returns a command in [`out_min`, `out_max`]. A non-finite error (NaN or infinite input)
    /// leaves the state untouched and returns `out_min`.
    pub fn update(&mut self, setpoint: f32, measurement: f32) -> f32 {
        let error = setpoint - measurement;
        if !error.is_finite() {
            return self.out_min;
        }

        // ----- P term -----
        let p = self.kp * error;

        // ----- I term -----
        self.integral = clamp(self.integral + error, -self.int_limit, self.int_limit);
        let i = self.ki * self.integral;

        // ----- D term -----
        let d = self.kd * (error - self.prev_error);
        self.prev_error = error;

        // ----- Output clamp -----
        clamp(p + i + d, self.out_min, self.out_max)
    }
}

/// Clamp that maps NaN to `min` instead of propagating it.
#[inline]
fn clamp(x: f32, min: f32, max: f32) -> f32 {
    if x > max {
        max
    } else if x >= min {
        x
    } else {
        min
    }
}
