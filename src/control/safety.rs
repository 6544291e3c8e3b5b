// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Over-temperature cutoff with hysteresis.
//!
//! Trips when the temperature rises above `trip_c` and stays tripped until it falls below
//! `rearm_c`. With the defaults that is a 75–80 °C band. A NaN reading trips the monitor and keeps
//! it tripped.

use crate::config::SafetyConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SafetyState {
    Nominal,
    Fault,
}

pub struct SafetyMonitor {
    trip_c: f32,
    rearm_c: f32,
    state: SafetyState,
    trips: u32,
}

impl SafetyMonitor {
    pub fn new(cfg: &SafetyConfig) -> Self {
        Self {
            trip_c: cfg.trip_c,
            rearm_c: cfg.rearm_c,
            state: SafetyState::Nominal,
            trips: 0,
        }
    }

    /// Evaluate one reading and return the resulting state.
    pub fn check(&mut self, temperature_c: f32) -> SafetyState {
        self.state = match self.state {
            SafetyState::Nominal if !(temperature_c <= self.trip_c) => {
                self.trips = self.trips.wrapping_add(1);
                SafetyState::Fault
            }
            SafetyState::Fault if temperature_c < self.rearm_c => SafetyState::Nominal,
            s => s,
        };
        self.state
    }

    #[inline]
    pub fn state(&self) -> SafetyState {
        self.state
    }

    #[inline]
    pub fn is_fault(&self) -> bool {
        self.state == SafetyState::Fault
    }

    /// Nominal→Fault transitions so far.
    #[inline]
    pub fn trips(&self) -> u32 {
        self.trips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControlConfig;

    fn monitor() -> SafetyMonitor {
        SafetyMonitor::new(&ControlConfig::DEFAULT.safety)
    }

    #[test]
    fn trips_above_threshold() {
        let mut m = monitor();
        assert_eq!(m.check(25.0), SafetyState::Nominal);
        assert_eq!(m.check(80.0), SafetyState::Nominal);
        assert_eq!(m.check(80.1), SafetyState::Fault);
        assert_eq!(m.trips(), 1);
    }

    #[test]
    fn stays_tripped_inside_band() {
        let mut m = monitor();
        m.check(90.0);
        for t in [79.0, 76.0, 75.0, 78.0, 85.0] {
            assert_eq!(m.check(t), SafetyState::Fault, "at {t}");
        }
        assert_eq!(m.check(74.9), SafetyState::Nominal);
        assert_eq!(m.trips(), 1);
    }

    #[test]
    fn retrips_after_rearm() {
        let mut m = monitor();
        m.check(81.0);
        m.check(20.0);
        assert!(!m.is_fault());
        m.check(81.0);
        assert!(m.is_fault());
        assert_eq!(m.trips(), 2);
    }

    #[test]
    fn nan_is_a_fault() {
        let mut m = monitor();
        assert_eq!(m.check(f32::NAN), SafetyState::Fault);
        assert_eq!(m.check(f32::NAN), SafetyState::Fault);
        assert_eq!(m.check(20.0), SafetyState::Nominal);
    }
}
