// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PWM actuator driver.
//!
//! Commands are in `0..=command_max` (1000 = 100.0 % duty). Each command is mapped onto the timer's
//! compare range and applied with one register write, so the output never shows a half-updated
//! value.

use crate::hw::PwmOutput;

pub struct Actuator<P> {
    pwm: P,
    command_max: u16,
    command: u16,
}

impl<P: PwmOutput> Actuator<P> {
    /// Wrap a PWM channel and drive it to 0 %.
    pub fn new(pwm: P, command_max: u16) -> Self {
        let mut act = Self {
            pwm,
            command_max,
            command: 0,
        };
        act.apply(0);
        act
    }

    /// Set the command. Out-of-range values are clamped; NaN maps to 0. Fractions are truncated.
    pub fn set_command(&mut self, value: f32) {
        let max = self.command_max as f32;
        let clamped = if value > max {
            max
        } else if value > 0.0 {
            value
        } else {
            0.0
        };
        self.apply(clamped as u16);
    }

    /// Drive the output to the safe command (0 %).
    #[inline]
    pub fn force_safe(&mut self) {
        self.apply(0);
    }

    /// Last applied command.
    #[inline]
    pub fn command(&self) -> u16 {
        self.command
    }

    /// Compare value for a command, rounded down.
    pub fn duty_for(&self, command: u16) -> u32 {
        let command = command.min(self.command_max) as u64;
        (command * self.pwm.max_duty() as u64 / self.command_max.max(1) as u64) as u32
    }

    pub fn free(self) -> P {
        self.pwm
    }

    fn apply(&mut self, command: u16) {
        let duty = self.duty_for(command);
        self.pwm.set_duty(duty);
        self.command = command;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mock::MockPwm;

    fn actuator() -> Actuator<MockPwm> {
        // 20 kHz at 84 MHz
        Actuator::new(MockPwm::new(4200), 1000)
    }

    #[test]
    fn starts_at_zero() {
        let act = actuator();
        assert_eq!(act.command(), 0);
        let pwm = act.free();
        assert_eq!(pwm.duty, 0);
        assert_eq!(pwm.writes, 1);
    }

    #[test]
    fn maps_linearly_onto_timer_range() {
        let mut act = actuator();
        act.set_command(500.0);
        assert_eq!(act.command(), 500);
        act.set_command(1000.0);
        assert_eq!(act.command(), 1000);
        let pwm = act.free();
        assert_eq!(pwm.duty, 4200);
        assert_eq!(pwm.writes, 3);
    }

    #[test]
    fn one_write_per_command() {
        let mut act = actuator();
        act.set_command(333.9);
        assert_eq!(act.command(), 333);
        assert_eq!(act.duty_for(333), 1398);
        assert_eq!(act.free().writes, 2);
    }

    #[test]
    fn clamps_out_of_range() {
        let mut act = actuator();
        act.set_command(5000.0);
        assert_eq!(act.command(), 1000);
        act.set_command(-12.0);
        assert_eq!(act.command(), 0);
        act.set_command(f32::NAN);
        assert_eq!(act.command(), 0);
    }

    #[test]
    fn force_safe_zeroes_output() {
        let mut act = actuator();
        act.set_command(750.0);
        act.force_safe();
        assert_eq!(act.command(), 0);
        assert_eq!(act.free().duty, 0);
    }
}
