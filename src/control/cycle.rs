// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The control cycle.
//!
//! [`ControlLoop`] owns every piece of mutable controller state and runs one cycle per call:
//!
//! 1. sample (on ADC timeout, reuse the last good sample)
//! 2. PID update and actuator command, unless the safety monitor is tripped
//! 3. safety check; a trip forces the actuator safe in this same cycle
//! 4. indicators (fault, speed bands, heartbeat)
//! 5. telemetry on reporting cycles
//!
//! Typical usage pattern, with the timer interrupt calling [`Scheduler::on_tick`]:
//!
//! ```ignore
//! static SCHEDULER: Scheduler = Scheduler::new();
//!
//! control.start().ok();
//! loop {
//!     control.poll(&SCHEDULER);
//! }
//! ```

use crate::config::{ControlConfig, SpeedBands};
use crate::control::{Actuator, Pid, SafetyMonitor, SafetyState, Sample, Sampler, Scheduler};
use crate::hw::{AnalogInput, Feedback, Indicator, Indicators, PwmOutput, SerialTx};
use crate::protocol::{Alert, Reporter, Snapshot};
use crate::Error;

/// What happened in one cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub cycle: u32,
    /// Sample the cycle acted on.
    pub sample: Sample,
    /// `true` if the ADC timed out and `sample` is from an earlier cycle.
    pub stale: bool,
    /// Actuator command after the safety check.
    pub command: u16,
    pub safety: SafetyState,
    /// `true` if a telemetry line went out.
    pub reported: bool,
}

impl CycleReport {
    /// The most severe condition of the cycle, if any.
    pub fn status(&self) -> Result<(), Error> {
        if self.safety == SafetyState::Fault {
            Err(Error::SafetyFault)
        } else if self.stale {
            Err(Error::SensorTimeout)
        } else {
            Ok(())
        }
    }
}

pub struct ControlLoop<P, A, F, S, L> {
    pid: Pid,
    sampler: Sampler<A, F>,
    actuator: Actuator<P>,
    safety: SafetyMonitor,
    reporter: Reporter<S>,
    leds: L,

    speed_bands: SpeedBands,
    heartbeat_interval: u32,
    heartbeat: bool,
    /// Missed-deadline count already logged.
    missed_seen: u32,
}

impl<P, A, F, S, L> ControlLoop<P, A, F, S, L>
where
    P: PwmOutput,
    A: AnalogInput,
    F: Feedback,
    S: SerialTx,
    L: Indicators,
{
    /// Build the loop from configuration. The actuator starts at 0 %.
    pub fn new(cfg: &ControlConfig, pwm: P, adc: A, feedback: F, serial: S, leds: L) -> Self {
        Self {
            pid: Pid::from_config(&cfg.pid),
            sampler: Sampler::new(adc, feedback, cfg.temperature, cfg.adc_timeout_polls),
            actuator: Actuator::new(pwm, cfg.command_max),
            safety: SafetyMonitor::new(&cfg.safety),
            reporter: Reporter::new(serial, cfg.report_interval, cfg.tx_timeout_polls),
            leds,
            speed_bands: cfg.speed_bands,
            heartbeat_interval: cfg.heartbeat_interval,
            heartbeat: false,
            missed_seen: 0,
        }
    }

    /// Put outputs in a known state and send the banner.
    pub fn start(&mut self) -> Result<(), Error> {
        self.actuator.force_safe();
        for led in [
            Indicator::Heartbeat,
            Indicator::Fault,
            Indicator::SpeedMedium,
            Indicator::SpeedHigh,
        ] {
            self.leds.set(led, false);
        }
        self.reporter.banner()
    }

    /// Run the pending cycle, if the scheduler has one.
    pub fn poll(&mut self, scheduler: &Scheduler) -> Option<CycleReport> {
        let cycle = scheduler.begin_cycle()?;
        let report = self.run_cycle(cycle, scheduler.setpoint(), scheduler.missed_deadlines());
        scheduler.end_cycle();
        Some(report)
    }

    /// Run one full cycle.
    ///
    /// `cycle` — 1-based cycle number, drives the telemetry and heartbeat cadence
    /// `setpoint` — target for the controlled quantity
    /// `missed_deadlines` — running count from the scheduler, reported on telemetry lines
    pub fn run_cycle(&mut self, cycle: u32, setpoint: f32, missed_deadlines: u32) -> CycleReport {
        if missed_deadlines != self.missed_seen {
            diag_warn!(
                "cycle {}: {} missed deadline(s) since last cycle",
                cycle,
                missed_deadlines.wrapping_sub(self.missed_seen)
            );
            self.missed_seen = missed_deadlines;
        }

        let (sample, stale) = match self.sampler.sample() {
            Ok(sample) => (sample, false),
            Err(e) => {
                diag_warn!("cycle {}: {}, reusing last sample", cycle, e);
                (self.sampler.last(), true)
            }
        };

        if !self.safety.is_fault() {
            let u = self.pid.update(setpoint, sample.measurement);
            self.actuator.set_command(u);
        }

        let before = self.safety.state();
        let state = self.safety.check(sample.temperature_c);
        if state == SafetyState::Fault {
            self.actuator.force_safe();
        }
        match (before, state) {
            (SafetyState::Nominal, SafetyState::Fault) => {
                diag_error!(
                    "cycle {}: {} ({:.1} C)",
                    cycle,
                    Error::SafetyFault,
                    sample.temperature_c
                );
                self.leds.set(Indicator::Fault, true);
                self.send_alert(&Alert::OverTemperature {
                    temperature_c: sample.temperature_c,
                });
            }
            (SafetyState::Fault, SafetyState::Nominal) => {
                diag_info!(
                    "cycle {}: temperature back to {:.1} C, re-armed",
                    cycle,
                    sample.temperature_c
                );
                self.leds.set(Indicator::Fault, false);
                self.pid.reset();
                self.send_alert(&Alert::Rearmed {
                    temperature_c: sample.temperature_c,
                });
            }
            _ => {}
        }

        self.update_indicators(cycle, sample.measurement);

        let snapshot = Snapshot {
            cycle,
            measurement: sample.measurement,
            setpoint,
            command: self.actuator.command(),
            temperature_c: sample.temperature_c,
            raw: sample.raw,
            missed_deadlines,
            sensor_timeouts: self.sampler.timeouts(),
            fault: state == SafetyState::Fault,
        };
        let reported = match self.reporter.maybe_report(cycle, &snapshot) {
            Ok(sent) => sent,
            Err(e) => {
                diag_warn!("cycle {}: telemetry dropped: {}", cycle, e);
                false
            }
        };

        CycleReport {
            cycle,
            sample,
            stale,
            command: self.actuator.command(),
            safety: state,
            reported,
        }
    }

    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    #[inline]
    pub fn sampler(&self) -> &Sampler<A, F> {
        &self.sampler
    }

    #[inline]
    pub fn actuator(&self) -> &Actuator<P> {
        &self.actuator
    }

    #[inline]
    pub fn safety(&self) -> &SafetyMonitor {
        &self.safety
    }

    #[inline]
    pub fn reporter(&self) -> &Reporter<S> {
        &self.reporter
    }

    #[inline]
    pub fn leds(&self) -> &L {
        &self.leds
    }

    fn send_alert(&mut self, alert: &Alert) {
        if let Err(e) = self.reporter.alert(alert) {
            diag_warn!("alert dropped: {}", e);
        }
    }

    fn update_indicators(&mut self, cycle: u32, measurement: f32) {
        let high = measurement > self.speed_bands.high;
        let medium = !high && measurement > self.speed_bands.medium;
        self.leds.set(Indicator::SpeedHigh, high);
        self.leds.set(Indicator::SpeedMedium, medium);

        if self.heartbeat_interval != 0 && cycle % self.heartbeat_interval == 0 {
            self.heartbeat = !self.heartbeat;
            self.leds.set(Indicator::Heartbeat, self.heartbeat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mock::{MockAdc, MockLeds, MockPwm, MockSerial};
    use std::cell::Cell;
    use std::rc::Rc;

    type TestLoop = ControlLoop<MockPwm, MockAdc, Box<dyn FnMut() -> f32>, MockSerial, MockLeds>;

    /// ADC code for a temperature with the default LM35 transfer.
    fn code_for(temp_c: f32) -> u16 {
        (temp_c / 100.0 / 3.3 * 4095.0).round() as u16
    }

    fn control(cfg: &ControlConfig, speed: Rc<Cell<f32>>) -> TestLoop {
        ControlLoop::new(
            cfg,
            MockPwm::new(4200),
            MockAdc::new(code_for(25.0)),
            Box::new(move || speed.get()) as Box<dyn FnMut() -> f32>,
            MockSerial::default(),
            MockLeds::default(),
        )
    }

    fn set_temp(c: &mut TestLoop, temp_c: f32) {
        c.sampler.adc_mut().raw = code_for(temp_c);
    }

    #[test]
    fn runs_pid_into_actuator() {
        let speed = Rc::new(Cell::new(0.0));
        let mut c = control(&ControlConfig::DEFAULT, speed);

        let r = c.run_cycle(1, 500.0, 0);
        assert_eq!(r.status(), Ok(()));
        assert_eq!(r.command, 550);
        assert_eq!(c.actuator().duty_for(550), 2310);

        let r = c.run_cycle(2, 500.0, 0);
        assert_eq!(r.command, 600);
    }

    #[test]
    fn sensor_timeout_reuses_last_sample() {
        let speed = Rc::new(Cell::new(100.0));
        let mut c = control(&ControlConfig::DEFAULT, speed.clone());
        let first = c.run_cycle(1, 500.0, 0);

        c.sampler.adc_mut().ready_after = None;
        speed.set(900.0);
        let r = c.run_cycle(2, 500.0, 0);
        assert!(r.stale);
        assert_eq!(r.status(), Err(Error::SensorTimeout));
        assert_eq!(r.sample, first.sample);
        assert_eq!(c.sampler().timeouts(), 1);
        // Loop keeps going once the ADC recovers.
        c.sampler.adc_mut().ready_after = Some(0);
        let r = c.run_cycle(3, 500.0, 0);
        assert!(!r.stale);
        assert_eq!(r.sample.measurement, 900.0);
    }

    #[test]
    fn over_temperature_forces_safe_same_cycle() {
        let speed = Rc::new(Cell::new(0.0));
        let mut c = control(&ControlConfig::DEFAULT, speed);
        assert_eq!(c.run_cycle(1, 500.0, 0).command, 550);

        set_temp(&mut c, 85.0);
        let r = c.run_cycle(2, 500.0, 0);
        assert_eq!(r.safety, SafetyState::Fault);
        assert_eq!(r.status(), Err(Error::SafetyFault));
        assert_eq!(r.command, 0);
        assert!(c.leds().fault);

        // Held inside the hysteresis band.
        set_temp(&mut c, 77.0);
        for n in 3..10 {
            let r = c.run_cycle(n, 500.0, 0);
            assert_eq!(r.command, 0);
            assert_eq!(r.safety, SafetyState::Fault);
        }

        // Re-armed below the band: PID starts over from a clean state.
        set_temp(&mut c, 60.0);
        let r = c.run_cycle(10, 500.0, 0);
        assert_eq!(r.safety, SafetyState::Nominal);
        assert_eq!(r.command, 0);
        assert!(!c.leds().fault);
        assert_eq!(c.pid().integral(), 0.0);

        let r = c.run_cycle(11, 500.0, 0);
        assert_eq!(r.command, 550);
    }

    #[test]
    fn alerts_are_sent_once_per_transition() {
        let speed = Rc::new(Cell::new(0.0));
        let mut c = control(&ControlConfig::DEFAULT, speed);

        set_temp(&mut c, 90.0);
        for n in 1..=5 {
            c.run_cycle(n, 500.0, 0);
        }
        set_temp(&mut c, 20.0);
        c.run_cycle(6, 500.0, 0);

        let lines = c.reporter.serial().lines();
        assert_eq!(lines.iter().filter(|l| l.starts_with("ERROR:")).count(), 1);
        assert_eq!(lines.iter().filter(|l| l.starts_with("INFO:")).count(), 1);
    }

    #[test]
    fn telemetry_cadence() {
        let speed = Rc::new(Cell::new(250.0));
        let mut cfg = ControlConfig::DEFAULT;
        cfg.report_interval = 10;
        let mut c = control(&cfg, speed);

        let reported: Vec<u32> = (1..=35)
            .map(|n| c.run_cycle(n, 500.0, 3))
            .filter(|r| r.reported)
            .map(|r| r.cycle)
            .collect();
        assert_eq!(reported, vec![10, 20, 30]);

        let lines = c.reporter.serial().lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("T:10 SPD:250/500 "));
        assert!(lines[0].contains(" MISS:3 "));
        assert!(lines[0].ends_with("ST:OK"));
    }

    #[test]
    fn indicators_follow_speed_and_heartbeat() {
        let speed = Rc::new(Cell::new(450.0));
        let mut cfg = ControlConfig::DEFAULT;
        cfg.heartbeat_interval = 2;
        let mut c = control(&cfg, speed.clone());

        c.run_cycle(1, 500.0, 0);
        assert!(c.leds().medium && !c.leds().high);
        assert!(!c.leds().heartbeat);

        speed.set(950.0);
        c.run_cycle(2, 500.0, 0);
        assert!(!c.leds().medium && c.leds().high);
        assert!(c.leds().heartbeat);

        speed.set(10.0);
        c.run_cycle(3, 500.0, 0);
        c.run_cycle(4, 500.0, 0);
        assert!(!c.leds().medium && !c.leds().high);
        assert!(!c.leds().heartbeat);
    }

    #[test]
    fn poll_runs_only_pending_cycles() {
        let speed = Rc::new(Cell::new(0.0));
        let mut c = control(&ControlConfig::DEFAULT, speed);
        let scheduler = Scheduler::new();
        scheduler.set_setpoint(500.0);

        assert!(c.poll(&scheduler).is_none());
        scheduler.on_tick().unwrap();
        let r = c.poll(&scheduler).unwrap();
        assert_eq!(r.cycle, 1);
        assert_eq!(r.command, 550);
        assert!(c.poll(&scheduler).is_none());
        assert_eq!(scheduler.cycles(), 1);
    }

    #[test]
    fn start_sends_banner_and_zeroes_output() {
        let speed = Rc::new(Cell::new(0.0));
        let mut c = control(&ControlConfig::DEFAULT, speed);
        c.run_cycle(1, 500.0, 0);
        c.start().unwrap();
        assert_eq!(c.actuator().command(), 0);
        assert!(c.reporter().lines_sent() > 0);
    }
}
