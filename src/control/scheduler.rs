// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-rate cycle scheduling between the timer interrupt and the main loop.
//!
//! ```text
//!            timer IRQ             begin_cycle()
//!   Idle ───────────────▶ Triggered ─────────────▶ Running
//!    ▲                                                │
//!    └──────────────────── end_cycle() ───────────────┘
//! ```
//!
//! The interrupt side ([`Scheduler::on_tick`]) only flips the state and bumps counters; it never
//! blocks and does no floating-point work. A tick that lands while a cycle is `Running` is a
//! missed deadline: it is counted and dropped. A tick that lands while `Triggered` merges with the
//! pending one.
//!
//! All fields are word-sized atomics so a `static Scheduler` can be shared with the interrupt
//! handler without locks. The interrupt writes the state (Idle→Triggered only) and the tick and
//! missed-deadline counters; everything else is written by the main context.
//!
//! Needs compare-and-swap (Cortex-M3 and up).

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::hw::PeriodicTimer;
use crate::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CycleState {
    Idle = 0,
    Triggered = 1,
    Running = 2,
}

impl CycleState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => CycleState::Triggered,
            2 => CycleState::Running,
            _ => CycleState::Idle,
        }
    }
}

pub struct Scheduler {
    state: AtomicU8,
    /// Timer ticks seen (interrupt-owned).
    ticks: AtomicU32,
    /// Ticks dropped because a cycle was still running (interrupt-owned).
    missed: AtomicU32,
    /// Completed cycles (main-owned).
    cycles: AtomicU32,
    /// Setpoint as `f32` bits; written by whoever commands the motor, read once per cycle.
    setpoint: AtomicU32,
}

impl Scheduler {
    /// Idle, with a setpoint of 0.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(CycleState::Idle as u8),
            ticks: AtomicU32::new(0),
            missed: AtomicU32::new(0),
            cycles: AtomicU32::new(0),
            setpoint: AtomicU32::new(0), // 0.0_f32
        }
    }

    /// Timer tick. Call from the interrupt handler only.
    ///
    /// Returns [`Error::MissedDeadline`] if the previous cycle is still running; the tick is dropped.
    pub fn on_tick(&self) -> Result<(), Error> {
        self.ticks.fetch_add(1, Ordering::Relaxed);

        match self.state.compare_exchange(
            CycleState::Idle as u8,
            CycleState::Triggered as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Ok(()),
            Err(s) if s == CycleState::Running as u8 => {
                self.missed.fetch_add(1, Ordering::Relaxed);
                Err(Error::MissedDeadline)
            }
            // Already triggered: same pending cycle.
            Err(_) => Ok(()),
        }
    }

    /// Full interrupt body: acknowledge the timer, then tick if an update was pending.
    pub fn on_timer_interrupt<T: PeriodicTimer>(&self, timer: &mut T) -> Result<(), Error> {
        if timer.clear_update() {
            self.on_tick()
        } else {
            Ok(())
        }
    }

    /// Claim the pending cycle. Returns its cycle number (1-based), or `None` if nothing is pending.
    pub fn begin_cycle(&self) -> Option<u32> {
        self.state
            .compare_exchange(
                CycleState::Triggered as u8,
                CycleState::Running as u8,
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .ok()
            .map(|_| self.cycles.load(Ordering::Relaxed).wrapping_add(1))
    }

    /// Finish the running cycle and return to `Idle`.
    pub fn end_cycle(&self) {
        if self
            .state
            .compare_exchange(
                CycleState::Running as u8,
                CycleState::Idle as u8,
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            self.cycles.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn state(&self) -> CycleState {
        CycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cycles(&self) -> u32 {
        self.cycles.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn missed_deadlines(&self) -> u32 {
        self.missed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn setpoint(&self) -> f32 {
        f32::from_bits(self.setpoint.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_setpoint(&self, value: f32) {
        self.setpoint.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mock::MockTimer;

    #[test]
    fn tick_runs_one_cycle() {
        let s = Scheduler::new();
        assert_eq!(s.begin_cycle(), None);

        s.on_tick().unwrap();
        assert_eq!(s.state(), CycleState::Triggered);

        assert_eq!(s.begin_cycle(), Some(1));
        assert_eq!(s.state(), CycleState::Running);
        assert_eq!(s.begin_cycle(), None);

        s.end_cycle();
        assert_eq!(s.state(), CycleState::Idle);
        assert_eq!(s.cycles(), 1);
        assert_eq!(s.ticks(), 1);
    }

    #[test]
    fn tick_while_running_is_missed() {
        let s = Scheduler::new();
        s.on_tick().unwrap();
        s.begin_cycle().unwrap();

        assert_eq!(s.on_tick(), Err(Error::MissedDeadline));
        assert_eq!(s.missed_deadlines(), 1);
        assert_eq!(s.on_tick(), Err(Error::MissedDeadline));
        assert_eq!(s.missed_deadlines(), 2);

        // Dropped, not queued.
        s.end_cycle();
        assert_eq!(s.state(), CycleState::Idle);
        assert_eq!(s.begin_cycle(), None);
    }

    #[test]
    fn ticks_while_idle_or_triggered_are_not_missed() {
        let s = Scheduler::new();
        s.on_tick().unwrap();
        s.on_tick().unwrap();
        s.on_tick().unwrap();
        assert_eq!(s.missed_deadlines(), 0);
        assert_eq!(s.ticks(), 3);

        // Merged into one pending cycle.
        assert_eq!(s.begin_cycle(), Some(1));
        s.end_cycle();
        assert_eq!(s.begin_cycle(), None);
    }

    #[test]
    fn end_without_begin_is_ignored() {
        let s = Scheduler::new();
        s.end_cycle();
        assert_eq!(s.cycles(), 0);
        s.on_tick().unwrap();
        s.end_cycle();
        assert_eq!(s.state(), CycleState::Triggered);
        assert_eq!(s.cycles(), 0);
    }

    #[test]
    fn cycle_numbers_increase() {
        let s = Scheduler::new();
        for n in 1..=5 {
            s.on_tick().unwrap();
            assert_eq!(s.begin_cycle(), Some(n));
            s.end_cycle();
        }
        assert_eq!(s.cycles(), 5);
    }

    #[test]
    fn interrupt_acknowledges_timer() {
        let s = Scheduler::new();
        let mut timer = MockTimer::default();

        s.on_timer_interrupt(&mut timer).unwrap();
        assert_eq!(s.ticks(), 0);

        timer.pending = true;
        s.on_timer_interrupt(&mut timer).unwrap();
        assert!(!timer.pending);
        assert_eq!(s.state(), CycleState::Triggered);
    }

    #[test]
    fn setpoint_round_trips() {
        let s = Scheduler::new();
        assert_eq!(s.setpoint(), 0.0);
        s.set_setpoint(500.0);
        assert_eq!(s.setpoint(), 500.0);
        s.set_setpoint(-12.5);
        assert_eq!(s.setpoint(), -12.5);
    }
}
