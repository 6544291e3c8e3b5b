// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fake peripherals for unit tests.

use core::convert::Infallible;

use super::{AnalogInput, Indicator, Indicators, PeriodicTimer, PwmOutput, SerialTx};

#[derive(Default)]
pub struct MockPwm {
    pub max: u32,
    pub duty: u32,
    pub writes: u32,
}

impl MockPwm {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            ..Default::default()
        }
    }
}

impl PwmOutput for MockPwm {
    fn max_duty(&self) -> u32 {
        self.max
    }

    fn set_duty(&mut self, duty: u32) {
        self.duty = duty;
        self.writes += 1;
    }
}

/// ADC returning `raw` after `ready_after` polls. `None` never completes.
pub struct MockAdc {
    pub raw: u16,
    pub ready_after: Option<u32>,
    pub started: u32,
    polls: u32,
}

impl MockAdc {
    pub fn new(raw: u16) -> Self {
        Self {
            raw,
            ready_after: Some(0),
            started: 0,
            polls: 0,
        }
    }

    pub fn stuck() -> Self {
        Self {
            ready_after: None,
            ..Self::new(0)
        }
    }
}

impl AnalogInput for MockAdc {
    fn start_conversion(&mut self) {
        self.started += 1;
        self.polls = 0;
    }

    fn read_conversion(&mut self) -> nb::Result<u16, Infallible> {
        match self.ready_after {
            Some(n) if self.polls >= n => Ok(self.raw),
            _ => {
                self.polls += 1;
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

#[derive(Default)]
pub struct MockSerial {
    pub out: Vec<u8>,
    pub stalled: bool,
}

impl MockSerial {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(|l| l.trim_end_matches('\r').to_owned()).collect()
    }
}

impl SerialTx for MockSerial {
    fn send_byte(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.stalled {
            return Err(nb::Error::WouldBlock);
        }
        self.out.push(byte);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTimer {
    pub hz: Option<u32>,
    pub pending: bool,
}

impl PeriodicTimer for MockTimer {
    fn enable_timer(&mut self, hz: u32) {
        self.hz = Some(hz);
    }

    fn clear_update(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }
}

#[derive(Default)]
pub struct MockLeds {
    pub heartbeat: bool,
    pub fault: bool,
    pub medium: bool,
    pub high: bool,
}

impl Indicators for MockLeds {
    fn set(&mut self, indicator: Indicator, on: bool) {
        match indicator {
            Indicator::Heartbeat => self.heartbeat = on,
            Indicator::Fault => self.fault = on,
            Indicator::SpeedMedium => self.medium = on,
            Indicator::SpeedHigh => self.high = on,
        }
    }
}
