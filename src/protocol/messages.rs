// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry line format.
//!
//! One ASCII line per report, CRLF-terminated, fields always in this order:
//!
//! ```text
//! T:<cycle> SPD:<measurement>/<setpoint> PWM:<command> TEMP:<°C> ADC:<raw> MISS:<missed> STO:<timeouts> ST:<OK|FAULT>
//! ```
//!
//! Alerts and the start-up banner are free-form lines that never start with `T:`.

use core::fmt::{self, Write};

/// Capacity of the fixed line buffer.
pub const LINE_CAPACITY: usize = 160;

pub type Line = heapless::String<LINE_CAPACITY>;

pub const BANNER: &[&str] = &[
    "",
    "========================================",
    "motorctl closed-loop motor controller",
    "========================================",
    "",
];

/// State reported on a telemetry line.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub cycle: u32,
    pub measurement: f32,
    pub setpoint: f32,
    pub command: u16,
    pub temperature_c: f32,
    pub raw: u16,
    pub missed_deadlines: u32,
    pub sensor_timeouts: u32,
    pub fault: bool,
}

impl Snapshot {
    pub fn write_line<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "T:{} SPD:{:.0}/{:.0} PWM:{} TEMP:{:.1} ADC:{} MISS:{} STO:{} ST:{}\r\n",
            self.cycle,
            self.measurement,
            self.setpoint,
            self.command,
            self.temperature_c,
            self.raw,
            self.missed_deadlines,
            self.sensor_timeouts,
            if self.fault { "FAULT" } else { "OK" },
        )
    }
}

/// Safety events pushed out as soon as they happen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Alert {
    /// Safety monitor tripped; actuator forced to 0.
    OverTemperature { temperature_c: f32 },
    /// Temperature back below the re-arm level; control resumed.
    Rearmed { temperature_c: f32 },
}

impl Alert {
    pub fn write_line<W: Write>(&self, out: &mut W) -> fmt::Result {
        match *self {
            Alert::OverTemperature { temperature_c } => write!(
                out,
                "ERROR: Temperature too high! TEMP:{:.1} output forced off\r\n",
                temperature_c
            ),
            Alert::Rearmed { temperature_c } => write!(
                out,
                "INFO: Temperature nominal TEMP:{:.1} output re-armed\r\n",
                temperature_c
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_line_format() {
        let snap = Snapshot {
            cycle: 100,
            measurement: 487.6,
            setpoint: 500.0,
            command: 612,
            temperature_c: 42.04,
            raw: 522,
            missed_deadlines: 0,
            sensor_timeouts: 3,
            fault: false,
        };
        let mut line = Line::new();
        snap.write_line(&mut line).unwrap();
        assert_eq!(
            line.as_str(),
            "T:100 SPD:488/500 PWM:612 TEMP:42.0 ADC:522 MISS:0 STO:3 ST:OK\r\n"
        );
    }

    #[test]
    fn worst_case_line_fits() {
        let snap = Snapshot {
            cycle: u32::MAX,
            measurement: -1.0e9,
            setpoint: -1.0e9,
            command: u16::MAX,
            temperature_c: -1.0e6,
            raw: u16::MAX,
            missed_deadlines: u32::MAX,
            sensor_timeouts: u32::MAX,
            fault: true,
        };
        let mut line = Line::new();
        assert!(snap.write_line(&mut line).is_ok());
        assert!(line.ends_with("ST:FAULT\r\n"));
    }

    #[test]
    fn alert_lines() {
        let mut line = Line::new();
        Alert::OverTemperature { temperature_c: 85.26 }
            .write_line(&mut line)
            .unwrap();
        assert!(line.starts_with("ERROR: Temperature too high! TEMP:85.3"));

        let mut line = Line::new();
        Alert::Rearmed { temperature_c: 74.0 }.write_line(&mut line).unwrap();
        assert!(line.starts_with("INFO: "));
        assert!(!line.starts_with("T:"));
    }
}
