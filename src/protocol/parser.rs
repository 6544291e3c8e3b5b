// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry line parser.
//!
//! Host-side counterpart of [`Snapshot::write_line`]: feed it the serial stream byte by byte and it
//! yields a [`Snapshot`] for every complete telemetry line. Banner and alert lines are skipped.
//! Values come back at the precision they were printed with.

use core::str::SplitAsciiWhitespace;

use crate::protocol::messages::{Line, Snapshot};

pub struct Parser {
    line: Line,
    overflowed: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            line: Line::new(),
            overflowed: false,
        }
    }

    /// Process a single incoming byte. Returns `Some(Snapshot)` when a telemetry line completes.
    pub fn push(&mut self, byte: u8) -> Option<Snapshot> {
        match byte {
            b'\n' => {
                let parsed = if self.overflowed {
                    None
                } else {
                    parse_line(&self.line)
                };
                self.line.clear();
                self.overflowed = false;
                parsed
            }
            b'\r' => None,
            _ => {
                if !byte.is_ascii() || self.line.push(byte as char).is_err() {
                    self.overflowed = true;
                }
                None
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one telemetry line (with or without the trailing CRLF).
pub fn parse_line(line: &str) -> Option<Snapshot> {
    let mut f = line.split_ascii_whitespace();

    let cycle = field(&mut f, "T")?.parse().ok()?;
    let (measurement, setpoint) = field(&mut f, "SPD")?.split_once('/')?;
    let command = field(&mut f, "PWM")?.parse().ok()?;
    let temperature_c = field(&mut f, "TEMP")?.parse().ok()?;
    let raw = field(&mut f, "ADC")?.parse().ok()?;
    let missed_deadlines = field(&mut f, "MISS")?.parse().ok()?;
    let sensor_timeouts = field(&mut f, "STO")?.parse().ok()?;
    let fault = match field(&mut f, "ST")? {
        "OK" => false,
        "FAULT" => true,
        _ => return None,
    };

    Some(Snapshot {
        cycle,
        measurement: measurement.parse().ok()?,
        setpoint: setpoint.parse().ok()?,
        command,
        temperature_c,
        raw,
        missed_deadlines,
        sensor_timeouts,
        fault,
    })
}

/// Next `KEY:value` token, if its key is `key`.
fn field<'a>(fields: &mut SplitAsciiWhitespace<'a>, key: &str) -> Option<&'a str> {
    let (k, v) = fields.next()?.split_once(':')?;
    (k == key).then_some(v)
}
