// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry reporter.
//!
//! Formats into a fixed line buffer, then pushes the bytes out with a bounded wait per byte. A
//! stalled transmitter costs at most `line length × timeout_polls` polls before the line is
//! dropped.

use core::fmt::Write;

use crate::hw::{
    poll::{self, PollError},
    SerialTx,
};
use crate::protocol::messages::{Alert, Line, Snapshot, BANNER};
use crate::Error;

pub struct Reporter<S> {
    serial: S,
    interval: u32,
    timeout_polls: u32,
    line: Line,

    lines_sent: u32,
    bytes_sent: u32,
    tx_timeouts: u32,
}

impl<S: SerialTx> Reporter<S> {
    /// `interval` — report every this many cycles (0 disables periodic reports)
    /// `timeout_polls` — poll budget per byte
    pub fn new(serial: S, interval: u32, timeout_polls: u32) -> Self {
        Self {
            serial,
            interval,
            timeout_polls,
            line: Line::new(),
            lines_sent: 0,
            bytes_sent: 0,
            tx_timeouts: 0,
        }
    }

    /// Whether `cycle` is a reporting cycle.
    #[inline]
    pub fn is_due(&self, cycle: u32) -> bool {
        self.interval != 0 && cycle % self.interval == 0
    }

    /// Send `snapshot` if `cycle` is a reporting cycle. Returns whether a line was sent.
    pub fn maybe_report(&mut self, cycle: u32, snapshot: &Snapshot) -> Result<bool, Error> {
        if !self.is_due(cycle) {
            return Ok(false);
        }

        self.line.clear();
        snapshot
            .write_line(&mut self.line)
            .map_err(|_| Error::LineOverflow)?;
        self.send_line()?;
        Ok(true)
    }

    /// Send an alert line immediately.
    pub fn alert(&mut self, alert: &Alert) -> Result<(), Error> {
        self.line.clear();
        alert.write_line(&mut self.line).map_err(|_| Error::LineOverflow)?;
        self.send_line()
    }

    /// Send the start-up banner.
    pub fn banner(&mut self) -> Result<(), Error> {
        for text in BANNER {
            self.line.clear();
            write!(self.line, "{}\r\n", text).map_err(|_| Error::LineOverflow)?;
            self.send_line()?;
        }
        Ok(())
    }

    #[inline]
    pub fn lines_sent(&self) -> u32 {
        self.lines_sent
    }

    #[inline]
    pub fn bytes_sent(&self) -> u32 {
        self.bytes_sent
    }

    /// Lines abandoned because the transmitter stalled.
    #[inline]
    pub fn tx_timeouts(&self) -> u32 {
        self.tx_timeouts
    }

    pub fn serial(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn free(self) -> S {
        self.serial
    }

    fn send_line(&mut self) -> Result<(), Error> {
        for &b in self.line.as_bytes() {
            let serial = &mut self.serial;
            match poll::bounded(self.timeout_polls, || serial.send_byte(b)) {
                Ok(()) => self.bytes_sent = self.bytes_sent.wrapping_add(1),
                Err(PollError::Timeout) => {
                    self.tx_timeouts = self.tx_timeouts.wrapping_add(1);
                    return Err(Error::TxTimeout);
                }
                Err(PollError::Other(never)) => match never {},
            }
        }
        self.lines_sent = self.lines_sent.wrapping_add(1);
        Ok(())
    }
}
