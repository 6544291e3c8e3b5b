// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry serial port.
//!
//! Transmit half of a HAL [`Serial`], exposed as a non-blocking byte sink.
//!
//! To access the terminal on the host machine, connect to the ST-LINK USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 921600
//! ```

use core::convert::Infallible;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

use crate::hw::SerialTx;

pub struct SerialPort<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> SerialPort<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }
}

impl<U: Instance> SerialTx for SerialPort<U> {
    #[inline]
    fn send_byte(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        // A transmit error shows up as a stall and ends in the caller's timeout.
        self.tx.write(byte).map_err(|_| nb::Error::WouldBlock)
    }
}
