// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Status LEDs.
//!
//! | Indicator | LED |
//! | --------- | --- |
//! | Heartbeat | green LD1 |
//! | SpeedHigh | blue LD2 |
//! | Fault | red LD3 |
//! | SpeedMedium | external amber |

use crate::board::pins::LedPins;
use crate::hw::{Indicator, Indicators};

pub struct StatusLeds {
    pins: LedPins,
}

impl StatusLeds {
    /// Take the LED pins and switch everything off.
    pub fn new(pins: LedPins) -> Self {
        let mut leds = Self { pins };
        for ind in [
            Indicator::Heartbeat,
            Indicator::Fault,
            Indicator::SpeedMedium,
            Indicator::SpeedHigh,
        ] {
            leds.set(ind, false);
        }
        leds
    }

    pub fn free(self) -> LedPins {
        self.pins
    }
}

// All four are active-high on this board.
macro_rules! drive {
    ($pin:expr, $on:expr) => {{
        if $on {
            $pin.set_high();
        } else {
            $pin.set_low();
        }
    }};
}

impl Indicators for StatusLeds {
    fn set(&mut self, indicator: Indicator, on: bool) {
        match indicator {
            Indicator::Heartbeat => drive!(self.pins.green, on),
            Indicator::SpeedHigh => drive!(self.pins.blue, on),
            Indicator::Fault => drive!(self.pins.red, on),
            Indicator::SpeedMedium => drive!(self.pins.amber, on),
        }
    }
}
