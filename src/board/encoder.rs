// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor speed from a quadrature encoder on TIM4.
//!
//! TIM4 counts in encoder mode 3 over its full 16-bit range. Each [`Feedback::measure`] call
//! takes the count delta since the previous call, which is one control period when called once
//! per cycle, and scales it into command units. The 16-bit counter wraps; the delta is taken
//! modulo 2^16, so up to ±32767 counts per cycle are unambiguous.

use micromath::F32Ext;
use stm32f7xx_hal::pac;

use crate::hw::Feedback;

pub struct EncoderSpeed {
    tim: pac::TIM4,
    last: u16,
    scale: f32,
}

impl EncoderSpeed {
    /// Configure TIM4 as a quadrature encoder.
    ///
    /// `full_speed_counts` — counts per control period at full speed, maps to `command_max`
    pub fn tim4(tim: pac::TIM4, full_speed_counts: f32, command_max: u16) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.arr.write(|w| unsafe { w.bits(0xFFFF) });

        // Encoder mode 3: count on both TI1 and TI2 edges
        tim.smcr.modify(|_, w| w.sms().bits(0b011));
        tim.ccmr1_input().modify(|_, w| w.cc1s().ti1().cc2s().ti2());
        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.modify(|_, w| w.cen().set_bit());

        let scale = if full_speed_counts > 0.0 {
            command_max as f32 / full_speed_counts
        } else {
            0.0
        };

        Self {
            tim,
            last: 0,
            scale,
        }
    }

    /// Raw 16-bit counter.
    #[inline]
    pub fn raw(&self) -> u16 {
        self.tim.cnt.read().cnt().bits()
    }

    pub fn free(self) -> pac::TIM4 {
        self.tim
    }
}

impl Feedback for EncoderSpeed {
    /// Speed magnitude in command units; direction is not reported.
    fn measure(&mut self) -> f32 {
        let now = self.raw();
        let delta = now.wrapping_sub(self.last) as i16;
        self.last = now;
        (delta as f32 * self.scale).abs()
    }
}
