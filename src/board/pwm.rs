// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor PWM on TIM2 channel 1.
//!
//! Edge-aligned PWM mode 1 with preload, so a new compare value takes effect at the next update
//! event and a period never mixes two duties.

use stm32f7xx_hal::pac;

use crate::hw::PwmOutput;

pub struct Pwm {
    tim: pac::TIM2,
    max_duty: u32,
}

impl Pwm {
    /// Configure TIM2 CH1 for `pwm_hz` from a `timer_clk_hz` kernel clock. Output starts at 0 %.
    pub fn tim2(tim: pac::TIM2, timer_clk_hz: u32, pwm_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        let period = (timer_clk_hz / pwm_hz.max(1)).max(2);
        tim.psc.write(|w| unsafe { w.psc().bits(0) });
        tim.arr.write(|w| unsafe { w.bits(period - 1) });
        tim.ccr1.write(|w| unsafe { w.bits(0) });

        // CH1: PWM mode 1, preload enabled
        tim.ccmr1_output()
            .modify(|_, w| unsafe { w.oc1m().bits(0b110).oc1pe().set_bit() });
        tim.ccer.modify(|_, w| w.cc1p().clear_bit().cc1e().set_bit());

        // Latch PSC/ARR, then start
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.arpe().set_bit().cen().set_bit());

        Self {
            tim,
            max_duty: period,
        }
    }

    pub fn free(self) -> pac::TIM2 {
        self.tim.ccr1.write(|w| unsafe { w.bits(0) });
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim
    }
}

impl PwmOutput for Pwm {
    #[inline]
    fn max_duty(&self) -> u32 {
        self.max_duty
    }

    #[inline]
    fn set_duty(&mut self, duty: u32) {
        let duty = duty.min(self.max_duty);
        self.tim.ccr1.write(|w| unsafe { w.bits(duty) });
    }
}
