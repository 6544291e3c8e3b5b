// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TIM3 periodic update interrupt driving the control tick.

use cortex_m::peripheral::NVIC;
use stm32f7xx_hal::pac::{self, Interrupt};

use crate::hw::PeriodicTimer;

/// Counter clock after the prescaler.
const TICK_CLK_HZ: u32 = 1_000_000;

pub struct TickTimer {
    tim: pac::TIM3,
    timer_clk_hz: u32,
}

impl TickTimer {
    /// `timer_clk_hz` — TIM3 kernel clock (APB1 timer clock)
    pub fn tim3(tim: pac::TIM3, timer_clk_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());
        tim.cr1.modify(|_, w| w.cen().clear_bit());
        Self { tim, timer_clk_hz }
    }

    /// Unmask TIM3 in the NVIC. Call after the handler's shared state is in place.
    pub fn unmask() {
        unsafe { NVIC::unmask(Interrupt::TIM3) };
    }

    pub fn free(self) -> pac::TIM3 {
        self.tim.dier.modify(|_, w| w.uie().clear_bit());
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim
    }
}

impl PeriodicTimer for TickTimer {
    fn enable_timer(&mut self, hz: u32) {
        let tim = &self.tim;
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        let psc = (self.timer_clk_hz / TICK_CLK_HZ).max(1) - 1;
        let arr = (TICK_CLK_HZ / hz.max(1)).clamp(2, 0x1_0000) - 1;
        tim.psc.write(|w| unsafe { w.psc().bits(psc as u16) });
        tim.arr.write(|w| unsafe { w.bits(arr) });
        tim.cnt.write(|w| unsafe { w.bits(0) });

        // Load PSC/ARR without raising an interrupt for it
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    fn clear_update(&mut self) -> bool {
        if self.tim.sr.read().uif().bit_is_set() {
            self.tim.sr.modify(|_, w| w.uif().clear_bit());
            true
        } else {
            false
        }
    }
}
