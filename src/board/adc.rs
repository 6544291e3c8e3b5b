// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ADC1 single-channel sampling using direct PAC register access.
//!
//! Conversions are software-triggered and non-blocking: [`AnalogInput::start_conversion`] sets
//! SWSTART, [`AnalogInput::read_conversion`] returns `WouldBlock` until EOC.

use core::convert::Infallible;

use stm32f7xx_hal::pac;

use crate::hw::AnalogInput;

pub struct Adc {
    adc: pac::ADC1,
    channel: u8,
}

impl Adc {
    /// Enable and configure ADC1 for 12-bit single conversions of `channel` (0..=18).
    pub fn adc1(adc: pac::ADC1, channel: u8) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        // Power off to configure
        adc.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, right-aligned, software trigger
        adc.cr1.modify(|_, w| w.res().bits(0b00));
        adc.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Longest sample time on the sensor channel, sequence of one
        let channel = channel & 0x1F;
        if channel <= 9 {
            let shift = 3 * channel as u32;
            adc.smpr2
                .modify(|r, w| unsafe { w.bits(r.bits() | (0b111 << shift)) });
        } else {
            let shift = 3 * (channel as u32 - 10);
            adc.smpr1
                .modify(|r, w| unsafe { w.bits(r.bits() | (0b111 << shift)) });
        }
        adc.sqr1.modify(|_, w| w.l().bits(0));
        adc.sqr3.modify(|_, w| unsafe { w.sq1().bits(channel) });

        adc.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc, channel }
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn free(self) -> pac::ADC1 {
        self.adc.cr2.modify(|_, w| w.adon().clear_bit());
        self.adc
    }
}

impl AnalogInput for Adc {
    fn start_conversion(&mut self) {
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
    }

    fn read_conversion(&mut self) -> nb::Result<u16, Infallible> {
        if self.adc.sr.read().eoc().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        // Reading DR clears EOC
        Ok(self.adc.dr.read().data().bits() as u16)
    }
}
