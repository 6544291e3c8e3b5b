// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the NUCLEO-F767ZI.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, Alternate, Analog, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart3: Usart3Pins,
    pub pwm: PwmPins,
    pub encoder: EncoderPins,
    pub temp_sense: gpioa::PA3<Analog>, // ADC1_IN3
}

pub struct LedPins {
    pub green: gpiob::PB0<Output<PushPull>>, // LD1
    pub blue: gpiob::PB7<Output<PushPull>>,  // LD2
    pub red: gpiob::PB14<Output<PushPull>>,  // LD3
    /// External LED on the CN10 header.
    pub amber: gpiod::PD14<Output<PushPull>>,
}

/// USART3, routed to the ST-LINK virtual COM port.
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// Motor driver PWM input
pub struct PwmPins {
    pub ch1: gpioa::PA0<Alternate<1>>, // TIM2_CH1
}

/// TIM4 Quadrature Encoder Inputs
pub struct EncoderPins {
    pub ch1: gpiod::PD12<Alternate<2>>,
    pub ch2: gpiod::PD13<Alternate<2>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            leds: LedPins {
                green: gpiob.pb0.into_push_pull_output(),
                blue: gpiob.pb7.into_push_pull_output(),
                red: gpiob.pb14.into_push_pull_output(),
                amber: gpiod.pd14.into_push_pull_output(),
            },

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            pwm: PwmPins {
                ch1: gpioa.pa0.into_alternate::<1>(),
            },

            encoder: EncoderPins {
                ch1: gpiod.pd12.into_alternate::<2>(),
                ch2: gpiod.pd13.into_alternate::<2>(),
            },

            temp_sense: gpioa.pa3.into_analog(),
        }
    }
}
