// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # STM32F767 Backend
//!
//! Register-level implementations of the [`hw`](crate::hw) traits for the NUCLEO-F767ZI.
//!
//! | Function | Peripheral | Pins |
//! | -------- | ---------- | ---- |
//! | Temperature sensor | ADC1 IN3 | PA3 |
//! | Motor PWM | TIM2 CH1 | PA0 |
//! | Control tick | TIM3 update interrupt | |
//! | Speed encoder | TIM4 CH1/CH2 | PD12, PD13 |
//! | Telemetry | USART3 (ST-LINK VCP) | PD8, PD9 |
//! | Status LEDs | GPIO | PB0, PB7, PB14, PD14 |

pub mod adc;
pub mod encoder;
pub mod led;
pub mod pins;
pub mod pwm;
pub mod timer;
pub mod usart;

pub use adc::Adc;
pub use encoder::EncoderSpeed;
pub use led::StatusLeds;
pub use pins::BoardPins;
pub use pwm::Pwm;
pub use timer::TickTimer;
pub use usart::SerialPort;
