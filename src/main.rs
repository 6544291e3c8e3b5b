// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::Mutex;
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use motorctl::{
    board::{Adc, BoardPins, EncoderSpeed, Pwm, SerialPort, StatusLeds, TickTimer},
    control::{ControlLoop, Scheduler},
    hw::PeriodicTimer,
    ControlConfig,
};

/// Encoder counts per control period at full speed.
const FULL_SPEED_COUNTS: f32 = 40.0;

/// ADC1 channel of the temperature sensor (PA3).
const TEMP_ADC_CHANNEL: u8 = 3;

static SCHEDULER: Scheduler = Scheduler::new();
static TICK_TIMER: Mutex<RefCell<Option<TickTimer>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let cfg = ControlConfig::DEFAULT;
    if let Err(e) = cfg.validate() {
        panic!("{}", e);
    }

    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let timer_clk = clocks.timclk1().raw();

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);

    // USART3 (ST-LINK VCP)
    let usart_cfg = Config {
        baud_rate: cfg.baud_rate.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART3,
        (pins.usart3.tx, pins.usart3.rx),
        &clocks,
        usart_cfg,
    );

    let pwm = Pwm::tim2(dp.TIM2, timer_clk, cfg.pwm_hz);
    let adc = Adc::adc1(dp.ADC1, TEMP_ADC_CHANNEL);
    let encoder = EncoderSpeed::tim4(dp.TIM4, FULL_SPEED_COUNTS, cfg.command_max);
    let leds = StatusLeds::new(pins.leds);

    let mut control = ControlLoop::new(&cfg, pwm, adc, encoder, SerialPort::new(serial), leds);
    // Output already at 0 %; a stalled port only costs the banner.
    control.start().ok();

    SCHEDULER.set_setpoint(cfg.initial_setpoint);

    // Control tick
    let mut timer = TickTimer::tim3(dp.TIM3, timer_clk);
    timer.enable_timer(cfg.control_hz);
    cortex_m::interrupt::free(|cs| *TICK_TIMER.borrow(cs).borrow_mut() = Some(timer));
    TickTimer::unmask();

    loop {
        control.poll(&SCHEDULER);
    }
}

#[interrupt]
fn TIM3() {
    cortex_m::interrupt::free(|cs| {
        if let Some(timer) = TICK_TIMER.borrow(cs).borrow_mut().as_mut() {
            // Missed deadlines are counted by the scheduler and reported from the main loop.
            SCHEDULER.on_timer_interrupt(timer).ok();
        }
    });
}
