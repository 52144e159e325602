//! RA compensator firmware for nRF52840.
//!
//! One I²C bus carries the FRAM, the RTC and both LED modules; four GPIO
//! buttons and a tick timer feed a single command mailbox that the control
//! loop drains.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::bind_interrupts;
use embassy_nrf::twim::{self, Twim};
use embassy_time::{Duration, Timer};
use embedded_hal_bus::i2c::RefCellDevice;
use static_cell::StaticCell;

use ra_compensator::config::{
    DISPLAY_LEFT_ADDRESS, DISPLAY_RIGHT_ADDRESS, FRAM_ADDRESS, RTC_ADDRESS,
};
use ra_compensator::drivers::{Ltp305, Mb85rc, PairDisplay, Rv3028};
use ra_compensator::hw;
use ra_compensator::{app, Button, CommandMailbox, ConfigStore, Shutdown, StateMachine, TickerControl};

use {defmt_rtt as _, panic_probe as _};

// ============================================================================
// Interrupt bindings
// ============================================================================

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<TWISPI0>;
});

// ============================================================================
// Shared state
// ============================================================================

type I2cBus = RefCell<Twim<'static, TWISPI0>>;

static BUS: StaticCell<I2cBus> = StaticCell::new();
/// Buttons and ticker -> control loop.
static MAILBOX: StaticCell<CommandMailbox> = StaticCell::new();
static TICKER: StaticCell<TickerControl> = StaticCell::new();

// ============================================================================
// Tasks
// ============================================================================

#[embassy_executor::task(pool_size = 4)]
async fn button_input(pin: AnyPin, button: Button, mailbox: &'static CommandMailbox) {
    hw::buttons::button_task(pin, button, mailbox).await
}

#[embassy_executor::task]
async fn tick_source(control: &'static TickerControl, mailbox: &'static CommandMailbox) {
    hw::ticker::ticker_task(control, mailbox).await
}

// ============================================================================
// Entry point
// ============================================================================

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("RA compensator starting...");

    let mailbox: &'static CommandMailbox = MAILBOX.init(CommandMailbox::new());
    let control: &'static TickerControl = TICKER.init(TickerControl::new());

    // ── I²C bus (SDA P0.26, SCL P0.27) ──────────────────────────────────
    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K100;
    let bus: &'static I2cBus = BUS.init(RefCell::new(Twim::new(
        p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config,
    )));

    let mut rtc = Rv3028::new(RefCellDevice::new(bus), RTC_ADDRESS);
    if let Err(e) = rtc.init() {
        error!("RTC init failed: {}", e);
        return park().await;
    }

    let display = PairDisplay::new(
        Ltp305::new(RefCellDevice::new(bus), DISPLAY_LEFT_ADDRESS),
        Ltp305::new(RefCellDevice::new(bus), DISPLAY_RIGHT_ADDRESS),
    );
    let config = ConfigStore::new(Mb85rc::new(RefCellDevice::new(bus), FRAM_ADDRESS));

    let mut machine = match StateMachine::new(display, rtc, config, control) {
        Ok(machine) => machine,
        Err(e) => {
            error!("State machine init failed: {}", e);
            return park().await;
        }
    };

    // ── Input sources ───────────────────────────────────────────────────
    spawner.must_spawn(tick_source(control, mailbox));
    spawner.must_spawn(button_input(p.P0_11.degrade(), Button::Display, mailbox));
    spawner.must_spawn(button_input(p.P0_12.degrade(), Button::Program, mailbox));
    spawner.must_spawn(button_input(p.P0_24.degrade(), Button::Down, mailbox));
    spawner.must_spawn(button_input(p.P0_25.degrade(), Button::Up, mailbox));

    // ── Control loop ────────────────────────────────────────────────────
    let delay = |ms| Timer::after(Duration::from_millis(ms));
    match app::execute(mailbox, &mut machine, delay).await {
        Shutdown::Killed => info!("Stopped by kill command"),
        Shutdown::Fault(e) => error!("Stopped on error: {}", e),
    }

    park().await
}

/// Nothing left to do; the mailbox is closed so button tasks are inert.
async fn park() {
    core::future::pending::<()>().await
}
