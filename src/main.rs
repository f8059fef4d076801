//! Firmware entry point for the STM32F407 Discovery board.
//!
//! Brings up clocks, the serial link and the LEDs, sends the boot banner, then starts
//! the applications at their priorities:
//! - command interpreter on an interrupt executor at P6, preempting everything else
//! - LED pattern on an interrupt executor at P7
//! - status reporter on the thread-mode executor
//! - heartbeat as the tail of `main`, also in thread mode

#![no_std]
#![no_main]

// Board bring-up and task wrappers
mod peripherals;
mod tasks;

use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_sync::mutex::Mutex;
use peripherals::{configure_leds, init_system, open_serial_port};
use static_cell::StaticCell;
use tasks::SharedSerialTx;
use uart_leds::apps::{command::CommandApp, heartbeat::HeartbeatApp, pattern::LedPatternApp, status::StatusApp};
use uart_leds::config::SerialSettings;
use uart_leds::serial::{SerialIn, SerialOut};
use uart_leds::{banner, log_info, log_warn};

// Import panic handler and defmt RTT for debugging
#[cfg(not(feature = "debug"))]
use panic_halt as _;
#[cfg(feature = "debug")]
use {defmt_rtt as _, panic_probe as _};

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MEDIUM: InterruptExecutor = InterruptExecutor::new();

/// Serial TX half, shared by the command and status tasks for the firmware's lifetime
static SERIAL_TX: StaticCell<SharedSerialTx> = StaticCell::new();

// UART4/UART5 are unused on this board and serve as software interrupts for the
// prioritized executors
#[interrupt]
unsafe fn UART4() {
    EXECUTOR_HIGH.on_interrupt()
}

#[interrupt]
unsafe fn UART5() {
    EXECUTOR_MEDIUM.on_interrupt()
}

/// Main application entry point
///
/// Initializes the hardware, spawns the tasks and then runs the heartbeat forever.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    log_info!("Starting uart-leds firmware v{}", env!("CARGO_PKG_VERSION"));

    let p = init_system();

    let (serial_tx, serial_rx) = open_serial_port(claim_uart!(p), SerialSettings::default());
    // Held until the end of main (never) so the pins stay configured as outputs
    let (_led_outputs, leds) = configure_leds(claim_leds!(p));

    let out = SerialOut::new(SERIAL_TX.init(Mutex::new(serial_tx)));
    if let Err(e) = banner::announce(out).await {
        log_warn!("Boot banner not sent: {}", e);
    }

    log_info!("Hardware initialized, spawning tasks...");

    interrupt::UART4.set_priority(Priority::P6);
    let high = EXECUTOR_HIGH.start(interrupt::UART4);
    high.spawn(tasks::command_task(CommandApp::new(
        SerialIn::new(serial_rx),
        out,
        leds.command_leds(),
    )))
    .unwrap();

    interrupt::UART5.set_priority(Priority::P7);
    let medium = EXECUTOR_MEDIUM.start(interrupt::UART5);
    medium
        .spawn(tasks::pattern_task(LedPatternApp::new(leds.pattern_leds())))
        .unwrap();

    spawner.spawn(tasks::status_task(StatusApp::new(out))).unwrap();

    HeartbeatApp::new(leds.heartbeat_led()).run().await
}
