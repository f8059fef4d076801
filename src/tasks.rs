//! Embassy task wrappers binding the applications to the STM32 drivers.
//!
//! Tasks cannot be generic, so each application is instantiated here with the
//! concrete GPIO and USART2 types.

use crate::peripherals::GpioLine;
use embassy_stm32::usart::{BufferedUartRx, BufferedUartTx};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use uart_leds::apps::{command::CommandApp, pattern::LedPatternApp, status::StatusApp};

/// Transmit half of the serial link
pub type SerialTx = BufferedUartTx<'static>;

/// Transmit half behind the per-byte lock shared by all writers
pub type SharedSerialTx = Mutex<CriticalSectionRawMutex, SerialTx>;

pub type CommandTaskApp = CommandApp<'static, BufferedUartRx<'static>, SerialTx, GpioLine>;

/// Serial command interpreter task
#[embassy_executor::task]
pub async fn command_task(mut app: CommandTaskApp) -> ! {
    app.run().await
}

/// Rotating LED pattern task
#[embassy_executor::task]
pub async fn pattern_task(mut app: LedPatternApp<GpioLine>) -> ! {
    app.run().await
}

/// Periodic status message task
#[embassy_executor::task]
pub async fn status_task(mut app: StatusApp<'static, SerialTx>) -> ! {
    app.run().await
}
