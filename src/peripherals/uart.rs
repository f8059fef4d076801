//! USART2 serial link on PA2 (TX) / PA3 (RX).
//!
//! Opened once at boot in interrupt-driven buffered mode: received bytes are queued
//! by the USART2 interrupt until the command task reads them, and transmitted bytes
//! are queued until the interrupt drains them onto the wire. A writer finding the
//! transmit queue full is suspended until space frees up.

use embassy_stm32::{
    bind_interrupts, peripherals as stm32_peripherals,
    peripherals::{PA2, PA3, USART2},
    usart::{self, BufferedUart, BufferedUartRx, BufferedUartTx},
    Peri,
};
use static_cell::ConstStaticCell;
use uart_leds::config::SerialSettings;
use uart_leds::log_info;

/// Size of the interrupt-drained transmit queue. Holds the whole boot banner.
pub const TX_QUEUE_SIZE: usize = 512;

/// Size of the interrupt-filled receive queue.
pub const RX_QUEUE_SIZE: usize = 64;

/// Peripheral collection for the serial link
pub struct UartPeripherals<'d> {
    pub usart2: Peri<'d, USART2>,
    pub tx: Peri<'d, PA2>, // USART2_TX, AF7
    pub rx: Peri<'d, PA3>, // USART2_RX, AF7
    pub buffers: &'d mut UartBuffers,
}

/// Macro to claim peripherals for the serial link
#[macro_export]
macro_rules! claim_uart {
    ($peripherals:expr) => {{
        $crate::peripherals::uart::UartPeripherals {
            usart2: $peripherals.USART2,
            tx: $peripherals.PA2, // USART2_TX
            rx: $peripherals.PA3, // USART2_RX
            buffers: $crate::peripherals::uart::UART_BUFFERS.take(),
        }
    }};
}

bind_interrupts!(
    /// USART2 interrupt handlers
    pub struct UartInterrupts {
        USART2 => usart::BufferedInterruptHandler<stm32_peripherals::USART2>;
    }
);

/// Queues backing the buffered UART driver.
pub struct UartBuffers {
    pub tx: [u8; TX_QUEUE_SIZE],
    pub rx: [u8; RX_QUEUE_SIZE],
}
pub static UART_BUFFERS: ConstStaticCell<UartBuffers> = ConstStaticCell::new(UartBuffers::new());

impl UartBuffers {
    pub const fn new() -> Self {
        Self {
            tx: [0u8; TX_QUEUE_SIZE],
            rx: [0u8; RX_QUEUE_SIZE],
        }
    }
}

impl Default for UartBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the serial link: 8N1, no flow control, at `settings.baudrate`.
///
/// Configures PA2/PA3 for alternate function 7 and starts USART2.
///
/// # Returns
///
/// The transmit and receive halves of the link.
///
/// # Panics
///
/// Panics if the baud rate cannot be produced from the APB1 clock.
pub fn open_serial_port(
    claims: UartPeripherals<'_>,
    settings: SerialSettings,
) -> (BufferedUartTx<'_>, BufferedUartRx<'_>) {
    let mut config = usart::Config::default();
    config.baudrate = settings.baudrate;

    let uart = BufferedUart::new(
        claims.usart2,
        claims.rx,
        claims.tx,
        &mut claims.buffers.tx,
        &mut claims.buffers.rx,
        UartInterrupts,
        config,
    )
    .expect("Invalid USART2 configuration");

    log_info!("USART2 open at {} baud", settings.baudrate);
    uart.split()
}
