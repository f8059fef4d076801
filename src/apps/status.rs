//! Periodic status message.
//!
//! Prints `Counter: N\r\n` every [`STATUS_PERIOD`] on the shared serial link. The
//! counter is a `u32` and wraps silently back to zero.

use crate::config::STATUS_PERIOD;
use crate::serial::{SerialError, SerialOut, CRLF};
use embassy_time::Ticker;
use embedded_io_async::Write;

/// Status reporting application.
pub struct StatusApp<'a, W> {
    out: SerialOut<'a, W>,
    counter: u32,
}

impl<'a, W: Write> StatusApp<'a, W> {
    /// Create the status reporter, counting from zero.
    pub fn new(out: SerialOut<'a, W>) -> Self {
        Self::starting_at(out, 0)
    }

    /// Create the status reporter with the first message printing `counter`.
    pub fn starting_at(out: SerialOut<'a, W>, counter: u32) -> Self {
        Self { out, counter }
    }

    /// Value printed by the next report.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Print one `Counter: N` line and advance the counter.
    ///
    /// The counter advances even when the write fails, so a serial fault costs one
    /// line of output but never repeats a value.
    pub async fn report(&mut self) -> Result<(), SerialError> {
        let value = self.counter;
        self.counter = self.counter.wrapping_add(1);
        if self.counter == 0 {
            log_info!("Status counter wrapped");
        }

        self.out.send_str("Counter: ").await?;
        self.out.send_number(value).await?;
        self.out.send_str(CRLF).await
    }

    /// Report forever, one line per period.
    pub async fn run(&mut self) -> ! {
        log_info!("Status reporter started, every {} ms", STATUS_PERIOD.as_millis());

        let mut ticker = Ticker::every(STATUS_PERIOD);
        loop {
            if let Err(e) = self.report().await {
                log_warn!("Status report failed: {}", e);
            }
            ticker.next().await;
        }
    }
}
