//! Boot banner sent once on the serial link before the tasks start.

use crate::config::SERIAL_SETTLE_DELAY;
use crate::serial::{SerialError, SerialOut};
use embassy_time::Timer;
use embedded_io_async::Write;

/// Banner listing the command set.
pub const BANNER: &str = concat!(
    "\r\n*** STM32F4 UART Example with Multiple LEDs ***\r\n",
    "Commands:\r\n",
    "  'led'   - Toggle board LED\r\n",
    "  'led12' - Toggle PD12\r\n",
    "  'led13' - Toggle PD13\r\n",
    "  'led14' - Toggle PD14\r\n",
    "  'led15' - Toggle PD15\r\n",
    "  'all'   - Toggle all LEDs\r\n",
    "  'help'  - Show this help\r\n",
);

/// Write [`BANNER`].
///
/// Only waits for room in the transmit queue, which drains at line speed, so it
/// cannot block indefinitely.
pub async fn send_banner<W: Write>(out: SerialOut<'_, W>) -> Result<(), SerialError> {
    out.send_str(BANNER).await
}

/// Let a freshly opened serial line settle, then write [`BANNER`].
pub async fn announce<W: Write>(out: SerialOut<'_, W>) -> Result<(), SerialError> {
    Timer::after(SERIAL_SETTLE_DELAY).await;
    send_banner(out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{port, written, CaptureWriter};
    use embassy_futures::block_on;

    #[test]
    fn banner_lists_every_command() {
        let mut tx = port(CaptureWriter::default());
        block_on(send_banner(SerialOut::new(&tx))).unwrap();

        let text = written(&mut tx);
        assert!(text.starts_with("\r\n***"));
        for command in ["'led'", "'led12'", "'led13'", "'led14'", "'led15'", "'all'", "'help'"] {
            assert!(text.contains(command), "missing {command}");
        }
        assert!(text.ends_with("\r\n"));
        assert!(text.split('\n').all(|line| line.is_empty() || line.ends_with('\r')));
    }
}
