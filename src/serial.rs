//! Serial link handles shared by the command and status tasks.
//!
//! The UART is split into its two halves at boot. The RX half is owned by the
//! command task through [`SerialIn`]. The TX half sits behind a mutex and every task
//! writing to it holds a [`SerialOut`] handle.
//!
//! # Write atomicity
//!
//! [`SerialOut`] takes the TX lock for a single byte at a time, never for a whole
//! message, and yields after every byte so a writer waiting on the lock gets the
//! next slot. A byte is never split, but two tasks sending multi-byte messages at
//! the same moment see their messages interleave on the wire. When the driver's
//! transmit queue is full the write suspends the caller until space frees up.

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::{Read, ReadReady, Write};

/// Line terminator used on every outgoing line.
pub const CRLF: &str = "\r\n";

/// Number of decimal digits needed for any `u32`.
pub const U32_DIGITS: usize = 10;

/// Serial link errors reported by the UART driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(defmt::Format))]
pub enum SerialError {
    /// Receive failed (framing, noise, overrun) or the link returned no data
    Read,
    /// Transmit failed
    Write,
}

/// Shared transmit handle, see the module docs for the interleaving rules.
pub struct SerialOut<'a, W> {
    port: &'a Mutex<CriticalSectionRawMutex, W>,
}

impl<W> Clone for SerialOut<'_, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for SerialOut<'_, W> {}

impl<'a, W: Write> SerialOut<'a, W> {
    /// Create a handle onto the locked TX half.
    pub const fn new(port: &'a Mutex<CriticalSectionRawMutex, W>) -> Self {
        Self { port }
    }

    /// Push one byte. Suspends while another task is mid-byte or the queue is full.
    pub async fn put(&self, byte: u8) -> Result<(), SerialError> {
        let sent = {
            let mut port = self.port.lock().await;
            port.write_all(&[byte]).await
        };
        // Lock is released here; let a queued writer in before our next byte
        yield_now().await;
        sent.map_err(|_| SerialError::Write)
    }

    /// Send raw bytes, one [`put`](Self::put) per byte.
    pub async fn send_bytes(&self, bytes: &[u8]) -> Result<(), SerialError> {
        for &byte in bytes {
            self.put(byte).await?;
        }
        Ok(())
    }

    /// Send a string, one [`put`](Self::put) per byte.
    pub async fn send_str(&self, text: &str) -> Result<(), SerialError> {
        self.send_bytes(text.as_bytes()).await
    }

    /// Send `value` in decimal.
    pub async fn send_number(&self, value: u32) -> Result<(), SerialError> {
        let mut digits = [0u8; U32_DIGITS];
        self.send_bytes(format_decimal(value, &mut digits)).await
    }
}

/// Receive handle, owned by the command task.
pub struct SerialIn<R> {
    rx: R,
}

impl<R: Read> SerialIn<R> {
    pub const fn new(rx: R) -> Self {
        Self { rx }
    }

    /// Wait for the next received byte. The task is suspended until one arrives.
    pub async fn get(&mut self) -> Result<u8, SerialError> {
        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte).await {
            Ok(1) => Ok(byte[0]),
            Ok(_) | Err(_) => Err(SerialError::Read),
        }
    }
}

impl<R: Read + ReadReady> SerialIn<R> {
    /// Whether a received byte is waiting, without blocking.
    pub fn data_available(&mut self) -> Result<bool, SerialError> {
        self.rx.read_ready().map_err(|_| SerialError::Read)
    }
}

/// Render `value` as ASCII decimal into the tail of `buf` and return the digits.
///
/// No sign, no leading zeros, no separators. Zero renders as `"0"`.
pub fn format_decimal(mut value: u32, buf: &mut [u8; U32_DIGITS]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{port, snapshot, written, BrokenWriter, CaptureWriter, ScriptedReader};
    use core::pin::pin;
    use embassy_futures::{block_on, join::join, poll_once};
    use embedded_io_async::ErrorKind;

    fn decimal(value: u32) -> String {
        let mut buf = [0u8; U32_DIGITS];
        String::from_utf8(format_decimal(value, &mut buf).to_vec()).unwrap()
    }

    #[test]
    fn decimal_formatting() {
        assert_eq!(decimal(0), "0");
        assert_eq!(decimal(7), "7");
        assert_eq!(decimal(10), "10");
        assert_eq!(decimal(1_000_000), "1000000");
        assert_eq!(decimal(u32::MAX), "4294967295");
    }

    #[test]
    fn send_helpers_write_text_and_numbers() {
        let mut tx = port(CaptureWriter::default());
        let out = SerialOut::new(&tx);

        block_on(async {
            out.send_str("Counter: ").await.unwrap();
            out.send_number(42).await.unwrap();
            out.send_str(CRLF).await.unwrap();
        });

        assert_eq!(written(&mut tx), "Counter: 42\r\n");
    }

    #[test]
    fn write_failure_is_reported() {
        let tx = port(BrokenWriter);
        let out = SerialOut::new(&tx);

        assert_eq!(block_on(out.put(b'x')), Err(SerialError::Write));
        assert_eq!(block_on(out.send_str("abc")), Err(SerialError::Write));
    }

    #[test]
    fn concurrent_messages_interleave_byte_by_byte() {
        let tx = port(CaptureWriter::default());
        let first = SerialOut::new(&tx);
        let second = SerialOut::new(&tx);
        let mut echo = pin!(first.send_str("Received: led\r\n"));
        let mut status = pin!(second.send_str("Counter: 7\r\n"));

        // Each writer gives up the link after one byte, so the other one gets in.
        assert!(poll_once(echo.as_mut()).is_pending());
        assert_eq!(snapshot(&tx), "R");
        assert!(poll_once(status.as_mut()).is_pending());
        assert_eq!(snapshot(&tx), "RC");

        let (echo_sent, status_sent) = block_on(join(echo, status));
        assert_eq!(echo_sent, Ok(()));
        assert_eq!(status_sent, Ok(()));

        let wire = snapshot(&tx);
        assert_ne!(wire, "Received: led\r\nCounter: 7\r\n");
        assert_ne!(wire, "Counter: 7\r\nReceived: led\r\n");
        assert_eq!(wire.len(), "Received: led\r\n".len() + "Counter: 7\r\n".len());
        // Neither writer's own bytes are lost or reordered.
        assert!(is_subsequence(b"Received: led\r\n", wire.as_bytes()));
        assert!(is_subsequence(b"Counter: 7\r\n", wire.as_bytes()));
    }

    fn is_subsequence(needle: &[u8], haystack: &[u8]) -> bool {
        let mut rest = haystack.iter();
        needle.iter().all(|b| rest.any(|h| h == b))
    }

    #[test]
    fn get_returns_bytes_in_order() {
        let mut rx = SerialIn::new(ScriptedReader::new(b"ok"));

        assert_eq!(block_on(rx.get()), Ok(b'o'));
        assert_eq!(block_on(rx.get()), Ok(b'k'));
    }

    #[test]
    fn receive_faults_and_end_of_stream_are_read_errors() {
        let mut reader = ScriptedReader::new(b"");
        reader.push_fault(ErrorKind::InvalidData);
        let mut rx = SerialIn::new(reader);

        assert_eq!(block_on(rx.get()), Err(SerialError::Read));
        assert_eq!(block_on(rx.get()), Err(SerialError::Read));
    }

    #[test]
    fn data_available_tracks_pending_input() {
        let mut rx = SerialIn::new(ScriptedReader::new(b"\n"));

        assert_eq!(rx.data_available(), Ok(true));
        block_on(rx.get()).unwrap();
        assert_eq!(rx.data_available(), Ok(false));
    }
}
