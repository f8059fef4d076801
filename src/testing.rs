//! Host-side stand-ins for the board's GPIO lines and serial port.

use core::cell::Cell;
use core::convert::Infallible;
use core::future::Future;
use core::pin::Pin;
use std::collections::VecDeque;
use std::sync::{Mutex as StdMutex, MutexGuard};

use embassy_futures::poll_once;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::MockDriver;
use embedded_io_async::{ErrorKind, ErrorType, Read, ReadReady, Write};

use crate::leds::LedLine;

/// In-memory output line.
#[derive(Default)]
pub struct FakeLine {
    state: Cell<bool>,
}

impl LedLine for FakeLine {
    fn set(&self) {
        self.state.set(true);
    }

    fn clear(&self) {
        self.state.set(false);
    }

    fn is_set(&self) -> bool {
        self.state.get()
    }
}

/// Serial TX sink recording every byte written.
#[derive(Default)]
pub struct CaptureWriter {
    pub bytes: Vec<u8>,
}

impl ErrorType for CaptureWriter {
    type Error = Infallible;
}

impl Write for CaptureWriter {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Serial TX sink whose every write fails.
pub struct BrokenWriter;

impl ErrorType for BrokenWriter {
    type Error = ErrorKind;
}

impl Write for BrokenWriter {
    async fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Serial RX source replaying a fixed script of bytes and faults.
#[derive(Default)]
pub struct ScriptedReader {
    script: VecDeque<Result<u8, ErrorKind>>,
}

impl ScriptedReader {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            script: bytes.iter().copied().map(Ok).collect(),
        }
    }

    pub fn push_fault(&mut self, kind: ErrorKind) {
        self.script.push_back(Err(kind));
    }
}

impl ErrorType for ScriptedReader {
    type Error = ErrorKind;
}

impl Read for ScriptedReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.script.pop_front() {
            Some(Ok(byte)) => {
                buf[0] = byte;
                Ok(1)
            }
            Some(Err(kind)) => Err(kind),
            None => Ok(0),
        }
    }
}

impl ReadReady for ScriptedReader {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.script.is_empty())
    }
}

/// A serial TX lock around `writer`, as the firmware shares its UART TX half.
pub fn port<W>(writer: W) -> Mutex<CriticalSectionRawMutex, W> {
    Mutex::new(writer)
}

/// Text written so far to a captured port.
pub fn written(port: &mut Mutex<CriticalSectionRawMutex, CaptureWriter>) -> String {
    String::from_utf8(port.get_mut().bytes.clone()).unwrap()
}

/// Text written so far to a captured port that tasks still hold handles onto.
pub fn snapshot(port: &Mutex<CriticalSectionRawMutex, CaptureWriter>) -> String {
    let writer = port.try_lock().unwrap();
    String::from_utf8(writer.bytes.clone()).unwrap()
}

static CLOCK: StdMutex<()> = StdMutex::new(());

/// Exclusive use of the mock time driver, reset to t = 0.
///
/// The driver is process-global, so tests that advance it must not run in parallel.
pub fn mock_clock() -> (MutexGuard<'static, ()>, &'static MockDriver) {
    let guard = CLOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let driver = MockDriver::get();
    driver.reset();
    (guard, driver)
}

/// Polls per `settle`, above the 21 needed for the longest line (`"Counter: 4294967295\r\n"`).
const SETTLE_POLLS: usize = 64;

/// Poll a never-ending task until it has done all the work available right now.
///
/// Output is written a byte per poll, so a single `poll_once` may stop mid-line.
pub fn settle<F: Future>(mut task: Pin<&mut F>) {
    for _ in 0..SETTLE_POLLS {
        assert!(poll_once(task.as_mut()).is_pending());
    }
}
