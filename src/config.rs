//! Compile-time configuration for the firmware.
//!
//! Task periods and buffer sizes are fixed at build time; only the serial link
//! settings are handed to the board bring-up code as a value.

use embassy_time::Duration;

/// Rotation period of the LED pattern, measured between absolute deadlines.
pub const PATTERN_PERIOD: Duration = Duration::from_millis(300);

/// Period of the `Counter: N` status message, measured between absolute deadlines.
pub const STATUS_PERIOD: Duration = Duration::from_millis(3000);

/// Relative delay between heartbeat LED toggles.
pub const HEARTBEAT_DELAY: Duration = Duration::from_millis(2000);

/// Delay after opening the serial port before the banner is sent, lets the line settle.
pub const SERIAL_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Capacity of the command line buffer. One slot is reserved for the terminator,
/// so a line holds at most `LINE_CAPACITY - 1` bytes.
pub const LINE_CAPACITY: usize = 128;

/// Default baud rate of the command/status serial link.
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Serial link settings passed to `open_serial_port`.
///
/// Framing is fixed at 8N1 without flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(defmt::Format))]
pub struct SerialSettings {
    /// Line speed in bits per second
    pub baudrate: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baudrate: DEFAULT_BAUDRATE,
        }
    }
}
