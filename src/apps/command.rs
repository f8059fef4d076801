//! Serial command interpreter.
//!
//! Reads the serial link one byte at a time, echoing each byte back as it is typed.
//! A `\r` or `\n` ends the line: the whole line is echoed as `Received: <line>`,
//! matched against the command table and executed.
//!
//! | line    | action                        | reply                |
//! |---------|-------------------------------|----------------------|
//! | `led`   | toggle board LED              | `LED4 toggled`       |
//! | `led12` | toggle PD12                   | `PD12 toggled`       |
//! | `led13` | toggle PD13                   | `PD13 toggled`       |
//! | `led14` | toggle PD14                   | `PD14 toggled`       |
//! | `led15` | toggle PD15                   | `PD15 toggled`       |
//! | `all`   | toggle all four pattern LEDs  | `All LEDs toggled`   |
//! | `help`  | -                             | command summary      |
//!
//! Anything else is ignored without a reply. Matching is exact and case-sensitive.
//!
//! Input beyond `LINE_CAPACITY - 1` bytes is dropped without echo until the next
//! terminator. Empty lines do nothing.

use crate::config::LINE_CAPACITY;
use crate::leds::{CommandLeds, LedLine, PatternPin};
use crate::serial::{SerialError, SerialIn, SerialOut, CRLF};
use embedded_io_async::{Read, ReadReady, Write};

/// Reply to `help`.
pub const HELP_TEXT: &str = "Commands: led, led12, led13, led14, led15, all, help\r\n";

/// Fixed-capacity buffer holding the line being typed.
///
/// One slot of the capacity is reserved for the terminator, so at most
/// `LINE_CAPACITY - 1` bytes are kept. Bytes pushed past that are dropped.
pub struct LineBuffer {
    buf: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineBuffer {
    /// Longest line the buffer holds.
    pub const MAX_LEN: usize = LINE_CAPACITY - 1;

    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_CAPACITY],
            len: 0,
        }
    }

    /// Append a byte. Returns `false` (and stores nothing) when the line is full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len < Self::MAX_LEN {
            self.buf[self.len] = byte;
            self.len += 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(defmt::Format))]
pub enum Command {
    ToggleBoardLed,
    TogglePin(PatternPin),
    ToggleAll,
    Help,
    Unrecognized,
}

impl Command {
    /// Match a complete line (without terminator) against the command table.
    pub fn parse(line: &[u8]) -> Self {
        match line {
            b"led" => Self::ToggleBoardLed,
            b"led12" => Self::TogglePin(PatternPin::Pd12),
            b"led13" => Self::TogglePin(PatternPin::Pd13),
            b"led14" => Self::TogglePin(PatternPin::Pd14),
            b"led15" => Self::TogglePin(PatternPin::Pd15),
            b"all" => Self::ToggleAll,
            b"help" => Self::Help,
            _ => Self::Unrecognized,
        }
    }

    /// Apply the command's effect on the LEDs.
    pub fn execute<L: LedLine>(self, leds: &CommandLeds<L>) {
        match self {
            Self::ToggleBoardLed => leds.board.toggle(),
            Self::TogglePin(pin) => leds.pattern.line(pin).toggle(),
            Self::ToggleAll => leds.pattern.toggle_all(),
            Self::Help | Self::Unrecognized => {}
        }
    }

    /// Text sent back after executing, if any.
    pub fn reply(self) -> Option<&'static str> {
        match self {
            Self::ToggleBoardLed => Some("LED4 toggled\r\n"),
            Self::TogglePin(PatternPin::Pd12) => Some("PD12 toggled\r\n"),
            Self::TogglePin(PatternPin::Pd13) => Some("PD13 toggled\r\n"),
            Self::TogglePin(PatternPin::Pd14) => Some("PD14 toggled\r\n"),
            Self::TogglePin(PatternPin::Pd15) => Some("PD15 toggled\r\n"),
            Self::ToggleAll => Some("All LEDs toggled\r\n"),
            Self::Help => Some(HELP_TEXT),
            Self::Unrecognized => None,
        }
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Command interpreter application.
pub struct CommandApp<'a, R, W, L> {
    rx: SerialIn<R>,
    out: SerialOut<'a, W>,
    leds: CommandLeds<L>,
    line: LineBuffer,
}

impl<'a, R, W, L> CommandApp<'a, R, W, L>
where
    R: Read + ReadReady,
    W: Write,
    L: LedLine,
{
    pub fn new(rx: SerialIn<R>, out: SerialOut<'a, W>, leds: CommandLeds<L>) -> Self {
        Self {
            rx,
            out,
            leds,
            line: LineBuffer::new(),
        }
    }

    /// The line typed so far.
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Serve the serial link forever.
    ///
    /// Suspends on every read until a byte arrives. Serial faults are logged and the
    /// interpreter carries on with the next byte, keeping the partial line.
    pub async fn run(&mut self) -> ! {
        log_info!("Command interpreter started");

        loop {
            if let Ok(false) = self.rx.data_available() {
                log_debug!("Waiting for input");
            }
            let byte = match self.rx.get().await {
                Ok(byte) => byte,
                Err(e) => {
                    log_warn!("Serial receive failed: {}", e);
                    continue;
                }
            };

            if let Err(e) = self.handle_byte(byte).await {
                log_warn!("Serial reply failed: {}", e);
            }
        }
    }

    /// Feed one received byte through the line editor.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(command))` - the byte ended a non-empty line and `command` was executed
    /// * `Ok(None)` - the byte was buffered, dropped, or ended an empty line
    /// * `Err(SerialError)` - echo or reply output failed (a completed line is still
    ///   executed and cleared)
    pub async fn handle_byte(&mut self, byte: u8) -> Result<Option<Command>, SerialError> {
        if is_terminator(byte) {
            if self.line.is_empty() {
                return Ok(None);
            }
            let result = self.dispatch_line().await;
            self.line.clear();
            return result.map(Some);
        }

        if self.line.push(byte) {
            self.out.put(byte).await?;
        }
        Ok(None)
    }

    async fn dispatch_line(&mut self) -> Result<Command, SerialError> {
        let echoed = self.echo_line().await;

        let command = Command::parse(self.line.as_bytes());
        log_debug!("Dispatching {} ({} bytes)", command, self.line.len());
        command.execute(&self.leds);

        echoed?;
        if let Some(reply) = command.reply() {
            self.out.send_str(reply).await?;
        }
        Ok(command)
    }

    async fn echo_line(&self) -> Result<(), SerialError> {
        self.out.send_str("Received: ").await?;
        self.out.send_bytes(self.line.as_bytes()).await?;
        self.out.send_str(CRLF).await
    }
}
