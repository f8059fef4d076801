//! LED output lines and the way they are split between tasks.
//!
//! The board has six LED outputs: four pattern LEDs cycled by the pattern task, a
//! board LED and a heartbeat LED. Lines are register handles rather than owned
//! drivers, so the pattern task and the command task can both hold handles onto the
//! same four pattern LEDs without a lock.

/// A single binary output line.
///
/// `set` and `clear` must each be one indivisible register write. `toggle` reads
/// the current output state and writes back its inverse, so a toggle running
/// concurrently with a `set`/`clear` of the same line from another task races:
/// the last write wins and no order is defined between them.
pub trait LedLine {
    /// Drive the line high (LED on).
    fn set(&self);

    /// Drive the line low (LED off).
    fn clear(&self);

    /// Current output state of the line.
    fn is_set(&self) -> bool;

    /// Invert the current output state.
    fn toggle(&self) {
        if self.is_set() {
            self.clear();
        } else {
            self.set();
        }
    }
}

impl<T: LedLine + ?Sized> LedLine for &T {
    fn set(&self) {
        (**self).set()
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn is_set(&self) -> bool {
        (**self).is_set()
    }

    fn toggle(&self) {
        (**self).toggle()
    }
}

/// Number of LEDs driven by the rotating pattern.
pub const PATTERN_LED_COUNT: usize = 4;

/// The four pattern LEDs, named after the Discovery board pins driving them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(defmt::Format))]
pub enum PatternPin {
    Pd12,
    Pd13,
    Pd14,
    Pd15,
}

impl PatternPin {
    /// All pattern pins in pattern order.
    pub const ALL: [PatternPin; PATTERN_LED_COUNT] = [Self::Pd12, Self::Pd13, Self::Pd14, Self::Pd15];

    /// Position of this LED within the pattern bank.
    pub const fn index(self) -> usize {
        match self {
            Self::Pd12 => 0,
            Self::Pd13 => 1,
            Self::Pd14 => 2,
            Self::Pd15 => 3,
        }
    }

    /// Pin name as printed in command replies.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pd12 => "PD12",
            Self::Pd13 => "PD13",
            Self::Pd14 => "PD14",
            Self::Pd15 => "PD15",
        }
    }
}

/// The four LEDs cycled by the pattern task.
#[derive(Clone, Copy)]
pub struct PatternLeds<L> {
    lines: [L; PATTERN_LED_COUNT],
}

impl<L: LedLine> PatternLeds<L> {
    /// Group four lines, in [`PatternPin::ALL`] order.
    pub const fn new(lines: [L; PATTERN_LED_COUNT]) -> Self {
        Self { lines }
    }

    /// The line driving `pin`.
    pub fn line(&self, pin: PatternPin) -> &L {
        &self.lines[pin.index()]
    }

    /// Turn every pattern LED off.
    pub fn clear_all(&self) {
        self.lines.iter().for_each(LedLine::clear);
    }

    /// Invert every pattern LED, one line at a time.
    pub fn toggle_all(&self) {
        self.lines.iter().for_each(LedLine::toggle);
    }

    /// Turn on the LEDs whose bit is set in `mask` (bit n = LED n). Other LEDs are
    /// left untouched.
    pub fn light(&self, mask: u8) {
        for (n, line) in self.lines.iter().enumerate() {
            if mask & (1 << n) != 0 {
                line.set();
            }
        }
    }

    /// Bitmask of the LEDs currently on.
    pub fn lit_mask(&self) -> u8 {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_set())
            .fold(0, |mask, (n, _)| mask | (1 << n))
    }
}

/// LEDs written by the command task: the board LED plus the shared pattern LEDs.
#[derive(Clone, Copy)]
pub struct CommandLeds<L> {
    pub board: L,
    pub pattern: PatternLeds<L>,
}

/// All six LED lines of the board, created once at boot and then split between
/// the tasks.
pub struct LedBank<L> {
    pub pattern: PatternLeds<L>,
    pub board: L,
    pub heartbeat: L,
}

impl<L: LedLine + Copy> LedBank<L> {
    /// Handles for the pattern task.
    pub fn pattern_leds(&self) -> PatternLeds<L> {
        self.pattern
    }

    /// Handles for the command task.
    pub fn command_leds(&self) -> CommandLeds<L> {
        CommandLeds {
            board: self.board,
            pattern: self.pattern,
        }
    }

    /// Handle for the heartbeat loop, its only writer.
    pub fn heartbeat_led(&self) -> L {
        self.heartbeat
    }
}
