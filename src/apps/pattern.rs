//! Rotating LED pattern.
//!
//! Walks a single lit LED across PD12..PD15, then lights all four, then starts over.
//! Steps are spaced on absolute deadlines: the deadline of step k+1 is the deadline
//! of step k plus [`PATTERN_PERIOD`], so time spent writing the LEDs (or a late wake
//! caused by a higher priority task) never accumulates as drift.

use crate::config::PATTERN_PERIOD;
use crate::leds::{LedLine, PatternLeds};
use embassy_time::Ticker;

/// Number of steps before the pattern repeats.
pub const PATTERN_STEPS: u8 = 5;

/// LEDs lit at each step, bit n = pattern LED n.
const STEP_MASKS: [u8; PATTERN_STEPS as usize] = [0b0001, 0b0010, 0b0100, 0b1000, 0b1111];

/// LEDs lit at pattern step `index` (taken modulo [`PATTERN_STEPS`]).
pub const fn step_mask(index: u8) -> u8 {
    STEP_MASKS[(index % PATTERN_STEPS) as usize]
}

/// Position within the rotation. The next wake deadline is carried by the
/// [`Ticker`] driving [`LedPatternApp::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternState {
    index: u8,
}

impl PatternState {
    /// Step that will be shown next, in `0..PATTERN_STEPS`.
    pub const fn index(&self) -> u8 {
        self.index
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % PATTERN_STEPS;
    }
}

/// Rotating pattern application.
pub struct LedPatternApp<L> {
    leds: PatternLeds<L>,
    state: PatternState,
}

impl<L: LedLine> LedPatternApp<L> {
    /// Start the rotation at step 0.
    pub fn new(leds: PatternLeds<L>) -> Self {
        Self {
            leds,
            state: PatternState::default(),
        }
    }

    pub fn state(&self) -> PatternState {
        self.state
    }

    /// Show the current step and move to the next one.
    ///
    /// All four LEDs are cleared first and the step's LEDs set afterwards; each write
    /// is a separate register access, so a command toggling one of these LEDs in
    /// between is overwritten by whichever write lands last.
    pub fn step(&mut self) {
        self.leds.clear_all();
        self.leds.light(step_mask(self.state.index));
        self.state.advance();
    }

    /// Run the rotation forever.
    pub async fn run(&mut self) -> ! {
        log_info!("LED pattern started, {} ms per step", PATTERN_PERIOD.as_millis());

        let mut ticker = Ticker::every(PATTERN_PERIOD);
        loop {
            self.step();
            ticker.next().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{mock_clock, FakeLine};
    use core::pin::pin;
    use embassy_futures::poll_once;
    use embassy_time::{Duration, Instant};

    fn leds(lines: &[FakeLine; 4]) -> PatternLeds<&FakeLine> {
        PatternLeds::new([&lines[0], &lines[1], &lines[2], &lines[3]])
    }

    #[test]
    fn steps_follow_the_rotation_table() {
        let lines: [FakeLine; 4] = Default::default();
        let mut app = LedPatternApp::new(leds(&lines));
        let expected = [0b0001, 0b0010, 0b0100, 0b1000, 0b1111];

        for n in 0..23 {
            assert_eq!(app.state().index(), (n % 5) as u8);
            app.step();
            assert_eq!(leds(&lines).lit_mask(), expected[n % 5], "after wake {n}");
        }
    }

    #[test]
    fn step_overrides_a_concurrent_toggle() {
        // The command task may toggle a pattern LED between two steps. The next step
        // rewrites every line, so the toggle only lasts until then.
        let lines: [FakeLine; 4] = Default::default();
        let mut app = LedPatternApp::new(leds(&lines));

        app.step();
        lines[2].toggle();
        assert_eq!(leds(&lines).lit_mask(), 0b0101);

        app.step();
        assert_eq!(leds(&lines).lit_mask(), 0b0010);
    }

    #[test]
    fn step_mask_wraps() {
        assert_eq!(step_mask(4), 0b1111);
        assert_eq!(step_mask(5), step_mask(0));
        assert_eq!(step_mask(u8::MAX), step_mask(u8::MAX % PATTERN_STEPS));
    }

    #[test]
    fn wakes_are_windowed_on_absolute_deadlines() {
        let (_clock, driver) = mock_clock();

        let lines: [FakeLine; 4] = Default::default();
        let mut app = LedPatternApp::new(leds(&lines));
        let mut run = pin!(app.run());

        // First step is shown immediately at t = 0.
        assert!(poll_once(run.as_mut()).is_pending());
        assert_eq!(leds(&lines).lit_mask(), 0b0001);

        // Each cycle is woken late by a varying amount, as if other work delayed it.
        // The following deadline stays on the 300 ms grid regardless.
        let lateness = [0u64, 40, 120, 7, 299, 0, 65, 180, 3, 250];
        let mut elapsed = 0u64;
        for (k, late) in lateness.iter().enumerate() {
            let deadline = (k as u64 + 1) * 300;

            driver.advance(Duration::from_millis(deadline - 1 - elapsed));
            assert!(poll_once(run.as_mut()).is_pending());
            assert_eq!(leds(&lines).lit_mask(), step_mask(k as u8), "woke before {deadline} ms");

            driver.advance(Duration::from_millis(1 + late));
            elapsed = deadline + late;
            assert!(poll_once(run.as_mut()).is_pending());
            assert_eq!(leds(&lines).lit_mask(), step_mask(k as u8 + 1), "missed {deadline} ms");
        }

        assert_eq!(Instant::now().as_millis(), 10 * 300 + 250);
    }
}
