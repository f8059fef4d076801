//! Heartbeat blink, run as the tail of `main`.
//!
//! Uses a plain relative delay: the blink only has to be visibly alive, so drift from
//! preemption by the other tasks is fine here.

use crate::config::HEARTBEAT_DELAY;
use crate::leds::LedLine;
use embassy_time::Timer;

/// Heartbeat application, toggling one LED at a fixed relative delay.
pub struct HeartbeatApp<L> {
    led: L,
}

impl<L: LedLine> HeartbeatApp<L> {
    pub fn new(led: L) -> Self {
        Self { led }
    }

    /// Flip the heartbeat LED once.
    pub fn beat(&self) {
        self.led.toggle();
    }

    /// Blink forever, sleeping [`HEARTBEAT_DELAY`] after each toggle.
    pub async fn run(&self) -> ! {
        log_info!("Heartbeat started, toggling every {} ms", HEARTBEAT_DELAY.as_millis());

        loop {
            self.beat();
            Timer::after(HEARTBEAT_DELAY).await;
        }
    }
}
