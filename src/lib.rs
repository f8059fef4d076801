//! Hardware-independent core of the uart-leds firmware.
//!
//! Four long-running applications share the board's LED lines and one serial link:
//! a rotating LED pattern, a serial command interpreter, a periodic status message
//! and a heartbeat blink. They are written against the [`leds::LedLine`] trait and
//! the `embedded-io-async` serial traits, so the firmware binary plugs in the STM32
//! drivers while host unit tests plug in in-memory doubles.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are in scope for every module below
#[macro_use]
mod fmt;

pub mod apps;
pub mod banner;
pub mod config;
pub mod leds;
pub mod serial;

#[cfg(test)]
mod testing;
