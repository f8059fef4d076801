//! The firmware's long-running applications.
//!
//! Each application owns the hardware handles it was given at boot and exposes a
//! `run` method that never returns. The firmware binary wraps each one in an
//! embassy task at the priority it needs:
//! - [`command`]: serial command interpreter (highest priority)
//! - [`pattern`]: rotating LED pattern
//! - [`status`]: periodic counter message
//! - [`heartbeat`]: slow blink driven from `main`
//!
//! Applications are generic over the LED line and serial traits so that the same
//! code runs against the STM32 registers on target and against in-memory doubles in
//! host tests.

/// Serial command interpreter
pub mod command;
/// Slow heartbeat blink
pub mod heartbeat;
/// Rotating four-LED pattern
pub mod pattern;
/// Periodic `Counter: N` status message
pub mod status;
