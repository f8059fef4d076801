//! LED outputs on GPIOD.
//!
//! The pins are configured once through embassy's [`Output`] driver, which must stay
//! alive for the life of the firmware. The tasks then get [`GpioLine`] handles that
//! write the port registers directly: set/clear go through BSRR (one atomic store),
//! toggle reads ODR and writes the inverse through BSRR.

use embassy_stm32::{
    gpio::{Level, Output, Pin, Speed},
    pac::{self, gpio::vals::Odr},
    peripherals::{PD12, PD13, PD14, PD15},
    Peri,
};
use uart_leds::leds::{LedBank, LedLine, PatternLeds};
use uart_leds::log_info;

/// Peripheral collection for the four Discovery user LEDs
pub struct LedPeripherals<'d> {
    pub pd12: Peri<'d, PD12>, // LD4 green
    pub pd13: Peri<'d, PD13>, // LD3 orange
    pub pd14: Peri<'d, PD14>, // LD5 red
    pub pd15: Peri<'d, PD15>, // LD6 blue
}

/// Macro to claim peripherals for the LED bank
#[macro_export]
macro_rules! claim_leds {
    ($peripherals:expr) => {{
        $crate::peripherals::gpio::LedPeripherals {
            pd12: $peripherals.PD12,
            pd13: $peripherals.PD13,
            pd14: $peripherals.PD14,
            pd15: $peripherals.PD15,
        }
    }};
}

/// Configured LED pins. Dropping this returns the pins to their reset mode, so it
/// is held by `main` for the life of the firmware.
pub struct LedOutputs<'d> {
    _pins: [Output<'d>; 4],
}

/// Register-level handle onto one GPIO output pin.
#[derive(Clone, Copy)]
pub struct GpioLine {
    port: pac::gpio::Gpio,
    pin: usize,
}

impl GpioLine {
    const fn new(port: pac::gpio::Gpio, pin: usize) -> Self {
        Self { port, pin }
    }
}

impl LedLine for GpioLine {
    fn set(&self) {
        self.port.bsrr().write(|w| w.set_bs(self.pin, true));
    }

    fn clear(&self) {
        self.port.bsrr().write(|w| w.set_br(self.pin, true));
    }

    fn is_set(&self) -> bool {
        self.port.odr().read().odr(self.pin) == Odr::HIGH
    }
}

/// Configure a pin as a push-pull output, initially low (LED off).
fn configure_pin<'d>(pin: Peri<'d, impl Pin>) -> Output<'d> {
    Output::new(pin, Level::Low, Speed::Low)
}

/// Configure the LED pins and build the board's LED bank.
///
/// The Discovery board has four user LEDs. Following its board definition the board
/// LED is LD4 (PD12) and the heartbeat LED is LD3 (PD13), so those two handles
/// address the same pins as pattern LEDs 1 and 2.
pub fn configure_leds(pins: LedPeripherals<'_>) -> (LedOutputs<'_>, LedBank<GpioLine>) {
    let outputs = LedOutputs {
        _pins: [
            configure_pin(pins.pd12),
            configure_pin(pins.pd13),
            configure_pin(pins.pd14),
            configure_pin(pins.pd15),
        ],
    };

    let line = |pin| GpioLine::new(pac::GPIOD, pin);
    let bank = LedBank {
        pattern: PatternLeds::new([line(12), line(13), line(14), line(15)]),
        board: line(12),
        heartbeat: line(13),
    };

    log_info!("LEDs configured on PD12..PD15, all off");
    (outputs, bank)
}
