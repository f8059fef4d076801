pub mod gpio;
pub mod system;
pub mod uart;

pub use gpio::{configure_leds, GpioLine};
pub use system::init_system;
pub use uart::open_serial_port;
