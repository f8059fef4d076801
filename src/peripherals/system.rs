//! System initialization and clock configuration for the STM32F407 Discovery board.

use embassy_stm32::{rcc::*, time::Hertz, Config, Peripherals};
use uart_leds::log_info;

/// Initialize the STM32F407 with its full-speed clock tree.
///
/// - **168 MHz** system clock from PLL1 fed by the board's 8 MHz crystal
/// - **168 MHz** AHB clock
/// - **42 MHz** APB1 clock (USART2, TIM2 time driver)
/// - **84 MHz** APB2 clock
/// - **48 MHz** PLL Q output (unused, the frequency USB/SDIO would need)
///
/// # Returns
///
/// The initialized [`Peripherals`] struct containing all STM32 peripheral instances.
///
/// # Panics
///
/// Panics if the clock configuration cannot be applied, which indicates a hardware
/// fault (crystal not starting) or invalid settings.
pub fn init_system() -> Peripherals {
    let mut config = Config::default();

    // 8 MHz crystal X2 on the Discovery board
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });

    // PLL = HSE(8MHz) / 8 * 336 / 2 = 168MHz, Q = 336 / 7 = 48MHz
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV8,
        mul: PllMul::MUL336,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });

    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;

    let peripherals = embassy_stm32::init(config);
    log_info!("Clocks configured, SYSCLK 168 MHz");
    peripherals
}
