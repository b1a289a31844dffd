//! fpgaflasher bridge firmware for Raspberry Pi Pico
//!
//! Serves the host protocol on UART0 and drives an FPGA board's
//! configuration flash and slave configuration port over SPI0. Chip select
//! is shared between the flash and the FPGA; the FPGA is held in reset
//! whenever the flash is being accessed.
//!
//! ## Pin Assignments
//!
//! | Pin   | Function                 |
//! |-------|--------------------------|
//! | GP0   | UART0 TX (to host)       |
//! | GP1   | UART0 RX (from host)     |
//! | GP2   | SCK                      |
//! | GP3   | MOSI                     |
//! | GP4   | MISO                     |
//! | GP5   | CS (flash and FPGA)      |
//! | GP6   | FPGA reset (CRESET_B)    |
//! | GP7   | FPGA done (CDONE)        |
//! | GP25  | LED (fault indicator)    |

#![no_std]
#![no_main]

mod config;

use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart};
use embassy_time::Delay;
use fpgaflasher_core::config::{ResetPolarity, Timing};
use fpgaflasher_core::dispatch::Dispatcher;
use fpgaflasher_core::programmer::{PinIndicator, SpiBridge};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::config::*;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

static TX_BUF: StaticCell<[u8; UART_TX_BUFFER]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; UART_RX_BUFFER]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("pico-fpgaflasher starting...");

    let p = embassy_rp::init(Default::default());

    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_2, p.PIN_3, p.PIN_4, spi_config);

    // Chip select starts inactive, reset starts released.
    let polarity = if RESET_ACTIVE_LOW {
        ResetPolarity::ActiveLow
    } else {
        ResetPolarity::ActiveHigh
    };
    let cs = Output::new(p.PIN_5, Level::High);
    let reset = Output::new(p.PIN_6, Level::from(polarity.level(false)));
    let done = Input::new(p.PIN_7, Pull::Down);
    let led = Output::new(p.PIN_25, Level::Low);

    let bridge = SpiBridge::new(spi, cs, reset, done, Delay).with_reset_polarity(polarity);

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = UART_BAUD;
    let host = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        TX_BUF.init([0; UART_TX_BUFFER]),
        RX_BUF.init([0; UART_RX_BUFFER]),
        uart_config,
    );

    info!("bridge ready, waiting for host");

    // Blocking from here on; serve never returns.
    let mut dispatcher = Dispatcher::new(bridge, host, Timing::default());
    dispatcher.serve(&mut PinIndicator(led))
}
