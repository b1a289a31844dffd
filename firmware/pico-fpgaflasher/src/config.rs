//! Board configuration

/// SPI clock for both the flash and the FPGA configuration port
pub const SPI_FREQUENCY_HZ: u32 = 1_000_000;

/// Host link baud rate
pub const UART_BAUD: u32 = 115_200;

/// UART transmit ring buffer size
pub const UART_TX_BUFFER: usize = 512;

/// UART receive ring buffer size; holds more than a full flash page
pub const UART_RX_BUFFER: usize = 1024;

/// Whether the downstream reset line is active low (CRESET_B style)
pub const RESET_ACTIVE_LOW: bool = true;
