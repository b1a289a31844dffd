//! Programmer trait definitions

use crate::error::Result;
use crate::spi::SpiCommand;

/// SPI master able to run complete flash commands
///
/// Implementations assert chip select at the start of `execute` and
/// release it before returning, on success and on error alike, so a failed
/// transfer never leaves the device mid-transaction.
pub trait SpiMaster {
    /// Execute a single SPI command
    ///
    /// The command contains all the information needed for the transaction:
    /// - `opcode`: The SPI command opcode
    /// - `address`: Optional 3-byte address
    /// - `dummy_bytes`: Number of dummy bytes after the address
    /// - `write_data`: Data to write after the header
    /// - `read_buf`: Buffer to read data into
    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()>;

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);
}

/// Control of the external reset line shared with the downstream device
pub trait ResetControl {
    /// Assert (`true`) or release (`false`) the reset line
    fn set_reset(&mut self, asserted: bool) -> Result<()>;
}

/// Raw access to the FPGA slave configuration port
///
/// Unlike [`SpiMaster::execute`], chip select is under caller control: the
/// configuration sequence needs bytes clocked with chip select released.
pub trait ConfigPort: SpiMaster + ResetControl {
    /// Drive chip select active
    fn select(&mut self) -> Result<()>;

    /// Drive chip select inactive
    fn deselect(&mut self) -> Result<()>;

    /// Clock `data` out without touching chip select
    fn write_raw(&mut self, data: &[u8]) -> Result<()>;

    /// Sample the done line
    fn done(&mut self) -> Result<bool>;
}

/// Visible signal used for the permanent fault state
pub trait FaultIndicator {
    /// Turn the signal on or off
    fn set(&mut self, on: bool);
}
