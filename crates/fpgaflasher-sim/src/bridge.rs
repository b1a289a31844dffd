//! Emulated bus controller

use fpgaflasher_core::error::Result;
use fpgaflasher_core::programmer::{ConfigPort, ResetControl, SpiMaster};
use fpgaflasher_core::spi::SpiCommand;

use crate::flash::{SimFlash, SimFlashConfig};
use crate::fpga::SimFpga;

/// Bus activity, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Chip-select framed flash command
    Command(u8),
    /// Chip select driven active
    Select,
    /// Chip select driven inactive
    Deselect,
    /// Raw bytes clocked on the configuration port
    Raw(Vec<u8>),
    /// Reset line asserted (`true`) or released
    Reset(bool),
    /// Delay requested, in microseconds
    Delay(u32),
    /// Done line sampled
    SampleDone(bool),
}

/// In-memory bridge hardware
///
/// The flash and the FPGA share chip select and the reset line, as on the
/// real board: flash commands are only meaningful while the FPGA is held
/// in reset.
pub struct SimBridge {
    flash: SimFlash,
    fpga: SimFpga,
    selected: bool,
    reset: bool,
    events: Vec<BusEvent>,
    elapsed_us: u64,
}

impl SimBridge {
    /// Create a bridge around an emulated flash and FPGA
    pub fn new(flash: SimFlash, fpga: SimFpga) -> Self {
        Self {
            flash,
            fpga,
            selected: false,
            reset: false,
            events: Vec::new(),
            elapsed_us: 0,
        }
    }

    /// Bridge with the default flash (EPCQ4A) and an FPGA that configures
    pub fn new_default() -> Self {
        Self::new(SimFlash::new(SimFlashConfig::default()), SimFpga::new(true))
    }

    /// The emulated flash
    pub fn flash(&self) -> &SimFlash {
        &self.flash
    }

    /// The emulated flash, mutable
    pub fn flash_mut(&mut self) -> &mut SimFlash {
        &mut self.flash
    }

    /// The emulated FPGA
    pub fn fpga(&self) -> &SimFpga {
        &self.fpga
    }

    /// The emulated FPGA, mutable
    pub fn fpga_mut(&mut self) -> &mut SimFpga {
        &mut self.fpga
    }

    /// Bus activity so far
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Forget recorded bus activity
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Whether chip select is currently active
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the reset line is currently asserted
    pub fn reset_asserted(&self) -> bool {
        self.reset
    }

    /// Sum of all requested delays
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }
}

impl SpiMaster for SimBridge {
    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
        self.events.push(BusEvent::Command(cmd.opcode));
        self.flash.execute(cmd)
    }

    fn delay_us(&mut self, us: u32) {
        self.events.push(BusEvent::Delay(us));
        self.elapsed_us += us as u64;
    }
}

impl ResetControl for SimBridge {
    fn set_reset(&mut self, asserted: bool) -> Result<()> {
        self.events.push(BusEvent::Reset(asserted));
        self.reset = asserted;
        self.fpga.reset(asserted, self.selected);
        Ok(())
    }
}

impl ConfigPort for SimBridge {
    fn select(&mut self) -> Result<()> {
        self.events.push(BusEvent::Select);
        self.selected = true;
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        self.events.push(BusEvent::Deselect);
        self.selected = false;
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.events.push(BusEvent::Raw(data.to_vec()));
        self.fpga.clock(data, self.selected);
        Ok(())
    }

    fn done(&mut self) -> Result<bool> {
        let done = self.fpga.done();
        self.events.push(BusEvent::SampleDone(done));
        Ok(done)
    }
}
