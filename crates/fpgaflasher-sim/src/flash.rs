//! Emulated SPI NOR flash

use fpgaflasher_core::chip::{FlashDevice, JedecId, PAGE_SIZE};
use fpgaflasher_core::error::{Error, Result};
use fpgaflasher_core::protocol::StatusFlags;
use fpgaflasher_core::spi::{opcodes, SpiCommand};

/// Configuration for the emulated flash
#[derive(Debug, Clone)]
pub struct SimFlashConfig {
    /// Identification triple
    pub id: JedecId,
    /// Flash size in bytes
    pub size: usize,
    /// Status reads that report busy after a bulk erase
    pub erase_busy_polls: u32,
    /// Status reads that report busy after a page program
    pub program_busy_polls: u32,
}

impl Default for SimFlashConfig {
    fn default() -> Self {
        Self {
            id: JedecId::new(0xEF, 0x40, 0x13), // EPCQ4A
            size: 512 * 1024,
            erase_busy_polls: 3,
            program_busy_polls: 1,
        }
    }
}

impl SimFlashConfig {
    /// Configuration matching a registry entry
    pub fn for_device(device: &FlashDevice) -> Self {
        Self {
            id: device.id,
            size: device.capacity as usize,
            ..Self::default()
        }
    }
}

/// Emulated flash
pub struct SimFlash {
    config: SimFlashConfig,
    data: Vec<u8>,
    status: StatusFlags,
    busy_polls_left: u32,
    opcodes: Vec<u8>,
    status_reads: u32,
}

impl SimFlash {
    /// Create an erased flash with the given configuration
    pub fn new(config: SimFlashConfig) -> Self {
        let data = vec![0xFF; config.size];
        Self {
            config,
            data,
            status: StatusFlags::empty(),
            busy_polls_left: 0,
            opcodes: Vec::new(),
            status_reads: 0,
        }
    }

    /// Create a flash pre-filled with `initial_data`
    pub fn with_data(config: SimFlashConfig, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// Flash contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Configuration
    pub fn config(&self) -> &SimFlashConfig {
        &self.config
    }

    /// Every opcode received, in order
    pub fn opcodes(&self) -> &[u8] {
        &self.opcodes
    }

    /// Number of status register reads so far
    pub fn status_reads(&self) -> u32 {
        self.status_reads
    }

    /// Set the block protection bits
    pub fn set_protection(&mut self, bits: u8) {
        let protect = StatusFlags::BP0 | StatusFlags::BP1 | StatusFlags::BP2;
        self.status = (self.status - protect) | (StatusFlags::from_bits_retain(bits) & protect);
    }

    /// Make the part report busy forever
    pub fn wedge(&mut self) {
        self.busy_polls_left = u32::MAX;
        self.status |= StatusFlags::WIP;
    }

    fn protected(&self) -> bool {
        self.status
            .intersects(StatusFlags::BP0 | StatusFlags::BP1 | StatusFlags::BP2)
    }

    fn start_busy(&mut self, polls: u32) {
        self.busy_polls_left = polls;
        if polls > 0 {
            self.status |= StatusFlags::WIP;
        } else {
            self.status -= StatusFlags::WIP | StatusFlags::WEL;
        }
    }

    fn offset(&self, addr: u32) -> usize {
        addr as usize % self.data.len()
    }

    fn handle_status_read(&mut self, cmd: &mut SpiCommand<'_>) {
        self.status_reads += 1;
        if let Some(b) = cmd.read_buf.first_mut() {
            *b = self.status.bits();
        }
        if self.busy_polls_left > 0 {
            if self.busy_polls_left != u32::MAX {
                self.busy_polls_left -= 1;
            }
            if self.busy_polls_left == 0 {
                self.status -= StatusFlags::WIP | StatusFlags::WEL;
            }
        }
    }

    fn handle_page_program(&mut self, cmd: &SpiCommand<'_>) -> Result<()> {
        if !self.status.contains(StatusFlags::WEL) {
            return Err(Error::WriteProtected);
        }
        let addr = cmd.address.unwrap_or(0);
        let page_base = addr & !(PAGE_SIZE as u32 - 1);

        // Page program wraps inside the addressed page, and can only
        // clear bits.
        if !self.protected() {
            for (i, &byte) in cmd.write_data.iter().enumerate() {
                let in_page = (addr as usize + i) % PAGE_SIZE;
                let offset = self.offset(page_base + in_page as u32);
                self.data[offset] &= byte;
            }
        }

        self.start_busy(self.config.program_busy_polls);
        Ok(())
    }

    fn handle_chip_erase(&mut self) -> Result<()> {
        if !self.status.contains(StatusFlags::WEL) {
            return Err(Error::WriteProtected);
        }
        if !self.protected() {
            self.data.fill(0xFF);
        }
        self.start_busy(self.config.erase_busy_polls);
        Ok(())
    }

    fn handle_read(&mut self, cmd: &mut SpiCommand<'_>) {
        let addr = cmd.address.unwrap_or(0);
        for (i, b) in cmd.read_buf.iter_mut().enumerate() {
            *b = self.data[self.offset(addr.wrapping_add(i as u32))];
        }
    }

    /// Handle one chip-select framed command
    pub fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
        self.opcodes.push(cmd.opcode);

        // A busy part only answers status reads.
        if self.status.contains(StatusFlags::WIP) && cmd.opcode != opcodes::RDSR {
            log::warn!("sim flash: opcode {:#04x} while busy", cmd.opcode);
            return Ok(());
        }

        match cmd.opcode {
            opcodes::RDID => {
                let id = self.config.id.0;
                for (b, v) in cmd.read_buf.iter_mut().zip(id.iter()) {
                    *b = *v;
                }
                Ok(())
            }
            opcodes::RDSR => {
                self.handle_status_read(cmd);
                Ok(())
            }
            opcodes::WRSR => {
                if let Some(&v) = cmd.write_data.first() {
                    self.set_protection(v);
                }
                Ok(())
            }
            opcodes::WREN => {
                self.status |= StatusFlags::WEL;
                Ok(())
            }
            opcodes::FAST_READ => {
                if cmd.dummy_bytes != 1 {
                    return Err(Error::SpiTransferFailed);
                }
                self.handle_read(cmd);
                Ok(())
            }
            opcodes::PP => self.handle_page_program(cmd),
            opcodes::CE_C7 => self.handle_chip_erase(),
            other => {
                log::warn!("sim flash: unsupported opcode {:#04x}", other);
                Err(Error::SpiTransferFailed)
            }
        }
    }
}
