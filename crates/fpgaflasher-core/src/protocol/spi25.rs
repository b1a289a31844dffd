//! SPI25 protocol implementation
//!
//! This module implements the JEDEC SPI flash command sequences the bridge
//! needs. Every function is a single synchronous transaction (or a short
//! fixed series of them) on the shared bus; callers own the sequencing
//! between commands, in particular the busy polling after erase and
//! program.

use bitflags::bitflags;

use crate::chip::JedecId;
use crate::error::{Error, Result};
use crate::programmer::SpiMaster;
use crate::spi::{opcodes, SpiCommand};

bitflags! {
    /// Status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Write In Progress
        const WIP  = opcodes::SR1_WIP;
        /// Write Enable Latch
        const WEL  = opcodes::SR1_WEL;
        /// Block Protect 0
        const BP0  = opcodes::SR1_BP0;
        /// Block Protect 1
        const BP1  = opcodes::SR1_BP1;
        /// Block Protect 2
        const BP2  = opcodes::SR1_BP2;
        /// Status Register Write Disable
        const SRWD = opcodes::SR1_SRWD;

        /// Bits that must both be clear before the next command
        const BUSY = Self::WIP.bits() | Self::WEL.bits();
    }
}

impl StatusFlags {
    /// True while an internal operation runs or the write latch is still set
    pub fn is_busy(self) -> bool {
        self.intersects(Self::BUSY)
    }
}

/// Read the JEDEC identification triple
pub fn identify<M: SpiMaster + ?Sized>(master: &mut M) -> Result<JedecId> {
    let mut buf = [0u8; 3];
    let mut cmd = SpiCommand::read_reg(opcodes::RDID, &mut buf);
    master.execute(&mut cmd)?;
    Ok(JedecId(buf))
}

/// Read the status register
pub fn read_status<M: SpiMaster + ?Sized>(master: &mut M) -> Result<StatusFlags> {
    let mut buf = [0u8; 1];
    let mut cmd = SpiCommand::read_reg(opcodes::RDSR, &mut buf);
    master.execute(&mut cmd)?;
    Ok(StatusFlags::from_bits_retain(buf[0]))
}

/// Send the Write Enable command
pub fn write_enable<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    let mut cmd = SpiCommand::simple(opcodes::WREN);
    master.execute(&mut cmd)
}

/// Write the status register
///
/// Only used with `0` to clear block protection. The part needs up to
/// 200 ms before it accepts the next command; the caller waits.
pub fn write_status<M: SpiMaster + ?Sized>(master: &mut M, value: u8) -> Result<()> {
    let data = [value];
    let mut cmd = SpiCommand::write_reg(opcodes::WRSR, &data);
    master.execute(&mut cmd)
}

/// Start a whole-chip erase
///
/// Returns as soon as the command is issued; the erase takes seconds and
/// the caller must poll with [`wait_ready`].
pub fn bulk_erase<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    write_enable(master)?;
    let mut cmd = SpiCommand::simple(opcodes::CE_C7);
    master.execute(&mut cmd)
}

/// Program up to one page at `addr`
///
/// The data must not cross a page boundary. The caller polls with
/// [`wait_ready`] afterwards.
pub fn page_program<M: SpiMaster + ?Sized>(master: &mut M, addr: u32, data: &[u8]) -> Result<()> {
    write_enable(master)?;
    let mut cmd = SpiCommand::write_3b(opcodes::PP, addr, data);
    master.execute(&mut cmd)
}

/// Read `buf.len()` bytes starting at `addr` with the fast read command
pub fn fast_read<M: SpiMaster + ?Sized>(master: &mut M, addr: u32, buf: &mut [u8]) -> Result<()> {
    let mut cmd = SpiCommand::read_3b(opcodes::FAST_READ, addr, buf).with_dummy_bytes(1);
    master.execute(&mut cmd)
}

/// Poll the status register until neither WIP nor WEL is set
///
/// With `poll_delay_us > 0` the master sleeps that long between polls,
/// otherwise it polls back to back. `max_polls` of `None` waits forever:
/// a wedged part is indistinguishable from a slow one.
///
/// Returns the number of status reads performed.
pub fn wait_ready<M: SpiMaster + ?Sized>(
    master: &mut M,
    poll_delay_us: u32,
    max_polls: Option<u32>,
) -> Result<u32> {
    let mut polls: u32 = 0;
    loop {
        let status = read_status(master)?;
        polls = polls.saturating_add(1);
        if !status.is_busy() {
            return Ok(polls);
        }
        if max_polls.is_some_and(|max| polls >= max) {
            log::warn!("flash still busy after {} polls (status {:#04x})", polls, status.bits());
            return Err(Error::Timeout);
        }
        if poll_delay_us > 0 {
            master.delay_us(poll_delay_us);
        }
    }
}
